mod dns;
mod payload;
mod time;

pub use dns::NxDomainFilter;
pub use payload::{WithPayloadFilter, WithPrintablePayloadFilter};
pub use time::{OnlyAlertsFilter, TimestampFilter};

use crate::eve::Event;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Decides whether an event reaches a consumer.
pub trait EventFilter: Send + Sync {
    fn accept(&self, event: &Event) -> bool;
}

impl<'a, F: EventFilter + ?Sized> EventFilter for &'a F {
    fn accept(&self, event: &Event) -> bool {
        (**self).accept(event)
    }
}

impl<F: EventFilter + ?Sized> EventFilter for Box<F> {
    fn accept(&self, event: &Event) -> bool {
        (**self).accept(event)
    }
}

impl<F: EventFilter + ?Sized> EventFilter for std::sync::Arc<F> {
    fn accept(&self, event: &Event) -> bool {
        (**self).accept(event)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AlwaysTrueFilter;

impl EventFilter for AlwaysTrueFilter {
    fn accept(&self, _event: &Event) -> bool {
        true
    }
}

/// Which filter a run installs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    AlwaysTrue,
    OnlyAlerts,
    Timestamp,
    NxDomain,
    WithPrintablePayload,
    WithPayload,
}

impl Default for FilterKind {
    fn default() -> Self {
        FilterKind::AlwaysTrue
    }
}

impl FilterKind {
    /// Builds the filter. `cutoff` is only used by the time bound filters.
    pub fn build(&self, cutoff: DateTime<Utc>) -> Box<dyn EventFilter> {
        match self {
            FilterKind::AlwaysTrue => Box::new(AlwaysTrueFilter),
            FilterKind::OnlyAlerts => Box::new(OnlyAlertsFilter::new(cutoff)),
            FilterKind::Timestamp => Box::new(TimestampFilter::new(cutoff)),
            FilterKind::NxDomain => Box::new(NxDomainFilter),
            FilterKind::WithPrintablePayload => Box::new(WithPrintablePayloadFilter),
            FilterKind::WithPayload => Box::new(WithPayloadFilter),
        }
    }
}
