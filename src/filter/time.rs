use crate::errors::Error;
use crate::eve::{Event, IntoCutoff, DEFAULT_TIMESTAMP_10M_AGO};
use crate::filter::EventFilter;

use chrono::{DateTime, Utc};
use log::trace;

/// Events strictly after `cutoff`. Events whose timestamp is missing or does not
/// parse are rejected.
fn after(event: &Event, cutoff: &DateTime<Utc>) -> bool {
    match event.timestamp() {
        Ok(ts) => ts > *cutoff,
        Err(e) => {
            trace!("Rejecting event without usable timestamp: {}", e);
            false
        }
    }
}

/// Alerts newer than the cutoff.
#[derive(Clone, Debug, PartialEq)]
pub struct OnlyAlertsFilter {
    cutoff: DateTime<Utc>,
}

impl OnlyAlertsFilter {
    pub fn new(cutoff: DateTime<Utc>) -> Self {
        OnlyAlertsFilter { cutoff }
    }

    /// Fails with [`Error::NaiveCutoff`] when `cutoff` carries no offset.
    pub fn try_new<C: IntoCutoff>(cutoff: C) -> Result<Self, Error> {
        cutoff.into_cutoff().map(Self::new)
    }

    pub fn cutoff(&self) -> &DateTime<Utc> {
        &self.cutoff
    }
}

impl Default for OnlyAlertsFilter {
    fn default() -> Self {
        OnlyAlertsFilter::new(*DEFAULT_TIMESTAMP_10M_AGO)
    }
}

impl EventFilter for OnlyAlertsFilter {
    fn accept(&self, event: &Event) -> bool {
        after(event, &self.cutoff) && event.is_event_type("alert")
    }
}

/// Any event newer than the cutoff.
#[derive(Clone, Debug, PartialEq)]
pub struct TimestampFilter {
    cutoff: DateTime<Utc>,
}

impl TimestampFilter {
    pub fn new(cutoff: DateTime<Utc>) -> Self {
        TimestampFilter { cutoff }
    }

    pub fn try_new<C: IntoCutoff>(cutoff: C) -> Result<Self, Error> {
        cutoff.into_cutoff().map(Self::new)
    }

    pub fn cutoff(&self) -> &DateTime<Utc> {
        &self.cutoff
    }
}

impl Default for TimestampFilter {
    fn default() -> Self {
        TimestampFilter::new(*DEFAULT_TIMESTAMP_10M_AGO)
    }
}

impl EventFilter for TimestampFilter {
    fn accept(&self, event: &Event) -> bool {
        after(event, &self.cutoff)
    }
}
