mod agents;
mod flow;
mod netflow;

pub use agents::TopUserAgents;
pub use flow::{FlowProtoReport, ProtoPort};
pub use netflow::{HostDataUse, HostDataUseReport};

use crate::errors::Error;
use crate::eve::Event;
use crate::task::CancelToken;

use log::*;
use std::collections::HashMap;
use std::hash::Hash;

/// A running summary fed one event at a time.
pub trait Aggregate {
    fn observe(&mut self, event: &Event);
}

impl<'a, A: Aggregate + ?Sized> Aggregate for &'a mut A {
    fn observe(&mut self, event: &Event) {
        (**self).observe(event)
    }
}

/// Feeds `events` into `report` until they run out, returning how many were observed.
///
/// The token is checked before every event; a cancelled run returns
/// [`Error::Cancelled`] and leaves whatever was already observed in `report`.
pub fn ingest_all<I, A>(events: I, report: &mut A, cancel: &CancelToken) -> Result<usize, Error>
where
    I: IntoIterator<Item = Result<Event, Error>>,
    A: Aggregate + ?Sized,
{
    let mut observed = 0;
    for event in events {
        if cancel.is_cancelled() {
            info!("Report cancelled after {} events", observed);
            return Err(Error::Cancelled);
        }
        report.observe(&event?);
        observed += 1;
    }
    info!("Report finished after {} events", observed);
    Ok(observed)
}

/// The `n` largest counts, ties broken by key.
fn top_n<K: Ord + Hash + Clone>(counts: &HashMap<K, usize>, n: usize) -> Vec<(K, usize)> {
    let mut sorted: Vec<_> = counts.iter().map(|(k, v)| (k.clone(), *v)).collect();
    sorted.sort_by(|(ka, a), (kb, b)| b.cmp(a).then_with(|| ka.cmp(kb)));
    sorted.truncate(n);
    sorted
}
