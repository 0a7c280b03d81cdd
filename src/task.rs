//! Background execution of the synchronous pipelines on smol's blocking pool.
use crate::errors::Error;
use crate::eve::EveReader;
use crate::filter::EventFilter;
use crate::payload::{ExportSummary, PayloadExporter, Progress};
use crate::report::{self, Aggregate};

use log::*;
use smol::channel::{Receiver, Sender};
use smol::Task;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Reports send their running event count this often.
const REPORT_PROGRESS_EVERY: usize = 1_000;

/// Shared flag checked between events and between writes.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A pipeline running in the background.
///
/// Progress updates arrive on [`Job::progress`]; the final result is obtained with
/// [`Job::join`]. The blocking work only stops early through [`Job::cancel`].
pub struct Job<T, P = Progress> {
    task: Task<Result<T, Error>>,
    progress: Receiver<P>,
    cancel: CancelToken,
}

impl<T, P> Job<T, P> {
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    pub fn progress(&self) -> &Receiver<P> {
        &self.progress
    }

    pub async fn join(self) -> Result<T, Error> {
        self.task.await
    }
}

fn channel<P>() -> (Sender<P>, Receiver<P>) {
    smol::channel::unbounded()
}

fn send_progress<P>(tx: &Sender<P>, progress: P) {
    if tx.try_send(progress).is_err() {
        trace!("Progress receiver dropped");
    }
}

/// Runs [`PayloadExporter::run`] off the calling thread.
pub fn spawn_export(exporter: PayloadExporter) -> Job<ExportSummary> {
    spawn_export_with(exporter, CancelToken::default())
}

/// Like [`spawn_export`], stopping once `cancel` fires.
pub fn spawn_export_with(exporter: PayloadExporter, cancel: CancelToken) -> Job<ExportSummary> {
    let (tx, rx) = channel();
    let token = cancel.clone();
    let task = smol::spawn(smol::unblock(move || {
        exporter.run(&token, |progress| send_progress(&tx, progress))
    }));
    Job {
        task,
        progress: rx,
        cancel,
    }
}

/// Feeds every event of `reader` accepted by `filter` into `report` off the calling
/// thread. Progress is the number of events ingested so far.
pub fn spawn_report<F, R>(reader: EveReader, filter: F, report: R) -> Job<R, usize>
where
    F: EventFilter + 'static,
    R: Aggregate + Send + 'static,
{
    spawn_report_with(reader, filter, report, CancelToken::default())
}

pub fn spawn_report_with<F, R>(
    reader: EveReader,
    filter: F,
    report: R,
    cancel: CancelToken,
) -> Job<R, usize>
where
    F: EventFilter + 'static,
    R: Aggregate + Send + 'static,
{
    let (tx, rx) = channel();
    let token = cancel.clone();
    let task = smol::spawn(smol::unblock(move || {
        let mut report = report;
        let mut seen = 0usize;
        let events = reader.accepted(&filter).inspect(|_| {
            seen += 1;
            if seen % REPORT_PROGRESS_EVERY == 0 {
                send_progress(&tx, seen);
            }
        });
        let ingested = report::ingest_all(events, &mut report, &token)?;
        send_progress(&tx, ingested);
        Ok(report)
    }));
    Job {
        task,
        progress: rx,
        cancel,
    }
}
