//! Two pass export of alert payloads to individual files.
//!
//! The first pass collects the identities of every accepted event so the second pass,
//! which re-reads the source and writes one file per event, can report its progress
//! against a known total. If the source grows between the passes the fraction can
//! exceed one.
mod extract;

pub use extract::{generate_filename, sanitize_signature, ExtractedPayload, NO_SIGNATURE};

use crate::errors::Error;
use crate::eve::EveReader;
use crate::filter::EventFilter;
use crate::task::CancelToken;

use log::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const DEFAULT_PREFIX: &str = "payload_export";

/// Reported after every written file, or once when there is nothing to export.
#[derive(Clone, Debug, PartialEq)]
pub enum Progress {
    Nothing,
    Wrote {
        completed: usize,
        total: usize,
        path: PathBuf,
    },
}

impl Progress {
    /// `completed / total`; `Nothing` counts as done.
    pub fn fraction(&self) -> f64 {
        match self {
            Progress::Nothing => 1.0,
            Progress::Wrote {
                completed, total, ..
            } => *completed as f64 / *total as f64,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Distinct identities found by discovery.
    pub discovered: usize,
    /// Files written, one per accepted event.
    pub written: usize,
    /// Distinct identities written.
    pub completed: usize,
}

pub struct PayloadExporter {
    reader: EveReader,
    filter: Box<dyn EventFilter>,
    destination: PathBuf,
    prefix: String,
}

impl PayloadExporter {
    pub fn new<F, P>(reader: EveReader, filter: F, destination: P) -> Self
    where
        F: EventFilter + 'static,
        P: Into<PathBuf>,
    {
        PayloadExporter {
            reader,
            filter: Box::new(filter),
            destination: destination.into(),
            prefix: DEFAULT_PREFIX.to_owned(),
        }
    }

    pub fn with_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn check_destination(&self) -> Result<(), Error> {
        if self.destination.is_dir() {
            Ok(())
        } else {
            error!("Export destination {:?} is not a directory", self.destination);
            Err(Error::DestinationMissing {
                path: self.destination.clone(),
            })
        }
    }

    /// First pass: identities of every accepted event.
    pub fn discover(&self, cancel: &CancelToken) -> Result<HashSet<String>, Error> {
        let mut identities = HashSet::new();
        for event in self.reader.accepted(&self.filter) {
            if cancel.is_cancelled() {
                info!("Discovery cancelled after {} payloads", identities.len());
                return Err(Error::Cancelled);
            }
            let extracted = ExtractedPayload::from_event(&event?).map_err(|e| {
                error!("Cannot identify payload event: {}", e);
                e
            })?;
            identities.insert(extracted.identity());
        }
        info!("Discovered {} payloads to export", identities.len());
        Ok(identities)
    }

    /// Second pass: writes the payload of every accepted event, reporting progress
    /// against `total` after each file.
    pub fn export<P>(
        &self,
        total: usize,
        cancel: &CancelToken,
        mut on_progress: P,
    ) -> Result<ExportSummary, Error>
    where
        P: FnMut(Progress),
    {
        self.check_destination()?;
        let mut summary = ExportSummary {
            discovered: total,
            ..ExportSummary::default()
        };
        if total == 0 {
            info!("Nothing to export");
            on_progress(Progress::Nothing);
            return Ok(summary);
        }

        let mut written = HashSet::new();
        for event in self.reader.accepted(&self.filter) {
            let extracted = ExtractedPayload::from_event(&event?)?;
            if cancel.is_cancelled() {
                info!(
                    "Export cancelled after {} of {} payloads",
                    summary.completed, total
                );
                return Err(Error::Cancelled);
            }

            let path = self.destination.join(extracted.filename(&self.prefix));
            std::fs::write(&path, extracted.decoded_payload())?;
            debug!("Wrote {:?}", path);

            summary.written += 1;
            if written.insert(extracted.identity()) {
                summary.completed += 1;
            }
            on_progress(Progress::Wrote {
                completed: summary.completed,
                total,
                path,
            });
        }

        info!(
            "Exported {} files for {} of {} payloads to {:?}",
            summary.written, summary.completed, total, self.destination
        );
        Ok(summary)
    }

    /// Discovery followed by export.
    pub fn run<P>(&self, cancel: &CancelToken, on_progress: P) -> Result<ExportSummary, Error>
    where
        P: FnMut(Progress),
    {
        self.check_destination()?;
        let total = self.discover(cancel)?.len();
        self.export(total, cancel, on_progress)
    }
}
