use crate::errors::Error;
use crate::eve::{parse_cutoff, EveReader, EveTail, FilePolicy, DEFAULT_TIMESTAMP_10Y_AGO};
use crate::filter::{EventFilter, FilterKind};
use crate::payload::{PayloadExporter, DEFAULT_PREFIX};
use crate::report::HostDataUse;
use crate::task::CancelToken;

use chrono::{DateTime, Utc};
use log::debug;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration options for reading eve logs
#[derive(Clone, Debug)]
pub struct Config {
    /// Eve files to read, in order
    pub eve_files: Vec<PathBuf>,
    /// Time bound filters only accept events strictly after this instant
    pub cutoff: DateTime<Utc>,
    /// Filter installed between the reader and its consumer
    pub filter: FilterKind,
    /// What to do with eve files that cannot be read
    pub file_policy: FilePolicy,
    /// Directory payloads are exported to, must exist
    pub report_dir: PathBuf,
    /// First segment of every exported file name
    pub export_prefix: String,
    /// Host tracked by the data use report
    pub host_ip: Option<IpAddr>,
    /// How long tail mode sleeps when no new data is available
    pub tail_poll_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            eve_files: vec![{
                if let Some(e) = std::env::var_os("SURICATA_EVE").map(PathBuf::from) {
                    e
                } else {
                    PathBuf::from("/var/log/suricata/eve.json")
                }
            }],
            cutoff: *DEFAULT_TIMESTAMP_10Y_AGO,
            filter: FilterKind::default(),
            file_policy: FilePolicy::default(),
            report_dir: PathBuf::from("."),
            export_prefix: DEFAULT_PREFIX.to_owned(),
            host_ip: None,
            tail_poll_interval: Duration::from_secs(1),
        }
    }
}

impl Config {
    /// Sets the cutoff from a string such as `2022-02-08T16:32:14Z`. Strings without
    /// an offset fail with [`Error::NaiveCutoff`].
    pub fn set_cutoff_str(&mut self, cutoff: &str) -> Result<(), Error> {
        self.cutoff = parse_cutoff(cutoff)?;
        debug!("Cutoff set to {}", self.cutoff);
        Ok(())
    }

    pub fn reader(&self) -> EveReader {
        EveReader::new(self.eve_files.iter().cloned()).with_policy(self.file_policy)
    }

    pub fn data_filter(&self) -> Box<dyn EventFilter> {
        self.filter.build(self.cutoff)
    }

    pub fn payload_exporter(&self) -> PayloadExporter {
        PayloadExporter::new(self.reader(), self.data_filter(), self.report_dir.clone())
            .with_prefix(self.export_prefix.clone())
    }

    pub fn host_data_use(&self) -> Result<HostDataUse, Error> {
        self.host_ip.map(HostDataUse::new).ok_or_else(|| Error::Custom {
            msg: "No host ip configured".to_owned(),
        })
    }

    /// Follows the first configured eve file.
    pub fn tail(&self, cancel: CancelToken) -> Result<EveTail, Error> {
        let path = self.eve_files.first().ok_or_else(|| Error::Custom {
            msg: "No eve file configured".to_owned(),
        })?;
        Ok(EveTail::open(path, cancel)?.with_poll_interval(self.tail_poll_interval))
    }
}
