//! # suricata-log
//!
//! Read suricata eve logs, select events with filters, and feed them into reports or
//! export alert payloads to files.
//!
//! ```rust,no_run
//! # use suricata_log::prelude::*;
//!
//! fn main() -> Result<(), Error> {
//!     let mut config = Config::default();
//!     config.filter = FilterKind::Timestamp;
//!     config.set_cutoff_str("2022-02-08T00:00:00Z")?;
//!
//!     let reader = config.reader();
//!     let filter = config.data_filter();
//!     let mut report = FlowProtoReport::default();
//!     ingest_all(reader.accepted(&filter), &mut report, &CancelToken::default())?;
//!
//!     for ((proto, port), count) in report.top(10) {
//!         println!("{} {}/{}", count, proto, port);
//!     }
//!
//!     let summary = smol::block_on(spawn_export(config.payload_exporter()).join())?;
//!     println!("Exported {} payloads", summary.completed);
//!     Ok(())
//! }
//! ```
#![deny(unused_must_use, unused_imports, bare_trait_objects)]
pub mod config;
mod errors;
pub mod eve;
pub mod filter;
pub mod payload;
pub mod report;
pub mod task;

pub use errors::Error;

pub mod prelude {
    pub use super::config::Config;
    pub use super::errors::Error;
    pub use super::eve::*;
    pub use super::filter::{
        AlwaysTrueFilter, EventFilter, FilterKind, NxDomainFilter, OnlyAlertsFilter,
        TimestampFilter, WithPayloadFilter, WithPrintablePayloadFilter,
    };
    pub use super::payload::{
        generate_filename, ExportSummary, ExtractedPayload, PayloadExporter, Progress,
    };
    pub use super::report::{
        ingest_all, Aggregate, FlowProtoReport, HostDataUse, HostDataUseReport, TopUserAgents,
    };
    pub use super::task::{
        spawn_export, spawn_export_with, spawn_report, spawn_report_with, CancelToken, Job,
    };

    pub use chrono;
}
