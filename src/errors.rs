use std::path::PathBuf;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("IO Error: {0:?}")]
    Io(#[from] std::io::Error),
    #[error("Serde json conversion error: {0:?}")]
    SerdeJson(#[from] serde_json::Error),
    #[error("Invalid date passed: {value}")]
    InvalidTimestamp { value: String },
    #[error("{value} has no time zone information")]
    NaiveCutoff { value: String },
    #[error("Event is missing required field '{field}'")]
    MissingField { field: &'static str },
    #[error("Cannot use file {path:?}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Decoded value is not a JSON object: {line}")]
    NotAnObject { line: String },
    #[error("Destination {path:?} does not exist or is not a directory")]
    DestinationMissing { path: PathBuf },
    #[error("Cancelled")]
    Cancelled,
    #[error("{msg}")]
    Custom { msg: String },
}

impl Error {
    pub fn invalid_timestamp(value: impl Into<String>) -> Self {
        Error::InvalidTimestamp {
            value: value.into(),
        }
    }
}
