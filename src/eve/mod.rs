mod event;
mod json;
mod reader;
mod tail;
mod timestamp;

pub use event::{field_string, is_truthy, Event};
pub use json::JsonParser;
pub use reader::{Accepted, EveReader, Events, FilePolicy};
pub use tail::EveTail;
pub use timestamp::{
    parse_cutoff, parse_date_time, parse_timestamp, to_utc, AsUtc, IntoCutoff, IntoTimestamp,
    DEFAULT_TIMESTAMP_10M_AGO, DEFAULT_TIMESTAMP_10Y_AGO, FORMAT,
};
