use crate::eve::Event;
use crate::filter::EventFilter;

use serde_json::Value;

/// A payload field counts when it is truthy and not the literal string `"null"`.
fn has_field(event: &Event, key: &str) -> bool {
    match event.get(key) {
        Some(Value::String(s)) => !s.is_empty() && s != "null",
        Some(v) => crate::eve::is_truthy(v),
        None => false,
    }
}

/// Alerts carrying a printable or raw payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WithPrintablePayloadFilter;

impl EventFilter for WithPrintablePayloadFilter {
    fn accept(&self, event: &Event) -> bool {
        event.is_event_type("alert")
            && (has_field(event, "payload_printable") || has_field(event, "payload"))
    }
}

/// Alerts carrying a raw payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WithPayloadFilter;

impl EventFilter for WithPayloadFilter {
    fn accept(&self, event: &Event) -> bool {
        event.is_event_type("alert") && has_field(event, "payload")
    }
}
