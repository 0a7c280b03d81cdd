use crate::errors::Error;
use crate::eve::timestamp::parse_date_time;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::convert::TryFrom;

/// One decoded eve record.
///
/// Eve records do not share a schema, so the record is kept as a JSON object and
/// fields are looked up by name. Lookups return `None` for absent keys instead of
/// failing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Event {
    inner: Map<String, Value>,
}

impl Event {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.inner.get(key)
    }

    /// Nested lookup, `event.path(&["dns", "rcode"])`.
    pub fn path(&self, keys: &[&str]) -> Option<&Value> {
        let (first, rest) = keys.split_first()?;
        rest.iter()
            .try_fold(self.inner.get(*first)?, |value, key| value.get(*key))
    }

    pub fn str_at(&self, keys: &[&str]) -> Option<&str> {
        self.path(keys).and_then(Value::as_str)
    }

    pub fn u64_at(&self, keys: &[&str]) -> Option<u64> {
        self.path(keys).and_then(Value::as_u64)
    }

    /// Value of the first of `keys` present at the top level.
    pub fn first_of(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter().find_map(|k| self.inner.get(*k))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    pub fn event_type(&self) -> Option<&str> {
        self.str_at(&["event_type"])
    }

    pub fn is_event_type(&self, event_type: &str) -> bool {
        self.event_type() == Some(event_type)
    }

    /// Raw `timestamp` field, as written by suricata.
    pub fn raw_timestamp(&self) -> Option<&str> {
        self.str_at(&["timestamp"])
    }

    pub fn timestamp(&self) -> Result<DateTime<Utc>, Error> {
        match self.get("timestamp") {
            Some(Value::String(s)) => parse_date_time(s),
            Some(other) => Err(Error::invalid_timestamp(other.to_string())),
            None => Err(Error::MissingField { field: "timestamp" }),
        }
    }

    /// Whether the field at `keys` holds a value that is neither null, false, zero
    /// nor empty.
    pub fn is_truthy(&self, keys: &[&str]) -> bool {
        self.path(keys).map(is_truthy).unwrap_or(false)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.inner
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.inner
    }
}

pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Renders a field for use in keys and file names: strings verbatim, scalars through
/// their JSON form, null as the empty string.
pub fn field_string(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

impl From<Map<String, Value>> for Event {
    fn from(inner: Map<String, Value>) -> Self {
        Event { inner }
    }
}

impl TryFrom<Value> for Event {
    type Error = Error;

    fn try_from(v: Value) -> Result<Self, Self::Error> {
        match v {
            Value::Object(inner) => Ok(Event { inner }),
            other => Err(Error::NotAnObject {
                line: other.to_string(),
            }),
        }
    }
}

impl TryFrom<&[u8]> for Event {
    type Error = Error;

    fn try_from(v: &[u8]) -> Result<Self, Self::Error> {
        log::trace!("Deserializing {}", String::from_utf8_lossy(v));
        let value: Value = serde_json::from_slice(v)?;
        Event::try_from(value)
    }
}
