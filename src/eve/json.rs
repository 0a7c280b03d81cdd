use crate::eve::Event;
use crate::Error;
use serde_json::{Deserializer, Value};
use std::convert::TryFrom;

const BOM: char = '\u{feff}';

pub struct JsonParser;

impl JsonParser {
    /// Decodes one eve line. The strict decoder runs first, the lenient one only when
    /// that fails.
    pub fn parse(line: &str) -> Result<Event, Error> {
        match Self::parse_strict(line) {
            Ok(event) => Ok(event),
            Err(strict) => {
                log::debug!("Strict decode failed ({}), trying lenient decode", strict);
                Self::parse_lenient(line).map_err(|_| strict)
            }
        }
    }

    pub fn parse_strict(line: &str) -> Result<Event, Error> {
        let value: Value = serde_json::from_str(line)?;
        Event::try_from(value)
    }

    /// Strips BOM, NUL padding and whitespace and reads exactly one value off a
    /// stream deserializer.
    pub fn parse_lenient(line: &str) -> Result<Event, Error> {
        let cleaned =
            line.trim_matches(|c: char| c == BOM || c == '\0' || c.is_whitespace());
        let mut stream_deserializer = Deserializer::from_str(cleaned).into_iter::<Value>();

        let value = match stream_deserializer.next() {
            Some(Ok(v)) => v,
            Some(Err(e)) => return Err(Error::SerdeJson(e)),
            None => {
                return Err(Error::Custom {
                    msg: "Empty line".to_owned(),
                })
            }
        };
        let rem = &cleaned[stream_deserializer.byte_offset()..];
        if !rem.trim().is_empty() {
            return Err(Error::Custom {
                msg: format!("Trailing data after event: {}", rem),
            });
        }
        Event::try_from(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use env_logger;

    #[test]
    fn read_single_object() {
        let _ = env_logger::try_init();

        let test = r#"{"thiskey":"is for this object", "fkey": 23.4, "even":{"with":"inner"}}"#;

        let event = JsonParser::parse(test).expect("Failed to parse");

        assert_eq!(event.str_at(&["even", "with"]), Some("inner"));
    }

    #[test]
    fn lenient_decode_strips_padding() {
        let _ = env_logger::try_init();

        let test = "\u{feff}\0\0{\"event_type\":\"dns\"}\0\0";

        assert!(JsonParser::parse_strict(test).is_err());
        let event = JsonParser::parse(test).expect("Failed to parse");

        assert!(event.is_event_type("dns"));
    }

    #[test]
    fn rejects_partial_objects() {
        let _ = env_logger::try_init();

        let test = r#"{"key1":"key with a paren set {}","key2":12345}{"another":"part"#;

        assert!(JsonParser::parse(test).is_err());
    }

    #[test]
    fn rejects_multiple_objects() {
        let _ = env_logger::try_init();

        let test = r#"{"key1":"key with a paren set {}","key2":12345}{"another":"part being sent"}"#;

        assert!(JsonParser::parse(test).is_err());
    }

    #[test]
    fn rejects_scalars() {
        let _ = env_logger::try_init();

        let err = JsonParser::parse("42").unwrap_err();
        assert!(matches!(err, Error::NotAnObject { .. }));
    }
}
