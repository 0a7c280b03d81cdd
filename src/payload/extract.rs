use crate::errors::Error;
use crate::eve::{field_string, Event};

use base64::{engine::general_purpose, Engine as _};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

/// Used in file names when an alert carries no signature.
pub const NO_SIGNATURE: &str = "NO_SIGNATURE";

lazy_static! {
    static ref NON_WORD_REGEX: Regex = Regex::new(r"\W").expect("Bad regex");
}

/// The parts of an alert needed to name and write its payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExtractedPayload {
    pub timestamp: String,
    pub signature: Option<String>,
    pub severity: Option<u64>,
    pub protocol: String,
    pub src_ip: String,
    pub src_port: String,
    pub dest_ip: String,
    pub dest_port: String,
    pub payload: String,
}

impl ExtractedPayload {
    /// Fields missing from the event become empty strings, except `signature` and
    /// `timestamp` which are required to form an identity. A signature that is
    /// present but null is kept as `None` and named [`NO_SIGNATURE`].
    pub fn from_event(event: &Event) -> Result<Self, Error> {
        let timestamp = event
            .raw_timestamp()
            .ok_or(Error::MissingField { field: "timestamp" })?
            .to_owned();
        let signature = match event
            .get("signature")
            .or_else(|| event.path(&["alert", "signature"]))
        {
            None => return Err(Error::MissingField { field: "signature" }),
            Some(Value::Null) => None,
            Some(other) => Some(field_string(Some(other))),
        };

        Ok(ExtractedPayload {
            timestamp,
            signature,
            severity: event.u64_at(&["alert", "severity"]),
            protocol: field_string(event.first_of(&["app_proto", "proto"])),
            src_ip: field_string(event.get("src_ip")),
            src_port: field_string(event.get("src_port")),
            dest_ip: field_string(event.get("dest_ip")),
            dest_port: field_string(event.get("dest_port")),
            payload: field_string(event.get("payload")),
        })
    }

    /// Signature and timestamp, concatenated. Distinct flows raising the same
    /// signature at the same instant share an identity.
    pub fn identity(&self) -> String {
        format!(
            "{}{}",
            self.signature.as_deref().unwrap_or_default(),
            self.timestamp
        )
    }

    pub fn filename(&self, prefix: &str) -> String {
        generate_filename(prefix, self)
    }

    /// Base64 decoded payload, or the raw field when it is not valid base64.
    pub fn decoded_payload(&self) -> Vec<u8> {
        match general_purpose::STANDARD.decode(self.payload.as_bytes()) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::debug!("Payload for {} is not base64 ({}), writing it raw", self.identity(), e);
                self.payload.clone().into_bytes()
            }
        }
    }
}

/// Spaces become underscores, every other non-word character is dropped.
pub fn sanitize_signature(signature: Option<&str>) -> String {
    match signature {
        Some(signature) => NON_WORD_REGEX
            .replace_all(&signature.replace(' ', "_"), "")
            .into_owned(),
        None => NO_SIGNATURE.to_owned(),
    }
}

/// `<prefix>-<signature>-<timestamp>-<src_ip>:<src_port>-<dest_ip>:<dest_port>`
pub fn generate_filename(prefix: &str, payload: &ExtractedPayload) -> String {
    format!(
        "{}-{}-{}-{}:{}-{}:{}",
        prefix,
        sanitize_signature(payload.signature.as_deref()),
        payload.timestamp,
        payload.src_ip,
        payload.src_port,
        payload.dest_ip,
        payload.dest_port
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::convert::TryFrom;

    fn smtp_alert() -> ExtractedPayload {
        ExtractedPayload {
            timestamp: "2022-02-08T16:32:14.900292+0000".to_owned(),
            signature: Some("SURICATA Applayer Detect protocol only one direction".to_owned()),
            severity: Some(3),
            protocol: "smtp".to_owned(),
            src_ip: "10.2.8.102".to_owned(),
            src_port: "49880".to_owned(),
            dest_ip: "52.96.222.130".to_owned(),
            dest_port: "25".to_owned(),
            payload: String::new(),
        }
    }

    #[test]
    fn filename_for_smtp_alert() {
        assert_eq!(
            generate_filename("payload_export", &smtp_alert()),
            "payload_export-SURICATA_Applayer_Detect_protocol_only_one_direction-2022-02-08T16:32:14.900292+0000-10.2.8.102:49880-52.96.222.130:25"
        );
    }

    #[test]
    fn signature_is_stripped_of_non_word_characters() {
        assert_eq!(
            sanitize_signature(Some("ET POLICY curl User-Agent (Outbound) [x/y]")),
            "ET_POLICY_curl_UserAgent_Outbound_xy"
        );
        assert_eq!(sanitize_signature(None), NO_SIGNATURE);

        let mut unsigned = smtp_alert();
        unsigned.signature = None;
        assert!(unsigned.filename("p").starts_with("p-NO_SIGNATURE-"));
    }

    #[test]
    fn extracts_from_event() {
        let event = Event::try_from(json!({
            "timestamp": "2022-02-08T16:32:20.491791+0000",
            "event_type": "alert",
            "src_ip": "52.96.222.130",
            "src_port": 25,
            "dest_ip": "10.2.8.102",
            "dest_port": 49880,
            "proto": "TCP",
            "app_proto": "smtp",
            "alert": {"signature": "SURICATA SMTP invalid reply", "severity": 3},
            "payload": "TV0NCg=="
        }))
        .expect("Not an object");

        let extracted = ExtractedPayload::from_event(&event).expect("Failed to extract");
        assert_eq!(extracted.protocol, "smtp");
        assert_eq!(extracted.src_port, "25");
        assert_eq!(extracted.severity, Some(3));
        assert_eq!(
            extracted.identity(),
            "SURICATA SMTP invalid reply2022-02-08T16:32:20.491791+0000"
        );
        assert_eq!(extracted.decoded_payload(), b"M]\r\n".to_vec());
    }

    #[test]
    fn top_level_signature_wins() {
        let event = Event::try_from(json!({
            "timestamp": "2022-02-08T16:32:20+0000",
            "signature": "legacy",
            "alert": {"signature": "nested"}
        }))
        .expect("Not an object");
        let extracted = ExtractedPayload::from_event(&event).expect("Failed to extract");
        assert_eq!(extracted.signature.as_deref(), Some("legacy"));
    }

    #[test]
    fn signature_and_timestamp_are_required() {
        let no_sig = Event::try_from(json!({"timestamp": "2022-02-08T16:32:20+0000", "payload": "AA=="}))
            .expect("Not an object");
        let no_ts = Event::try_from(json!({"alert": {"signature": "x"}, "payload": "AA=="}))
            .expect("Not an object");
        assert!(matches!(
            ExtractedPayload::from_event(&no_sig),
            Err(Error::MissingField { field: "signature" })
        ));
        assert!(matches!(
            ExtractedPayload::from_event(&no_ts),
            Err(Error::MissingField { field: "timestamp" })
        ));
    }

    #[test]
    fn null_signature_is_named_sentinel() {
        let event = Event::try_from(json!({
            "timestamp": "2022-02-08T16:32:20+0000",
            "src_ip": "10.2.8.102",
            "src_port": 49880,
            "dest_ip": "52.96.222.130",
            "dest_port": 25,
            "alert": {"signature": null},
            "payload": "AA=="
        }))
        .expect("Not an object");
        let extracted = ExtractedPayload::from_event(&event).expect("Failed to extract");
        assert_eq!(extracted.signature, None);
        assert_eq!(extracted.identity(), "2022-02-08T16:32:20+0000");
        assert_eq!(
            extracted.filename("payload_export"),
            "payload_export-NO_SIGNATURE-2022-02-08T16:32:20+0000-10.2.8.102:49880-52.96.222.130:25"
        );
    }

    #[test]
    fn serializes_extracted_fields() {
        let value = serde_json::to_value(smtp_alert()).expect("Failed to serialize");
        assert_eq!(
            value,
            json!({
                "timestamp": "2022-02-08T16:32:14.900292+0000",
                "signature": "SURICATA Applayer Detect protocol only one direction",
                "severity": 3,
                "protocol": "smtp",
                "src_ip": "10.2.8.102",
                "src_port": "49880",
                "dest_ip": "52.96.222.130",
                "dest_port": "25",
                "payload": ""
            })
        );
    }

    #[test]
    fn plain_text_payload_is_written_raw() {
        let mut alert = smtp_alert();
        alert.payload = "HELO there!".to_owned();
        assert_eq!(alert.decoded_payload(), b"HELO there!".to_vec());
    }
}
