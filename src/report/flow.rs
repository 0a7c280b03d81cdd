use crate::eve::{field_string, is_truthy, Event};
use crate::report::{top_n, Aggregate};

use std::collections::HashMap;

/// `(proto, dest_port)` as rendered by [`field_string`]. Keys are the rendered text,
/// so a port written as `443` and one written as `"443"` share a key.
pub type ProtoPort = (String, String);

/// Flow counts per protocol and destination port.
///
/// Same as `jq -c 'select(.event_type=="flow")|[.proto, .dest_port]' | sort | uniq -c`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlowProtoReport {
    port_proto_count: HashMap<ProtoPort, usize>,
}

impl FlowProtoReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts flow events carrying both `proto` and `dest_port`. A falsy port is
    /// counted under the empty string.
    pub fn ingest(&mut self, event: &Event) {
        if !event.is_event_type("flow") {
            return;
        }
        let (proto, port) = match (event.get("proto"), event.get("dest_port")) {
            (Some(proto), Some(port)) => (proto, port),
            _ => return,
        };
        let port = if is_truthy(port) {
            field_string(Some(port))
        } else {
            String::new()
        };
        *self
            .port_proto_count
            .entry((field_string(Some(proto)), port))
            .or_insert(0) += 1;
    }

    pub fn count(&self, proto: &str, port: &str) -> usize {
        self.port_proto_count
            .get(&(proto.to_owned(), port.to_owned()))
            .copied()
            .unwrap_or(0)
    }

    pub fn counts(&self) -> &HashMap<ProtoPort, usize> {
        &self.port_proto_count
    }

    pub fn len(&self) -> usize {
        self.port_proto_count.len()
    }

    pub fn is_empty(&self) -> bool {
        self.port_proto_count.is_empty()
    }

    pub fn top(&self, n: usize) -> Vec<(ProtoPort, usize)> {
        top_n(&self.port_proto_count, n)
    }
}

impl Aggregate for FlowProtoReport {
    fn observe(&mut self, event: &Event) {
        self.ingest(event)
    }
}
