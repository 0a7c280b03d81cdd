use crate::eve::Event;
use crate::report::Aggregate;

use log::*;
use std::net::IpAddr;

/// Bytes of netflow traffic sent to one host.
///
/// Same as `jq -s 'map(select(.event_type=="netflow" and .dest_ip==$ip).netflow.bytes)|add'`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HostDataUseReport {
    bytes: u64,
}

impl HostDataUseReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ingest(&mut self, event: &Event, target: &IpAddr) {
        if !event.is_event_type("netflow") || !dest_matches(event, target) {
            return;
        }
        match event.u64_at(&["netflow", "bytes"]) {
            Some(bytes) => match self.bytes.checked_add(bytes) {
                Some(total) => self.bytes = total,
                None => {
                    warn!("Byte count to {} overflowed, saturating", target);
                    self.bytes = u64::MAX;
                }
            },
            None => debug!("Netflow event to {} without byte count", target),
        }
    }

    pub fn bytes(&self) -> u64 {
        self.bytes
    }
}

fn dest_matches(event: &Event, target: &IpAddr) -> bool {
    match event.str_at(&["dest_ip"]) {
        Some(dest) => match dest.parse::<IpAddr>() {
            Ok(ip) => ip == *target,
            Err(_) => dest == target.to_string(),
        },
        None => false,
    }
}

/// A [`HostDataUseReport`] bound to the host it tracks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HostDataUse {
    target: IpAddr,
    report: HostDataUseReport,
}

impl HostDataUse {
    pub fn new(target: IpAddr) -> Self {
        HostDataUse {
            target,
            report: HostDataUseReport::new(),
        }
    }

    pub fn target(&self) -> &IpAddr {
        &self.target
    }

    pub fn report(&self) -> &HostDataUseReport {
        &self.report
    }

    pub fn bytes(&self) -> u64 {
        self.report.bytes()
    }
}

impl Aggregate for HostDataUse {
    fn observe(&mut self, event: &Event) {
        self.report.ingest(event, &self.target)
    }
}
