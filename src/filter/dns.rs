use crate::eve::Event;
use crate::filter::EventFilter;

/// DNS answers for names that do not exist.
///
/// Same as `jq -c 'select(.dns.rcode=="NXDOMAIN")'`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NxDomainFilter;

impl EventFilter for NxDomainFilter {
    fn accept(&self, event: &Event) -> bool {
        event.str_at(&["dns", "rcode"]) == Some("NXDOMAIN")
    }
}
