use crate::eve::Event;
use crate::report::{top_n, Aggregate};

use std::collections::HashMap;

/// How often each HTTP user agent shows up.
///
/// Events without `http.http_user_agent`, or with an empty one, are skipped instead
/// of being counted under a null key.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TopUserAgents {
    agents: HashMap<String, usize>,
}

impl TopUserAgents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ingest(&mut self, event: &Event) {
        match event.str_at(&["http", "http_user_agent"]) {
            Some(agent) if !agent.is_empty() => {
                *self.agents.entry(agent.to_owned()).or_insert(0) += 1;
            }
            _ => {}
        }
    }

    pub fn count(&self, agent: &str) -> usize {
        self.agents.get(agent).copied().unwrap_or(0)
    }

    pub fn agents(&self) -> &HashMap<String, usize> {
        &self.agents
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn top(&self, n: usize) -> Vec<(String, usize)> {
        top_n(&self.agents, n)
    }
}

impl Aggregate for TopUserAgents {
    fn observe(&mut self, event: &Event) {
        self.ingest(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::convert::TryFrom;

    fn http(agent: serde_json::Value) -> Event {
        Event::try_from(json!({"event_type": "http", "http": {"hostname": "www.msftncsi.com", "http_user_agent": agent}}))
            .expect("Not an object")
    }

    #[test]
    fn counts_agents() {
        let mut report = TopUserAgents::new();
        for _ in 0..5 {
            report.ingest(&http(json!("Microsoft NCSI")));
        }
        report.ingest(&http(json!("WinHTTP loader/1.0")));
        assert_eq!(report.count("Microsoft NCSI"), 5);
        assert_eq!(report.count("WinHTTP loader/1.0"), 1);
        assert_eq!(report.top(1), vec![("Microsoft NCSI".to_owned(), 5)]);
    }

    #[test]
    fn skips_missing_and_empty_agents() {
        let mut report = TopUserAgents::new();
        report.ingest(&http(json!("")));
        report.ingest(&http(json!(null)));
        report.ingest(&Event::try_from(json!({"event_type": "dns"})).expect("Not an object"));
        assert!(report.is_empty());
    }

    #[test]
    fn fresh_instances_start_empty() {
        let mut first = TopUserAgents::new();
        first.ingest(&http(json!("test")));
        let second = TopUserAgents::new();
        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
    }
}
