//! Decode telemetry: which strategies actually win on a deployment.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

/// Running hit counters, keyed by strategy name.
#[derive(Debug, Clone, Default)]
pub struct DecodeStats {
    hits: HashMap<&'static str, u64>,
    total: u64,
}

/// Point-in-time copy of the counters, serialized as
/// `{"total":N,"strategies":{"name":count,...}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub total: u64,
    pub strategies: BTreeMap<String, u64>,
}

impl DecodeStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&mut self, strategy: &'static str) {
        *self.hits.entry(strategy).or_insert(0) += 1;
        self.total += 1;
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn hits(&self, strategy: &str) -> u64 {
        self.hits.get(strategy).copied().unwrap_or(0)
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            total: self.total,
            strategies: self
                .hits
                .iter()
                .map(|(&name, &n)| (name.to_string(), n))
                .collect(),
        }
    }

    pub fn reset(&mut self) {
        self.hits.clear();
        self.total = 0;
    }
}

impl StatsSnapshot {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"total":0,"strategies":{}}"#.to_string())
    }
}
