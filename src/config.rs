//! Cascade configuration.
//!
//! Delivered as JSON from the worker (`configure_qr_cascade`) or built in
//! code by native hosts. Missing fields keep their defaults.

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const DEFAULT_HISTORY_DEPTH: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CascadeConfig {
    /// Re-sort the active order by hit count after every N successful
    /// decodes. 0 leaves the order entirely to the caller.
    pub auto_reorder_every: u32,
    /// Greyscale frames kept for the temporal strategies (full-frame mode).
    pub history_depth: usize,
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            auto_reorder_every: 0,
            history_depth: DEFAULT_HISTORY_DEPTH,
        }
    }
}

impl CascadeConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let mut config: Self = serde_json::from_str(json)?;
        config.history_depth = config.history_depth.max(1);
        Ok(config)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}
