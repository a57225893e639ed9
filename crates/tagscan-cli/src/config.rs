//! Node configuration file.
//!
//! ```json
//! {
//!   "scanner": { "debounce_window_ms": 500, "use_cache": true },
//!   "cached_tags": [ { "tag": "04-A1-2B", "approved": true } ]
//! }
//! ```

use anyhow::Context;
use serde::Deserialize;
use std::path::Path;
use tagscan_core::TagId;
use tagscan_scanner::{MemoryTagCache, ScannerConfig};

/// Top-level configuration for the CLI.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Scanner settings.
    pub scanner: ScannerConfig,

    /// Tags preloaded into the local cache.
    pub cached_tags: Vec<CachedTag>,
}

/// A cache entry from the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CachedTag {
    pub tag: TagId,
    pub approved: bool,
}

impl NodeConfig {
    /// Load and validate a configuration file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_json_str(&json).with_context(|| format!("loading {}", path.display()))
    }

    /// Parse and validate configuration text.
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.scanner.validate()?;
        Ok(config)
    }

    /// Build the tag cache from the configured entries.
    pub fn tag_cache(&self) -> MemoryTagCache {
        self.cached_tags
            .iter()
            .map(|entry| (entry.tag, entry.approved))
            .collect()
    }
}
