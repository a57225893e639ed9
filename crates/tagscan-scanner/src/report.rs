//! Status report for the owning system's aggregated telemetry.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tagscan_core::{SwipeResult, TagId};
use tagscan_hardware::FirmwareVersion;

/// Snapshot of scanner counters and reader status.
///
/// Produced by [`Scanner::report`](crate::Scanner::report) without touching
/// scan state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScannerReport {
    /// Component name.
    pub name: String,

    /// Polls that found a tag, new or repeat.
    pub scan_count: u64,

    /// Polls that found no tag.
    pub miss_count: u64,

    /// Whether a reader chip was detected at startup.
    pub reader_available: bool,

    /// Last accepted tag, when enabled in configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_tag: Option<TagId>,

    /// Swipes dispatched to the handler.
    pub swipe_count: u64,

    /// Reads of the same tag inside the debounce window.
    pub repeat_count: u64,

    /// Reads dropped because the UID was empty or too long.
    pub rejected_count: u64,

    /// Polls where the driver reported a bus error.
    pub read_error_count: u64,

    /// Cache lookups that found the tag.
    pub cache_hits: u64,

    /// Cache lookups that did not find the tag.
    pub cache_misses: u64,

    /// Result code of the last handler call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_result: Option<SwipeResult>,

    /// Firmware of the detected chip.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firmware: Option<FirmwareVersion>,

    /// Wall-clock time the report was taken.
    pub generated_at: DateTime<Utc>,
}

impl ScannerReport {
    /// Render the report as a JSON object.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
