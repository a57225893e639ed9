//! Scanner configuration.
//!
//! Every field has a documented default (see
//! [`tagscan_core::constants`]), so a partial JSON document is a valid
//! configuration.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use tagscan_scanner::ScannerConfig;
//!
//! let config = ScannerConfig::from_json_str(r#"{ "debounce_window_ms": 500 }"#).unwrap();
//! assert_eq!(config.debounce_window(), Duration::from_millis(500));
//! assert_eq!(config.poll_interval(), Duration::from_millis(100));
//! assert!(config.use_cache);
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tagscan_core::constants::{
    DEFAULT_DEBOUNCE_WINDOW_MS, DEFAULT_PASSIVE_ACTIVATION_RETRIES, DEFAULT_POLL_INTERVAL_MS,
    MAX_INTERVAL_MS,
};
use tagscan_core::{Error, Result};
use tagscan_hardware::BusConfig;

/// Configuration for a [`Scanner`](crate::Scanner).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Minimum time before an identical UID counts as a new swipe.
    pub debounce_window_ms: u64,

    /// Cooldown between reader polls.
    pub poll_interval_ms: u64,

    /// Consult the attached tag cache on each new swipe.
    pub use_cache: bool,

    /// Include the last seen tag in reports.
    pub report_last_tag: bool,

    /// Passive activation retries the driver may make per poll.
    pub passive_activation_retries: u8,

    /// Reader bus wiring.
    pub bus: BusConfig,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            debounce_window_ms: DEFAULT_DEBOUNCE_WINDOW_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            use_cache: true,
            report_last_tag: true,
            passive_activation_retries: DEFAULT_PASSIVE_ACTIVATION_RETRIES,
            bus: BusConfig::default(),
        }
    }
}

impl ScannerConfig {
    /// Parse a JSON configuration document and validate it.
    ///
    /// # Errors
    /// Returns `Error::Config` if the document is malformed or fails
    /// [`validate`](Self::validate).
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("Invalid scanner configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    ///
    /// # Errors
    /// Returns `Error::Io` if the file cannot be read and `Error::Config` if
    /// its content is invalid.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check the configuration for values the scanner cannot run with.
    ///
    /// # Errors
    /// Returns `Error::Config` if:
    /// - An interval exceeds one hour
    /// - The bus frequency is zero
    /// - SDA and SCL are the same pin
    pub fn validate(&self) -> Result<()> {
        if self.debounce_window_ms > MAX_INTERVAL_MS {
            return Err(Error::Config(format!(
                "debounce_window_ms must be at most {MAX_INTERVAL_MS}, got {}",
                self.debounce_window_ms
            )));
        }
        if self.poll_interval_ms > MAX_INTERVAL_MS {
            return Err(Error::Config(format!(
                "poll_interval_ms must be at most {MAX_INTERVAL_MS}, got {}",
                self.poll_interval_ms
            )));
        }
        if self.bus.frequency_hz == 0 {
            return Err(Error::Config("bus.frequency_hz must be non-zero".to_string()));
        }
        if self.bus.sda_pin == self.bus.scl_pin {
            return Err(Error::Config(format!(
                "bus.sda_pin and bus.scl_pin must differ, both are {}",
                self.bus.sda_pin
            )));
        }
        Ok(())
    }

    /// Debounce window as a duration.
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_window_ms)
    }

    /// Poll cooldown as a duration.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Set the debounce window.
    pub fn with_debounce_window(mut self, window: Duration) -> Self {
        self.debounce_window_ms = duration_to_ms(window);
        self
    }

    /// Set the poll cooldown.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_ms = duration_to_ms(interval);
        self
    }

    /// Enable or disable cache lookups.
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.use_cache = enabled;
        self
    }

    /// Include or omit the last tag in reports.
    pub fn with_report_last_tag(mut self, enabled: bool) -> Self {
        self.report_last_tag = enabled;
        self
    }

    /// Set the passive activation retry count.
    pub fn with_passive_activation_retries(mut self, retries: u8) -> Self {
        self.passive_activation_retries = retries;
        self
    }

    /// Set the reader bus configuration.
    pub fn with_bus(mut self, bus: BusConfig) -> Self {
        self.bus = bus;
        self
    }
}

fn duration_to_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
