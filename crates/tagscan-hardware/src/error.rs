//! Error types for reader operations.
//!
//! This module defines error types specific to NFC reader driver operations,
//! covering a missing chip, bus failures, timeouts and malformed responses.
//!
//! Drivers pick the variant by where the failure happened:
//!
//! | Method | Typical errors |
//! |--------|----------------|
//! | [`NfcReader::begin`](crate::NfcReader::begin) | `communication`, `Io` |
//! | [`NfcReader::configure`](crate::NfcReader::configure) | `initialization_failed`, `not_detected` |
//! | [`NfcReader::read_passive_target`](crate::NfcReader::read_passive_target) | `timeout`, `communication`, `invalid_data` |
//!
//! The scanner treats every variant the same way: a failed `begin` or
//! `configure` leaves it disabled, a failed read is counted and skipped.

/// Result type alias for reader operations.
pub type Result<T> = std::result::Result<T, HardwareError>;

/// Errors that can occur during reader driver operations.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// No supported chip answered on the bus.
    #[error("Reader not detected: {device}")]
    NotDetected { device: String },

    /// Operation timed out after specified duration.
    #[error("Operation timeout after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Bus communication error.
    #[error("Communication error: {message}")]
    CommunicationError { message: String },

    /// Invalid data received from the chip.
    #[error("Invalid data: {message}")]
    InvalidData { message: String },

    /// Reader initialization failed.
    #[error("Initialization failed: {message}")]
    InitializationFailed { message: String },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HardwareError {
    /// Create a new not detected error.
    pub fn not_detected(device: impl Into<String>) -> Self {
        Self::NotDetected {
            device: device.into(),
        }
    }

    /// Create a new timeout error.
    pub fn timeout(duration_ms: u64) -> Self {
        Self::Timeout { duration_ms }
    }

    /// Create a new communication error.
    pub fn communication(message: impl Into<String>) -> Self {
        Self::CommunicationError {
            message: message.into(),
        }
    }

    /// Create a new invalid data error.
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    /// Create a new initialization failed error.
    pub fn initialization_failed(message: impl Into<String>) -> Self {
        Self::InitializationFailed {
            message: message.into(),
        }
    }
}
