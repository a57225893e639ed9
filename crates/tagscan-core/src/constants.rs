//! Core constants for the tag scanner.
//!
//! Sizing limits for tag identifiers and the documented defaults of every
//! tunable the scanner exposes. Runtime code reads these through
//! configuration types, never directly, so each value here is a default
//! rather than a hard limit (except the UID sizing, which bounds buffers).
//!
//! # Tag Identifier Format
//!
//! A tag UID is rendered as upper-case hex byte groups joined by dashes:
//!
//! ```text
//! [0x04, 0xA1, 0x2B]  ->  "04-A1-2B"
//! ```
//!
//! # Usage
//!
//! ```
//! use tagscan_core::constants::*;
//!
//! assert_eq!(TAG_ID_CAPACITY, MAX_UID_BYTES * 4);
//! assert!(DEFAULT_POLL_INTERVAL_MS < DEFAULT_DEBOUNCE_WINDOW_MS);
//! ```

// ============================================================================
// Tag Identifier Sizing
// ============================================================================

/// Maximum UID length in bytes accepted from a reader.
///
/// ISO 14443 defines single (4), double (7) and triple (10) size UIDs.
/// Anything longer is rejected by the scanner.
pub const MAX_UID_BYTES: usize = 10;

/// Capacity of the formatted tag identifier buffer in bytes.
///
/// Leaves room for up to a three character group plus a dash (or
/// terminator) per UID byte. Hex formatting needs three per byte, so the
/// longest identifier (`MAX_UID_BYTES * 3 - 1` characters) always fits.
pub const TAG_ID_CAPACITY: usize = MAX_UID_BYTES * 4;

/// Separator between byte groups in a formatted tag identifier.
pub const TAG_ID_SEPARATOR: char = '-';

// ============================================================================
// Timing Defaults
// ============================================================================

/// Default debounce window in milliseconds.
///
/// An identical UID seen again within this window belongs to the same
/// physical swipe and is not dispatched again.
pub const DEFAULT_DEBOUNCE_WINDOW_MS: u64 = 1000;

/// Default cooldown between reader polls in milliseconds (10 Hz).
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Upper bound accepted for any configured interval (one hour).
pub const MAX_INTERVAL_MS: u64 = 60 * 60 * 1000;

// ============================================================================
// Reader Defaults
// ============================================================================

/// Default I2C data pin (ESP32-PoE wiring).
pub const DEFAULT_SDA_PIN: u8 = 13;

/// Default I2C clock pin (ESP32-PoE wiring).
pub const DEFAULT_SCL_PIN: u8 = 16;

/// Default I2C bus frequency in Hz.
pub const DEFAULT_I2C_FREQUENCY_HZ: u32 = 100_000;

/// Default number of passive activation retries per poll.
///
/// Kept at one so a single poll never waits on the reader for long.
pub const DEFAULT_PASSIVE_ACTIVATION_RETRIES: u8 = 1;

/// Name under which the scanner reports itself.
pub const COMPONENT_NAME: &str = "RFID";
