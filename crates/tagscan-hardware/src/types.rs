//! Common types shared across reader driver implementations.
//!
//! This module defines the bus configuration handed to a driver at startup,
//! the chip identification decoded from its firmware word, and descriptive
//! reader metadata.

use serde::{Deserialize, Serialize};
use std::fmt;
use tagscan_core::constants::{DEFAULT_I2C_FREQUENCY_HZ, DEFAULT_SCL_PIN, DEFAULT_SDA_PIN};

/// Bus wiring and speed used to reach the reader chip.
///
/// Defaults match the I2C wiring of an ESP32-PoE board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusConfig {
    /// I2C data pin.
    pub sda_pin: u8,

    /// I2C clock pin.
    pub scl_pin: u8,

    /// Bus frequency in Hz.
    pub frequency_hz: u32,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            sda_pin: DEFAULT_SDA_PIN,
            scl_pin: DEFAULT_SCL_PIN,
            frequency_hz: DEFAULT_I2C_FREQUENCY_HZ,
        }
    }
}

/// Reader chip family, identified from the firmware IC byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ChipModel {
    /// NXP PN532.
    Pn532,

    /// NXP PN533.
    Pn533,

    /// NXP MFRC522 (version register 0x91 or 0x92).
    Mfrc522,

    /// Anything else that answered, with its IC byte.
    Unknown(u8),
}

impl ChipModel {
    /// Identify a chip from its IC byte.
    pub fn from_ic(ic: u8) -> Self {
        match ic {
            0x32 => Self::Pn532,
            0x33 => Self::Pn533,
            0x91 | 0x92 => Self::Mfrc522,
            other => Self::Unknown(other),
        }
    }

    /// Get a human-readable name for the chip.
    pub fn name(&self) -> &str {
        match self {
            Self::Pn532 => "PN532",
            Self::Pn533 => "PN533",
            Self::Mfrc522 => "MFRC522",
            Self::Unknown(_) => "Unknown",
        }
    }

    /// Check if this chip belongs to the PN53x family.
    pub fn is_pn53x(&self) -> bool {
        matches!(self, Self::Pn532 | Self::Pn533)
    }
}

impl fmt::Display for ChipModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(ic) => write!(f, "Unknown (0x{ic:02X})"),
            other => f.write_str(other.name()),
        }
    }
}

/// Firmware identification reported by the reader chip.
///
/// PN53x chips answer `GetFirmwareVersion` with four bytes (IC, version,
/// revision, support flags); drivers pack them big-endian into one word.
///
/// # Examples
///
/// ```
/// use tagscan_hardware::types::{ChipModel, FirmwareVersion};
///
/// let fw = FirmwareVersion::from_word(0x3201_0607);
/// assert_eq!(fw.chip(), ChipModel::Pn532);
/// assert_eq!(fw.to_string(), "PN532 firmware 1.6");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirmwareVersion {
    /// IC identification byte.
    pub ic: u8,

    /// Firmware major version.
    pub version: u8,

    /// Firmware revision.
    pub revision: u8,

    /// Supported protocol bit flags.
    pub support: u8,
}

impl FirmwareVersion {
    /// Decode a packed firmware word.
    pub fn from_word(word: u32) -> Self {
        let [ic, version, revision, support] = word.to_be_bytes();
        Self {
            ic,
            version,
            revision,
            support,
        }
    }

    /// Pack back into the driver word layout.
    pub fn to_word(&self) -> u32 {
        u32::from_be_bytes([self.ic, self.version, self.revision, self.support])
    }

    /// Chip family this firmware belongs to.
    pub fn chip(&self) -> ChipModel {
        ChipModel::from_ic(self.ic)
    }
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} firmware {}.{}",
            self.chip(),
            self.version,
            self.revision
        )
    }
}

/// NFC reader information.
///
/// Contains reader-specific metadata such as the driver name and
/// supported protocols.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReaderInfo {
    /// Reader name (e.g., "PN532 over I2C").
    pub name: String,

    /// List of supported protocols (e.g., ["ISO14443A"]).
    pub protocols: Vec<String>,
}

impl ReaderInfo {
    /// Create a new ReaderInfo.
    pub fn new(name: impl Into<String>, protocols: Vec<String>) -> Self {
        Self {
            name: name.into(),
            protocols,
        }
    }
}
