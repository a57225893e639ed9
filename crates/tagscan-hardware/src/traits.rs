//! Reader driver trait definition.
//!
//! This module defines the contract between the scanner and an NFC reader
//! chip driver. The scanner owns exactly one driver and calls it from its
//! poll step, so every method is synchronous and expected to return within
//! a bounded bus transaction.

use crate::error::Result;
use crate::types::{BusConfig, FirmwareVersion, ReaderInfo};

/// NFC reader chip driver.
///
/// Implementations wrap the register-level protocol of a reader chip
/// (PN532 over I2C, MFRC522 over SPI, or a mock). The trait is object-safe,
/// so `Box<dyn NfcReader>` works where the chip is selected at runtime.
///
/// # Blocking
///
/// Calls run to completion on the caller's thread. A driver must keep each
/// call short; `read_passive_target` in particular should honour the retry
/// count given to [`configure`](NfcReader::configure) instead of waiting
/// indefinitely for a tag.
///
/// # Examples
///
/// ```
/// use tagscan_hardware::error::Result;
/// use tagscan_hardware::traits::NfcReader;
/// use tagscan_hardware::types::BusConfig;
///
/// fn detect<R: NfcReader>(reader: &mut R) -> Result<bool> {
///     reader.begin(&BusConfig::default())?;
///     Ok(reader.firmware_version()?.is_some())
/// }
/// ```
pub trait NfcReader: Send {
    /// Open the bus to the reader chip.
    ///
    /// # Errors
    ///
    /// Returns an error if the bus cannot be opened with the given pins
    /// and frequency.
    fn begin(&mut self, bus: &BusConfig) -> Result<()>;

    /// Query the chip firmware.
    ///
    /// Returns `Ok(None)` when nothing answered on the bus, which is how a
    /// missing chip shows up.
    ///
    /// # Errors
    ///
    /// Returns an error if the chip answered with a malformed frame or the
    /// bus failed mid-transaction.
    fn firmware_version(&mut self) -> Result<Option<FirmwareVersion>>;

    /// Prepare the chip for passive target detection.
    ///
    /// `passive_activation_retries` bounds how long a single
    /// [`read_passive_target`](NfcReader::read_passive_target) may retry.
    ///
    /// # Errors
    ///
    /// Returns an error if the chip rejects the configuration.
    fn configure(&mut self, passive_activation_retries: u8) -> Result<()>;

    /// Look for a tag in the field and read its UID.
    ///
    /// Returns `Ok(None)` when no tag is present. The UID is returned as the
    /// chip reported it; length validation is left to the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the bus transaction fails.
    fn read_passive_target(&mut self) -> Result<Option<Vec<u8>>>;

    /// Get reader information.
    fn reader_info(&self) -> ReaderInfo;
}

impl<R: NfcReader + ?Sized> NfcReader for Box<R> {
    fn begin(&mut self, bus: &BusConfig) -> Result<()> {
        (**self).begin(bus)
    }

    fn firmware_version(&mut self) -> Result<Option<FirmwareVersion>> {
        (**self).firmware_version()
    }

    fn configure(&mut self, passive_activation_retries: u8) -> Result<()> {
        (**self).configure(passive_activation_retries)
    }

    fn read_passive_target(&mut self) -> Result<Option<Vec<u8>>> {
        (**self).read_passive_target()
    }

    fn reader_info(&self) -> ReaderInfo {
        (**self).reader_info()
    }
}
