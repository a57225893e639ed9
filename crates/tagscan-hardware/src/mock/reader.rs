//! Mock NFC reader implementation for testing and development.
//!
//! This module provides a simulated reader chip that can be controlled
//! programmatically for testing without requiring physical hardware.

use crate::{
    HardwareError, Result,
    traits::NfcReader,
    types::{BusConfig, FirmwareVersion, ReaderInfo},
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, trace};

/// Firmware word a default mock reports (PN532, firmware 1.6).
const MOCK_FIRMWARE_WORD: u32 = 0x3201_0607;

/// Mock NFC reader for testing and development.
///
/// The reader shares its state with a [`MockNfcReaderHandle`]. A tag placed
/// in the field with [`MockNfcReaderHandle::present`] stays there, and is
/// returned by every read, until it is removed, the way a card resting on a
/// real reader keeps answering.
///
/// # Examples
///
/// ```
/// use tagscan_hardware::mock::MockNfcReader;
/// use tagscan_hardware::traits::NfcReader;
///
/// let (mut reader, handle) = MockNfcReader::new();
///
/// handle.present(vec![0x04, 0xA1, 0x2B]);
/// assert_eq!(reader.read_passive_target().unwrap(), Some(vec![0x04, 0xA1, 0x2B]));
///
/// handle.remove();
/// assert_eq!(reader.read_passive_target().unwrap(), None);
/// assert_eq!(handle.read_count(), 2);
/// ```
#[derive(Debug)]
pub struct MockNfcReader {
    /// State shared with the handle
    state: Arc<Mutex<MockState>>,

    /// Device name
    name: String,
}

#[derive(Debug, Default)]
struct MockState {
    /// Firmware the chip answers with; `None` simulates a missing chip
    firmware: Option<FirmwareVersion>,

    /// UID of the tag currently in the field
    tag: Option<Vec<u8>>,

    /// Error returned by the next read, once
    next_read_error: Option<HardwareError>,

    /// Error returned by the next `begin`, once
    next_begin_error: Option<HardwareError>,

    /// Bus configuration from the last `begin`
    bus: Option<BusConfig>,

    /// Retry count from the last `configure`
    passive_activation_retries: Option<u8>,

    /// Number of `read_passive_target` calls
    read_count: u64,
}

fn lock(state: &Mutex<MockState>) -> MutexGuard<'_, MockState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockNfcReader {
    /// Create a mock reader with a PN532 chip attached.
    ///
    /// Returns a tuple of (MockNfcReader, MockNfcReaderHandle) where the
    /// handle can be used to simulate tag presentations.
    pub fn new() -> (Self, MockNfcReaderHandle) {
        Self::with_firmware(
            "Mock NFC Reader",
            Some(FirmwareVersion::from_word(MOCK_FIRMWARE_WORD)),
        )
    }

    /// Create a mock reader whose chip never answers.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagscan_hardware::mock::MockNfcReader;
    /// use tagscan_hardware::traits::NfcReader;
    ///
    /// let (mut reader, _handle) = MockNfcReader::without_chip();
    /// assert_eq!(reader.firmware_version().unwrap(), None);
    /// ```
    pub fn without_chip() -> (Self, MockNfcReaderHandle) {
        Self::with_firmware("Mock NFC Reader", None)
    }

    /// Create a mock reader with a custom name and firmware.
    pub fn with_firmware(
        name: impl Into<String>,
        firmware: Option<FirmwareVersion>,
    ) -> (Self, MockNfcReaderHandle) {
        let state = Arc::new(Mutex::new(MockState {
            firmware,
            ..MockState::default()
        }));

        let reader = Self {
            state: Arc::clone(&state),
            name: name.into(),
        };

        (reader, MockNfcReaderHandle { state })
    }
}

impl NfcReader for MockNfcReader {
    fn begin(&mut self, bus: &BusConfig) -> Result<()> {
        let mut state = lock(&self.state);
        if let Some(error) = state.next_begin_error.take() {
            return Err(error);
        }
        debug!(
            "{} bus opened (SDA {}, SCL {}, {} Hz)",
            self.name, bus.sda_pin, bus.scl_pin, bus.frequency_hz
        );
        state.bus = Some(*bus);
        Ok(())
    }

    fn firmware_version(&mut self) -> Result<Option<FirmwareVersion>> {
        Ok(lock(&self.state).firmware)
    }

    fn configure(&mut self, passive_activation_retries: u8) -> Result<()> {
        let mut state = lock(&self.state);
        if state.firmware.is_none() {
            return Err(HardwareError::not_detected(self.name.clone()));
        }
        state.passive_activation_retries = Some(passive_activation_retries);
        Ok(())
    }

    fn read_passive_target(&mut self) -> Result<Option<Vec<u8>>> {
        let mut state = lock(&self.state);
        state.read_count += 1;

        if let Some(error) = state.next_read_error.take() {
            return Err(error);
        }
        if state.firmware.is_none() {
            return Err(HardwareError::not_detected(self.name.clone()));
        }

        trace!("{} read #{}: {:02X?}", self.name, state.read_count, state.tag);
        Ok(state.tag.clone())
    }

    fn reader_info(&self) -> ReaderInfo {
        ReaderInfo::new(self.name.clone(), vec!["ISO14443A".to_string()])
    }
}

/// Handle for controlling a mock NFC reader.
///
/// Clones share the same reader state.
#[derive(Debug, Clone)]
pub struct MockNfcReaderHandle {
    state: Arc<Mutex<MockState>>,
}

impl MockNfcReaderHandle {
    /// Place a tag in the reader field, replacing any tag already there.
    pub fn present(&self, uid: Vec<u8>) {
        lock(&self.state).tag = Some(uid);
    }

    /// Take the tag out of the reader field.
    pub fn remove(&self) {
        lock(&self.state).tag = None;
    }

    /// Check if a tag is currently in the field.
    pub fn is_tag_present(&self) -> bool {
        lock(&self.state).tag.is_some()
    }

    /// Make the next read fail with `error`.
    pub fn fail_next_read(&self, error: HardwareError) {
        lock(&self.state).next_read_error = Some(error);
    }

    /// Make the next `begin` fail with `error`.
    pub fn fail_next_begin(&self, error: HardwareError) {
        lock(&self.state).next_begin_error = Some(error);
    }

    /// Number of read attempts the reader has served.
    pub fn read_count(&self) -> u64 {
        lock(&self.state).read_count
    }

    /// Bus configuration passed to the last `begin`, if any.
    pub fn bus_config(&self) -> Option<BusConfig> {
        lock(&self.state).bus
    }

    /// Retry count passed to the last `configure`, if any.
    pub fn passive_activation_retries(&self) -> Option<u8> {
        lock(&self.state).passive_activation_retries
    }
}
