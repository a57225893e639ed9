//! Reader driver abstraction layer for the tag scanner.
//!
//! This crate defines the seam between the scanner and the NFC reader chip
//! it polls. A driver implements [`NfcReader`]; the scanner owns it and
//! calls it once per tick. Register-level chip protocols live behind this
//! trait and are out of scope here.
//!
//! # Design Philosophy
//!
//! - **Synchronous**: the scanner's poll step must run to completion without
//!   suspending, so driver calls are plain blocking calls bounded by the
//!   bus transaction.
//! - **Object-safe**: `Box<dyn NfcReader>` implements [`NfcReader`] as well.
//! - **Error-aware**: all operations return [`Result<T>`][error::Result].
//!
//! # Detecting a Reader
//!
//! ```
//! use tagscan_hardware::mock::MockNfcReader;
//! use tagscan_hardware::traits::NfcReader;
//! use tagscan_hardware::types::BusConfig;
//!
//! let (mut reader, _handle) = MockNfcReader::new();
//! reader.begin(&BusConfig::default()).unwrap();
//!
//! match reader.firmware_version().unwrap() {
//!     Some(fw) => println!("Found {fw}"),
//!     None => println!("No reader on the bus"),
//! }
//! ```
//!
//! # Mock Implementations
//!
//! [`mock::MockNfcReader`] simulates a chip with a tag field that tests and
//! demos control through a [`mock::MockNfcReaderHandle`].
//!
//! [`NfcReader`]: traits::NfcReader

pub mod error;
pub mod mock;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{HardwareError, Result};
pub use traits::NfcReader;
pub use types::{BusConfig, ChipModel, FirmwareVersion, ReaderInfo};
