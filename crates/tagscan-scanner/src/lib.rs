//! Tag scan debouncer and swipe dispatcher.
//!
//! This crate sits between an NFC reader driver and an access-control
//! node's decision logic. It polls the reader, suppresses repeated reads of
//! the same physical swipe, optionally consults a local tag cache, and
//! hands each new swipe to a single handler as a formatted UID string such
//! as `"04-A1-2B"`. Whether the tag is authorized is the handler's call.
//!
//! # Components
//!
//! - [`Scanner`]: the poll-step state machine
//! - [`ScannerConfig`]: debounce window, poll cooldown, cache flag, bus wiring
//! - [`cache::TagCache`]: lookup interface for a local cache
//! - [`ScannerReport`]: counters and reader status for telemetry
//! - [`ScanLoop`]: optional tokio driver that ticks the scanner
//!
//! # Example
//!
//! ```
//! use tagscan_core::SwipeResult;
//! use tagscan_hardware::mock::MockNfcReader;
//! use tagscan_scanner::{Scanner, ScannerConfig};
//!
//! let (reader, tags) = MockNfcReader::new();
//! let mut scanner = Scanner::new(reader, ScannerConfig::default());
//!
//! if !scanner.begin() {
//!     eprintln!("no reader detected");
//! }
//! scanner.on_swipe(|uid| {
//!     println!("tag {uid}");
//!     SwipeResult::Accepted
//! });
//!
//! tags.present(vec![0x04, 0xA1, 0x2B]);
//! let _ = scanner.poll();
//! assert_eq!(scanner.report().swipe_count, 1);
//! ```

pub mod cache;
pub mod clock;
pub mod config;
pub mod report;
pub mod runner;
pub mod scanner;

pub use cache::{CacheLookup, MemoryTagCache, TagCache};
pub use config::ScannerConfig;
pub use report::ScannerReport;
pub use runner::{ScanLoop, ScanLoopError, ScanLoopHandle};
pub use scanner::{PollOutcome, ScanPhase, ScanState, Scanner, SwipeEvent, SwipeHandler};
