//! Shared fixtures for scanner integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tagscan_core::SwipeResult;
use tagscan_hardware::mock::{MockNfcReader, MockNfcReaderHandle};
use tagscan_scanner::clock::{Clock, ManualClock};
use tagscan_scanner::{Scanner, ScannerConfig};

/// A dispatched swipe as the handler saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recorded {
    pub uid: String,
    pub at: Instant,
}

/// Scanner on a mock reader and a manual clock, recording every swipe.
pub struct Bench {
    pub scanner: Scanner<MockNfcReader, ManualClock>,
    pub tags: MockNfcReaderHandle,
    pub clock: ManualClock,
    pub swipes: Arc<Mutex<Vec<Recorded>>>,
}

impl Bench {
    /// Build a started scanner with the given timing, answering `result`.
    pub fn new(debounce_ms: u64, poll_ms: u64, result: SwipeResult) -> Self {
        let (reader, tags) = MockNfcReader::new();
        let clock = ManualClock::new();
        let config = ScannerConfig::default()
            .with_debounce_window(Duration::from_millis(debounce_ms))
            .with_poll_interval(Duration::from_millis(poll_ms));

        let mut scanner = Scanner::with_clock(reader, config, clock.clone());
        assert!(scanner.begin(), "mock reader should be detected");

        let swipes = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&swipes);
        let handler_clock = clock.clone();
        scanner.on_swipe(move |uid| {
            sink.lock().unwrap().push(Recorded {
                uid: uid.to_string(),
                at: handler_clock.now(),
            });
            result
        });

        Self {
            scanner,
            tags,
            clock,
            swipes,
        }
    }

    /// Advance the clock, then poll once.
    pub fn poll_after(&mut self, ms: u64) -> tagscan_scanner::PollOutcome {
        self.clock.advance(Duration::from_millis(ms));
        self.scanner.poll()
    }

    /// UIDs dispatched so far.
    pub fn swiped_uids(&self) -> Vec<String> {
        self.swipes
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.uid.clone())
            .collect()
    }
}
