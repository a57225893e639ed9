//! Tag scan debouncer and swipe dispatcher.
//!
//! The [`Scanner`] owns one reader driver and turns raw reads into swipes.
//! Each call to [`Scanner::poll`] is one tick of the owning scheduler:
//!
//! 1. Skip the tick if the reader is disabled or the cooldown has not
//!    elapsed (no reader query, no state change).
//! 2. Ask the reader for a tag. No tag counts a miss.
//! 3. Format the UID into a [`TagId`]. Empty or overlong UIDs are dropped.
//! 4. The same tag inside the debounce window is a repeat and is ignored.
//! 5. Anything else is a new swipe: record it, consult the cache, call the
//!    handler once with the formatted UID.
//! 6. Arm the cooldown for the next poll.
//!
//! # Phases
//!
//! ```text
//!            no tag / error / rejected
//!   ┌──────────────────────────────────────┐
//!   ▼                                      │
//! Idle ──new tag or window elapsed──► TagPresentNew
//!   ▲                                      │
//!   │                                 same tag within window
//!   │                                      ▼
//!   └──────────no tag──────────── TagPresentRepeat
//! ```
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//! use tagscan_core::SwipeResult;
//! use tagscan_hardware::mock::MockNfcReader;
//! use tagscan_scanner::clock::ManualClock;
//! use tagscan_scanner::{PollOutcome, Scanner, ScannerConfig};
//!
//! let (reader, tags) = MockNfcReader::new();
//! let clock = ManualClock::new();
//! let config = ScannerConfig::default().with_debounce_window(Duration::from_millis(500));
//!
//! let mut scanner = Scanner::with_clock(reader, config, clock.clone());
//! assert!(scanner.begin());
//! scanner.on_swipe(|uid| {
//!     println!("swipe {uid}");
//!     SwipeResult::Accepted
//! });
//!
//! tags.present(vec![0x04, 0xA1, 0x2B]);
//! assert!(matches!(scanner.poll(), PollOutcome::Swiped(_)));
//!
//! clock.advance(Duration::from_millis(200));
//! assert!(matches!(scanner.poll(), PollOutcome::Repeat(_)));
//! ```
//!
//! # Thread Safety
//!
//! `poll` takes `&mut self` and must be driven from a single context. The
//! handler runs inside `poll`, so a slow handler delays the next read.

use crate::cache::{CacheLookup, TagCache};
use crate::clock::{Clock, MonotonicClock};
use crate::config::ScannerConfig;
use crate::report::ScannerReport;
use serde::Serialize;
use std::fmt;
use std::time::Instant;
use tagscan_core::constants::COMPONENT_NAME;
use tagscan_core::{SwipeResult, TagId};
use tagscan_hardware::{FirmwareVersion, NfcReader};
use tracing::{debug, info, trace, warn};

/// Handler invoked once per swipe with the formatted tag identifier.
pub type SwipeHandler = Box<dyn FnMut(&str) -> SwipeResult + Send>;

/// Phase of the scanner after its last completed poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanPhase {
    /// No tag present, or the last read was unusable.
    #[default]
    Idle,

    /// A new swipe was just dispatched.
    TagPresentNew,

    /// The same tag is still being read inside the debounce window.
    TagPresentRepeat,
}

impl fmt::Display for ScanPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phase = match self {
            ScanPhase::Idle => "Idle",
            ScanPhase::TagPresentNew => "TagPresentNew",
            ScanPhase::TagPresentRepeat => "TagPresentRepeat",
        };
        f.write_str(phase)
    }
}

/// Mutable scan state, owned by the scanner and changed only by `poll`.
#[derive(Debug, Clone, Default)]
pub struct ScanState {
    /// Most recently accepted tag. Kept after the tag leaves the field so a
    /// quick re-presentation is still debounced.
    pub last_tag: Option<TagId>,

    /// When the last swipe was accepted.
    pub last_swipe_at: Option<Instant>,

    /// Polls before this instant are skipped.
    pub next_check_at: Option<Instant>,

    /// Polls that found a tag, new or repeat.
    pub scan_count: u64,

    /// Polls that found no tag.
    pub miss_count: u64,

    /// Whether the tag currently in the field has been dispatched.
    pub tag_decoded: bool,

    /// Swipes dispatched.
    pub swipe_count: u64,

    /// Reads ignored as repeats.
    pub repeat_count: u64,

    /// Reads dropped for an empty or overlong UID.
    pub rejected_count: u64,

    /// Polls that failed on the bus.
    pub read_error_count: u64,

    /// Cache lookups that found the tag.
    pub cache_hits: u64,

    /// Cache lookups that missed.
    pub cache_misses: u64,

    /// Result of the last handler call.
    pub last_result: Option<SwipeResult>,

    /// Phase after the last completed poll.
    pub phase: ScanPhase,
}

impl ScanState {
    /// Tag currently held in the field, if it has been dispatched.
    pub fn current_tag(&self) -> Option<&TagId> {
        if self.tag_decoded {
            self.last_tag.as_ref()
        } else {
            None
        }
    }
}

/// A dispatched swipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwipeEvent {
    /// Formatted tag identifier.
    pub tag: TagId,

    /// Handler result, if a handler is registered.
    pub result: Option<SwipeResult>,

    /// Cache lookup, if caching is enabled and a cache is attached.
    pub cache: Option<CacheLookup>,
}

/// What a single call to [`Scanner::poll`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "the outcome reports what the poll did; ignore it explicitly with `let _ =`"]
pub enum PollOutcome {
    /// No reader was detected; nothing happened.
    Disabled,

    /// The cooldown has not elapsed; nothing happened.
    CoolingDown,

    /// The reader saw no tag.
    NoTag,

    /// The same tag was read again inside the debounce window.
    Repeat(TagId),

    /// A tag answered with an empty or overlong UID and was dropped.
    Rejected {
        /// Length of the UID the reader returned.
        uid_len: usize,
    },

    /// The reader failed on the bus.
    ReadError,

    /// A new swipe was dispatched.
    Swiped(SwipeEvent),
}

impl PollOutcome {
    /// Returns the swipe if this poll dispatched one.
    pub fn swipe(&self) -> Option<&SwipeEvent> {
        match self {
            Self::Swiped(event) => Some(event),
            _ => None,
        }
    }

    /// Returns `true` if the reader was queried during this poll.
    pub fn queried_reader(&self) -> bool {
        !matches!(self, Self::Disabled | Self::CoolingDown)
    }
}

/// Tag scan debouncer and swipe dispatcher.
///
/// Generic over the reader driver and the clock; see the [module
/// documentation](self) for the poll algorithm.
pub struct Scanner<R, C = MonotonicClock> {
    reader: R,
    clock: C,
    config: ScannerConfig,
    cache: Option<Box<dyn TagCache>>,
    on_swipe: Option<SwipeHandler>,
    state: ScanState,
    reader_available: bool,
    firmware: Option<FirmwareVersion>,
}

impl<R: NfcReader> Scanner<R> {
    /// Create a scanner on the system monotonic clock.
    ///
    /// The reader is not touched until [`begin`](Scanner::begin).
    pub fn new(reader: R, config: ScannerConfig) -> Self {
        Self::with_clock(reader, config, MonotonicClock)
    }
}

impl<R: NfcReader, C: Clock> Scanner<R, C> {
    /// Create a scanner with an explicit clock.
    pub fn with_clock(reader: R, config: ScannerConfig, clock: C) -> Self {
        Self {
            reader,
            clock,
            config,
            cache: None,
            on_swipe: None,
            state: ScanState::default(),
            reader_available: false,
            firmware: None,
        }
    }

    /// Attach a tag cache. Only consulted when `use_cache` is enabled.
    pub fn with_tag_cache(mut self, cache: impl TagCache + 'static) -> Self {
        self.cache = Some(Box::new(cache));
        self
    }

    /// Component name used in reports.
    pub fn name(&self) -> &'static str {
        COMPONENT_NAME
    }

    /// Open the bus and detect the reader chip.
    ///
    /// Never fails: if the bus cannot be opened or no chip answers, the
    /// scanner stays disabled and every later poll is a no-op. Returns the
    /// resulting availability.
    pub fn begin(&mut self) -> bool {
        self.reader_available = false;
        self.firmware = None;

        let reader = self.reader.reader_info().name;
        let bus = self.config.bus;

        if let Err(e) = self.reader.begin(&bus) {
            warn!("{}: failed to open bus for {}: {}", self.name(), reader, e);
            return false;
        }

        let firmware = match self.reader.firmware_version() {
            Ok(Some(firmware)) => firmware,
            Ok(None) => {
                warn!(
                    "{}: no reader chip found on {} (SDA {}, SCL {})",
                    self.name(),
                    reader,
                    bus.sda_pin,
                    bus.scl_pin
                );
                return false;
            }
            Err(e) => {
                warn!("{}: reader detection failed: {}", self.name(), e);
                return false;
            }
        };

        if let Err(e) = self
            .reader
            .configure(self.config.passive_activation_retries)
        {
            warn!("{}: failed to configure {}: {}", self.name(), firmware, e);
            return false;
        }

        info!(
            "{}: found {} (support 0x{:02X}) on {}",
            self.name(),
            firmware,
            firmware.support,
            reader
        );
        self.firmware = Some(firmware);
        self.reader_available = true;
        true
    }

    /// Whether a reader chip was detected by [`begin`](Self::begin).
    pub fn is_reader_available(&self) -> bool {
        self.reader_available
    }

    /// Firmware of the detected chip.
    pub fn firmware(&self) -> Option<FirmwareVersion> {
        self.firmware
    }

    /// Register the swipe handler, replacing any previous one.
    ///
    /// Takes effect from the next dispatched swipe; a tag already dispatched
    /// is not replayed to the new handler.
    pub fn on_swipe<F>(&mut self, handler: F) -> &mut Self
    where
        F: FnMut(&str) -> SwipeResult + Send + 'static,
    {
        self.on_swipe = Some(Box::new(handler));
        self
    }

    /// Remove the swipe handler.
    pub fn clear_swipe_handler(&mut self) -> &mut Self {
        self.on_swipe = None;
        self
    }

    /// Check if a swipe handler is registered.
    pub fn has_swipe_handler(&self) -> bool {
        self.on_swipe.is_some()
    }

    /// Run one tick of the scan state machine.
    pub fn poll(&mut self) -> PollOutcome {
        let now = self.clock.now();
        self.poll_at(now)
    }

    /// Run one tick of the scan state machine as of `now`.
    ///
    /// Schedulers that know their tick deadline pass it here so the cooldown
    /// lines up with the next deadline instead of with the late wake-up.
    /// `now` must come from the same time base as the scanner's clock.
    pub fn poll_at(&mut self, now: Instant) -> PollOutcome {
        if !self.reader_available {
            return PollOutcome::Disabled;
        }

        if self.state.next_check_at.is_some_and(|at| now < at) {
            return PollOutcome::CoolingDown;
        }

        let outcome = self.scan(now);

        self.state.next_check_at = Some(
            now.checked_add(self.config.poll_interval())
                .unwrap_or(now),
        );
        outcome
    }

    fn scan(&mut self, now: Instant) -> PollOutcome {
        let uid = match self.reader.read_passive_target() {
            Ok(Some(uid)) => uid,
            Ok(None) => {
                self.state.miss_count += 1;
                self.state.tag_decoded = false;
                self.state.phase = ScanPhase::Idle;
                trace!("{}: no tag", self.name());
                return PollOutcome::NoTag;
            }
            Err(e) => {
                self.state.read_error_count += 1;
                self.state.tag_decoded = false;
                self.state.phase = ScanPhase::Idle;
                warn!("{}: read failed: {}", self.name(), e);
                return PollOutcome::ReadError;
            }
        };

        self.state.scan_count += 1;

        let tag = match TagId::from_uid(&uid) {
            Ok(tag) => tag,
            Err(e) => {
                self.state.rejected_count += 1;
                self.state.tag_decoded = false;
                self.state.phase = ScanPhase::Idle;
                warn!("{}: ignoring tag: {}", self.name(), e);
                return PollOutcome::Rejected { uid_len: uid.len() };
            }
        };

        if self.is_repeat(&tag, now) {
            self.state.repeat_count += 1;
            self.state.tag_decoded = true;
            self.state.phase = ScanPhase::TagPresentRepeat;
            trace!("{}: {} still in debounce window", self.name(), tag);
            return PollOutcome::Repeat(tag);
        }

        self.state.last_tag = Some(tag);
        self.state.last_swipe_at = Some(now);
        self.state.tag_decoded = true;
        self.state.swipe_count += 1;
        self.state.phase = ScanPhase::TagPresentNew;

        let cache = self.lookup_cache(&tag);
        let result = self.on_swipe.as_mut().map(|handler| handler(tag.as_str()));

        match result {
            Some(result) => {
                self.state.last_result = Some(result);
                info!("{}: tag {} swiped, handler returned {}", self.name(), tag, result);
            }
            None => info!("{}: tag {} swiped, no handler registered", self.name(), tag),
        }

        PollOutcome::Swiped(SwipeEvent { tag, result, cache })
    }

    fn is_repeat(&self, tag: &TagId, now: Instant) -> bool {
        self.state.last_tag.as_ref() == Some(tag)
            && self
                .state
                .last_swipe_at
                .is_some_and(|at| now.saturating_duration_since(at) < self.config.debounce_window())
    }

    fn lookup_cache(&mut self, tag: &TagId) -> Option<CacheLookup> {
        if !self.config.use_cache {
            return None;
        }
        let lookup = self.cache.as_ref()?.lookup(tag);

        match lookup {
            CacheLookup::Hit { approved } => {
                self.state.cache_hits += 1;
                debug!("{}: cache hit for {} (approved: {})", self.name(), tag, approved);
            }
            CacheLookup::Miss => {
                self.state.cache_misses += 1;
                debug!("{}: cache miss for {}", self.name(), tag);
            }
        }
        Some(lookup)
    }

    /// Snapshot counters and status for telemetry.
    pub fn report(&self) -> ScannerReport {
        ScannerReport {
            name: self.name().to_string(),
            scan_count: self.state.scan_count,
            miss_count: self.state.miss_count,
            reader_available: self.reader_available,
            last_tag: self
                .config
                .report_last_tag
                .then_some(self.state.last_tag)
                .flatten(),
            swipe_count: self.state.swipe_count,
            repeat_count: self.state.repeat_count,
            rejected_count: self.state.rejected_count,
            read_error_count: self.state.read_error_count,
            cache_hits: self.state.cache_hits,
            cache_misses: self.state.cache_misses,
            last_result: self.state.last_result,
            firmware: self.firmware,
            generated_at: chrono::Utc::now(),
        }
    }

    /// Current scan state.
    pub fn state(&self) -> &ScanState {
        &self.state
    }

    /// Phase after the last completed poll.
    pub fn phase(&self) -> ScanPhase {
        self.state.phase
    }

    /// Scanner configuration.
    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// The reader driver.
    pub fn reader(&self) -> &R {
        &self.reader
    }
}

impl<R, C> fmt::Debug for Scanner<R, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scanner")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("reader_available", &self.reader_available)
            .field("firmware", &self.firmware)
            .field("has_cache", &self.cache.is_some())
            .field("has_swipe_handler", &self.on_swipe.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryTagCache;
    use crate::clock::ManualClock;
    use rstest::rstest;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tagscan_core::constants::MAX_UID_BYTES;
    use tagscan_hardware::HardwareError;
    use tagscan_hardware::mock::{MockNfcReader, MockNfcReaderHandle};

    const UID: [u8; 3] = [0x04, 0xA1, 0x2B];

    struct Harness {
        scanner: Scanner<MockNfcReader, ManualClock>,
        tags: MockNfcReaderHandle,
        clock: ManualClock,
        swipes: Arc<Mutex<Vec<String>>>,
    }

    fn harness(config: ScannerConfig) -> Harness {
        let (reader, tags) = MockNfcReader::new();
        let clock = ManualClock::new();
        let mut scanner = Scanner::with_clock(reader, config, clock.clone());
        assert!(scanner.begin());

        let swipes = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&swipes);
        scanner.on_swipe(move |uid| {
            sink.lock().unwrap().push(uid.to_string());
            SwipeResult::Accepted
        });

        Harness {
            scanner,
            tags,
            clock,
            swipes,
        }
    }

    fn config() -> ScannerConfig {
        ScannerConfig::default()
            .with_debounce_window(Duration::from_millis(500))
            .with_poll_interval(Duration::from_millis(100))
    }

    #[test]
    fn test_begin_detects_reader() {
        let (reader, tags) = MockNfcReader::new();
        let mut scanner = Scanner::new(reader, config());

        assert!(!scanner.is_reader_available());
        assert!(scanner.begin());
        assert!(scanner.is_reader_available());
        assert_eq!(tags.bus_config(), Some(config().bus));
        assert_eq!(tags.passive_activation_retries(), Some(1));
        assert!(scanner.firmware().is_some());
    }

    #[test]
    fn test_begin_without_chip_disables_polling() {
        let (reader, tags) = MockNfcReader::without_chip();
        let mut scanner = Scanner::new(reader, config());

        assert!(!scanner.begin());
        assert!(!scanner.is_reader_available());

        tags.present(UID.to_vec());
        for _ in 0..5 {
            assert_eq!(scanner.poll(), PollOutcome::Disabled);
        }
        assert_eq!(tags.read_count(), 0);

        let report = scanner.report();
        assert!(!report.reader_available);
        assert_eq!(report.scan_count, 0);
        assert_eq!(report.miss_count, 0);
        assert!(report.firmware.is_none());
    }

    #[rstest]
    #[case(HardwareError::communication("bus locked"))]
    #[case(HardwareError::initialization_failed("SAM configuration rejected"))]
    fn test_begin_failure_disables_polling(#[case] error: HardwareError) {
        let (reader, tags) = MockNfcReader::new();
        tags.fail_next_begin(error);
        let mut scanner = Scanner::new(reader, config());

        assert!(!scanner.begin());
        assert_eq!(scanner.poll(), PollOutcome::Disabled);
    }

    #[test]
    fn test_poll_before_begin_is_noop() {
        let (reader, tags) = MockNfcReader::new();
        let mut scanner = Scanner::new(reader, config());
        assert_eq!(scanner.poll(), PollOutcome::Disabled);
        assert_eq!(tags.read_count(), 0);
    }

    #[test]
    fn test_miss_counts_and_clears_decoded() {
        let mut h = harness(config());

        h.tags.present(UID.to_vec());
        assert!(matches!(h.scanner.poll(), PollOutcome::Swiped(_)));
        assert!(h.scanner.state().tag_decoded);
        assert_eq!(h.scanner.state().current_tag().unwrap().as_str(), "04-A1-2B");

        h.tags.remove();
        h.clock.advance(Duration::from_millis(100));
        assert_eq!(h.scanner.poll(), PollOutcome::NoTag);
        assert_eq!(h.scanner.state().miss_count, 1);
        assert!(!h.scanner.state().tag_decoded);
        assert!(h.scanner.state().current_tag().is_none());
        assert_eq!(h.scanner.phase(), ScanPhase::Idle);
    }

    #[test]
    fn test_debounce_same_tag() {
        let mut h = harness(config());
        h.tags.present(UID.to_vec());

        let outcome = h.scanner.poll();
        let event = outcome.swipe().unwrap();
        assert_eq!(event.tag.as_str(), "04-A1-2B");
        assert_eq!(event.result, Some(SwipeResult::Accepted));
        assert_eq!(h.scanner.phase(), ScanPhase::TagPresentNew);

        h.clock.advance(Duration::from_millis(200));
        assert!(matches!(h.scanner.poll(), PollOutcome::Repeat(_)));
        assert_eq!(h.scanner.phase(), ScanPhase::TagPresentRepeat);

        h.clock.advance(Duration::from_millis(400));
        assert!(matches!(h.scanner.poll(), PollOutcome::Swiped(_)));

        assert_eq!(*h.swipes.lock().unwrap(), vec!["04-A1-2B", "04-A1-2B"]);
        let state = h.scanner.state();
        assert_eq!(state.scan_count, 3);
        assert_eq!(state.repeat_count, 1);
        assert_eq!(state.swipe_count, 2);
    }

    #[test]
    fn test_repeat_does_not_extend_window() {
        let mut h = harness(config());
        h.tags.present(UID.to_vec());
        let _ = h.scanner.poll();

        // A tag held on the reader re-fires once per window
        for _ in 0..4 {
            h.clock.advance(Duration::from_millis(100));
            assert!(matches!(h.scanner.poll(), PollOutcome::Repeat(_)));
        }
        h.clock.advance(Duration::from_millis(100));
        assert!(matches!(h.scanner.poll(), PollOutcome::Swiped(_)));
    }

    #[test]
    fn test_debounce_survives_brief_removal() {
        let mut h = harness(config());
        h.tags.present(UID.to_vec());
        let _ = h.scanner.poll();

        h.tags.remove();
        h.clock.advance(Duration::from_millis(100));
        assert_eq!(h.scanner.poll(), PollOutcome::NoTag);

        h.tags.present(UID.to_vec());
        h.clock.advance(Duration::from_millis(100));
        assert!(matches!(h.scanner.poll(), PollOutcome::Repeat(_)));
        assert!(h.scanner.state().tag_decoded);
        assert_eq!(h.swipes.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_different_tags_back_to_back() {
        let mut h = harness(config().with_poll_interval(Duration::ZERO));

        h.tags.present(UID.to_vec());
        assert!(matches!(h.scanner.poll(), PollOutcome::Swiped(_)));

        h.tags.present(vec![0xDE, 0xAD, 0xBE, 0xEF]);
        assert!(matches!(h.scanner.poll(), PollOutcome::Swiped(_)));

        assert_eq!(*h.swipes.lock().unwrap(), vec!["04-A1-2B", "DE-AD-BE-EF"]);
    }

    #[test]
    fn test_cooldown_skips_reader() {
        let mut h = harness(config());
        h.tags.present(UID.to_vec());
        let _ = h.scanner.poll();
        let reads = h.tags.read_count();
        let scans = h.scanner.state().scan_count;

        h.clock.advance(Duration::from_millis(99));
        assert_eq!(h.scanner.poll(), PollOutcome::CoolingDown);
        assert_eq!(h.tags.read_count(), reads);
        assert_eq!(h.scanner.state().scan_count, scans);
        assert_eq!(h.scanner.phase(), ScanPhase::TagPresentNew);

        h.clock.advance(Duration::from_millis(1));
        assert!(h.scanner.poll().queried_reader());
        assert_eq!(h.tags.read_count(), reads + 1);
    }

    #[test]
    fn test_poll_at_cooldown_follows_tick_deadline() {
        let mut h = harness(config());
        let start = h.clock.now();

        // Each tick wakes a few ms late; the cooldown runs from the deadline.
        for tick in 0..10u64 {
            let deadline = start + Duration::from_millis(tick * 100);
            h.clock.advance(Duration::from_millis(if tick == 0 { 7 } else { 100 }));
            assert_eq!(h.scanner.poll_at(deadline), PollOutcome::NoTag);
        }
        assert_eq!(h.tags.read_count(), 10);
        assert_eq!(h.scanner.state().miss_count, 10);

        let next = start + Duration::from_millis(1000);
        assert_eq!(
            h.scanner.poll_at(next - Duration::from_millis(1)),
            PollOutcome::CoolingDown
        );
        assert_eq!(h.scanner.poll_at(next), PollOutcome::NoTag);
    }

    #[test]
    fn test_cooldown_armed_after_miss() {
        let mut h = harness(config());
        assert_eq!(h.scanner.poll(), PollOutcome::NoTag);
        assert_eq!(h.scanner.poll(), PollOutcome::CoolingDown);
        assert_eq!(h.scanner.state().miss_count, 1);
    }

    #[test]
    fn test_overlong_uid_rejected() {
        let mut h = harness(config());
        h.tags.present(UID.to_vec());
        let _ = h.scanner.poll();

        h.tags.present(vec![0x11; MAX_UID_BYTES + 1]);
        h.clock.advance(Duration::from_millis(100));
        assert_eq!(
            h.scanner.poll(),
            PollOutcome::Rejected {
                uid_len: MAX_UID_BYTES + 1
            }
        );

        let state = h.scanner.state();
        assert_eq!(state.rejected_count, 1);
        assert_eq!(state.last_tag.unwrap().as_str(), "04-A1-2B");
        assert_eq!(h.swipes.lock().unwrap().len(), 1);

        // The stored tag still debounces the original swipe
        h.tags.present(UID.to_vec());
        h.clock.advance(Duration::from_millis(100));
        assert!(matches!(h.scanner.poll(), PollOutcome::Repeat(_)));
    }

    #[test]
    fn test_empty_uid_rejected() {
        let mut h = harness(config());
        h.tags.present(Vec::new());
        assert_eq!(h.scanner.poll(), PollOutcome::Rejected { uid_len: 0 });
        assert_eq!(h.scanner.state().scan_count, 1);
        assert!(h.swipes.lock().unwrap().is_empty());
    }

    #[rstest]
    #[case(HardwareError::timeout(20))]
    #[case(HardwareError::invalid_data("bad frame checksum"))]
    fn test_read_error_counted(#[case] error: HardwareError) {
        let mut h = harness(config());
        h.tags.fail_next_read(error);

        assert_eq!(h.scanner.poll(), PollOutcome::ReadError);
        assert_eq!(h.scanner.state().read_error_count, 1);
        assert_eq!(h.scanner.state().miss_count, 0);
        assert_eq!(h.scanner.poll(), PollOutcome::CoolingDown);
    }

    #[test]
    fn test_handler_result_propagated() {
        let mut h = harness(config());
        h.scanner.on_swipe(|_| SwipeResult::Denied);
        h.tags.present(UID.to_vec());

        let outcome = h.scanner.poll();
        assert_eq!(outcome.swipe().unwrap().result, Some(SwipeResult::Denied));
        assert_eq!(h.scanner.state().last_result, Some(SwipeResult::Denied));
        assert_eq!(h.scanner.report().last_result, Some(SwipeResult::Denied));
    }

    #[test]
    fn test_failed_handler_does_not_alter_debounce() {
        let mut h = harness(config());
        h.scanner.on_swipe(|_| SwipeResult::Failed);
        h.tags.present(UID.to_vec());
        let _ = h.scanner.poll();

        h.clock.advance(Duration::from_millis(100));
        assert!(matches!(h.scanner.poll(), PollOutcome::Repeat(_)));
    }

    #[test]
    fn test_replacing_handler() {
        let mut h = harness(config().with_poll_interval(Duration::ZERO));
        let second = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&second);

        h.tags.present(UID.to_vec());
        let _ = h.scanner.poll();

        h.scanner.on_swipe(move |uid| {
            sink.lock().unwrap().push(uid.to_string());
            SwipeResult::Accepted
        });

        // Registration does not replay the held tag
        assert!(second.lock().unwrap().is_empty());
        assert!(matches!(h.scanner.poll(), PollOutcome::Repeat(_)));

        h.tags.present(vec![0x01, 0x02, 0x03, 0x04]);
        let _ = h.scanner.poll();

        assert_eq!(*h.swipes.lock().unwrap(), vec!["04-A1-2B"]);
        assert_eq!(*second.lock().unwrap(), vec!["01-02-03-04"]);
    }

    #[test]
    fn test_swipe_without_handler() {
        let (reader, tags) = MockNfcReader::new();
        let mut scanner = Scanner::with_clock(reader, config(), ManualClock::new());
        scanner.begin();
        assert!(!scanner.has_swipe_handler());

        tags.present(UID.to_vec());
        let outcome = scanner.poll();
        assert_eq!(outcome.swipe().unwrap().result, None);
        assert_eq!(scanner.state().swipe_count, 1);
        assert_eq!(scanner.state().last_result, None);
    }

    #[test]
    fn test_clear_swipe_handler() {
        let mut h = harness(config());
        h.scanner.clear_swipe_handler();
        h.tags.present(UID.to_vec());
        let _ = h.scanner.poll();
        assert!(h.swipes.lock().unwrap().is_empty());
    }

    #[test]
    fn test_cache_consulted_on_new_swipe() {
        let cache: MemoryTagCache = [("04-A1-2B".parse().unwrap(), true)].into_iter().collect();
        let (reader, tags) = MockNfcReader::new();
        let clock = ManualClock::new();
        let mut scanner = Scanner::with_clock(reader, config(), clock.clone()).with_tag_cache(cache);
        scanner.begin();

        tags.present(UID.to_vec());
        let outcome = scanner.poll();
        assert_eq!(
            outcome.swipe().unwrap().cache,
            Some(CacheLookup::Hit { approved: true })
        );

        // Repeats do not hit the cache
        clock.advance(Duration::from_millis(100));
        let _ = scanner.poll();

        tags.present(vec![0x01, 0x02, 0x03, 0x04]);
        clock.advance(Duration::from_millis(100));
        let outcome = scanner.poll();
        assert_eq!(outcome.swipe().unwrap().cache, Some(CacheLookup::Miss));

        let report = scanner.report();
        assert_eq!(report.cache_hits, 1);
        assert_eq!(report.cache_misses, 1);
    }

    #[test]
    fn test_cache_disabled() {
        let cache: MemoryTagCache = [("04-A1-2B".parse().unwrap(), true)].into_iter().collect();
        let (reader, tags) = MockNfcReader::new();
        let mut scanner =
            Scanner::with_clock(reader, config().with_cache(false), ManualClock::new())
                .with_tag_cache(cache);
        scanner.begin();

        tags.present(UID.to_vec());
        assert_eq!(scanner.poll().swipe().unwrap().cache, None);
        assert_eq!(scanner.report().cache_hits, 0);
    }

    #[test]
    fn test_report_reflects_state() {
        let mut h = harness(config());
        let _ = h.scanner.poll();
        h.tags.present(UID.to_vec());
        h.clock.advance(Duration::from_millis(100));
        let _ = h.scanner.poll();

        let before = h.scanner.state().clone();
        let report = h.scanner.report();
        assert_eq!(report.name, "RFID");
        assert_eq!(report.scan_count, 1);
        assert_eq!(report.miss_count, 1);
        assert!(report.reader_available);
        assert_eq!(report.last_tag.unwrap().as_str(), "04-A1-2B");
        assert_eq!(report.swipe_count, 1);

        // Reporting is read-only
        let after = h.scanner.state();
        assert_eq!(before.scan_count, after.scan_count);
        assert_eq!(before.next_check_at, after.next_check_at);
    }

    #[test]
    fn test_report_can_omit_last_tag() {
        let mut h = harness(config().with_report_last_tag(false));
        h.tags.present(UID.to_vec());
        let _ = h.scanner.poll();
        assert!(h.scanner.report().last_tag.is_none());
    }

    #[test]
    fn test_name_and_debug() {
        let h = harness(config());
        assert_eq!(h.scanner.name(), "RFID");
        let debug = format!("{:?}", h.scanner);
        assert!(debug.contains("reader_available: true"));
    }
}
