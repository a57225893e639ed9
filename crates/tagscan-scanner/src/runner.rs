//! Async driver for the scanner's poll step.
//!
//! The scanner itself owns no tasks; something has to call
//! [`Scanner::poll`] once per tick. [`ScanLoop`] is that something for tokio
//! applications: it moves the scanner into a task, ticks it on a
//! `tokio::time::interval`, and publishes the latest report on a watch
//! channel.
//!
//! ```text
//! ┌──────────────┐  tick   ┌─────────┐  poll   ┌────────┐
//! │ tokio        │────────►│ scan    │────────►│Scanner │──► swipe handler
//! │ interval     │         │ task    │         └────────┘
//! └──────────────┘         └────┬────┘
//!                               │ report (watch)
//!                               ▼
//!                        ScanLoopHandle
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use tagscan_core::SwipeResult;
//! use tagscan_hardware::mock::MockNfcReader;
//! use tagscan_scanner::clock::TokioClock;
//! use tagscan_scanner::{ScanLoop, Scanner, ScannerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (reader, _tags) = MockNfcReader::new();
//!     let mut scanner = Scanner::with_clock(reader, ScannerConfig::default(), TokioClock);
//!     scanner.begin();
//!     scanner.on_swipe(|uid| {
//!         println!("swipe {uid}");
//!         SwipeResult::Accepted
//!     });
//!
//!     let handle = ScanLoop::spawn(scanner);
//!     tokio::time::sleep(std::time::Duration::from_secs(5)).await;
//!     println!("{}", handle.report().to_json());
//!
//!     let _scanner = handle.shutdown().await?;
//!     Ok(())
//! }
//! ```

use crate::clock::Clock;
use crate::report::ScannerReport;
use crate::scanner::Scanner;
use std::time::Duration;
use tagscan_hardware::NfcReader;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Shortest tick period; `tokio::time::interval` rejects zero.
const MIN_TICK: Duration = Duration::from_millis(1);

/// Errors from the scan loop task.
#[derive(Debug, thiserror::Error)]
pub enum ScanLoopError {
    /// The task panicked or was aborted.
    #[error("Scan loop task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}

/// Spawns scanner tasks.
pub struct ScanLoop;

impl ScanLoop {
    /// Move `scanner` into a task that polls it every `poll_interval`.
    ///
    /// Call [`Scanner::begin`] first; a scanner without a reader is still
    /// ticked, but every poll is a no-op.
    ///
    /// Each poll is stamped with its tick deadline, so the scanner's clock
    /// must share tokio's time base: use [`TokioClock`](crate::clock::TokioClock)
    /// or, outside paused-time tests, [`MonotonicClock`](crate::clock::MonotonicClock).
    pub fn spawn<R, C>(scanner: Scanner<R, C>) -> ScanLoopHandle<R, C>
    where
        R: NfcReader + 'static,
        C: Clock + 'static,
    {
        let period = scanner.config().poll_interval().max(MIN_TICK);
        let (report_tx, report_rx) = watch::channel(scanner.report());
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        info!(
            "{}: scan loop started (tick {}ms, reader available: {})",
            scanner.name(),
            period.as_millis(),
            scanner.is_reader_available()
        );

        let task = tokio::spawn(Self::run(scanner, period, report_tx, shutdown_rx));

        ScanLoopHandle {
            task,
            shutdown_tx,
            report_rx,
        }
    }

    async fn run<R, C>(
        mut scanner: Scanner<R, C>,
        period: Duration,
        report_tx: watch::Sender<ScannerReport>,
        mut shutdown_rx: oneshot::Receiver<()>,
    ) -> Scanner<R, C>
    where
        R: NfcReader,
        C: Clock,
    {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = &mut shutdown_rx => break,
                deadline = ticker.tick() => {
                    let outcome = scanner.poll_at(deadline.into_std());
                    if outcome.queried_reader() {
                        report_tx.send_replace(scanner.report());
                    }
                }
            }
        }

        debug!("{}: scan loop stopped", scanner.name());
        scanner
    }
}

/// Handle to a running scan loop.
pub struct ScanLoopHandle<R, C> {
    task: JoinHandle<Scanner<R, C>>,
    shutdown_tx: oneshot::Sender<()>,
    report_rx: watch::Receiver<ScannerReport>,
}

impl<R, C> ScanLoopHandle<R, C> {
    /// Latest published report.
    pub fn report(&self) -> ScannerReport {
        self.report_rx.borrow().clone()
    }

    /// Subscribe to report updates.
    pub fn subscribe(&self) -> watch::Receiver<ScannerReport> {
        self.report_rx.clone()
    }

    /// Check if the task has stopped.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop the loop and take the scanner back.
    ///
    /// # Errors
    ///
    /// Returns an error if the task panicked (for example inside the swipe
    /// handler).
    pub async fn shutdown(self) -> Result<Scanner<R, C>, ScanLoopError> {
        // The task may already be gone; the join below reports why.
        let _ = self.shutdown_tx.send(());
        Ok(self.task.await?)
    }
}
