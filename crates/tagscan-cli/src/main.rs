//! `tagscan`: drive a tag scanner against a simulated reader.
//!
//! Swipes are printed to stdout as JSON lines while the scan loop runs;
//! the final scanner report follows once the run time elapses or Ctrl-C
//! is pressed. Logs go to stderr and honour `RUST_LOG`.

mod args;
mod config;
mod simulate;

use anyhow::Context;
use clap::Parser;
use serde_json::json;
use std::time::Duration;
use tagscan_core::SwipeResult;
use tagscan_hardware::mock::MockNfcReader;
use tagscan_scanner::clock::TokioClock;
use tagscan_scanner::{ScanLoop, Scanner};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::args::Args;
use crate::config::NodeConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => NodeConfig::from_file(path)?,
        None => NodeConfig::default(),
    };

    let (reader, tags) = if args.no_reader {
        MockNfcReader::without_chip()
    } else {
        MockNfcReader::new()
    };

    let mut scanner = Scanner::with_clock(reader, config.scanner.clone(), TokioClock)
        .with_tag_cache(config.tag_cache());

    if !scanner.begin() {
        warn!("No reader detected, polls will be skipped");
    }

    // The handler only hands the UID off; printing happens on another task.
    let (swipe_tx, mut swipe_rx) = mpsc::unbounded_channel::<String>();
    scanner.on_swipe(move |uid| match swipe_tx.send(uid.to_owned()) {
        Ok(()) => SwipeResult::Accepted,
        Err(_) => SwipeResult::Failed,
    });

    let started = Instant::now();
    let printer = tokio::spawn(async move {
        while let Some(uid) = swipe_rx.recv().await {
            let line = json!({
                "swipe": uid,
                "at_ms": millis(started.elapsed()),
            });
            println!("{line}");
        }
    });

    let handle = ScanLoop::spawn(scanner);
    let script = tokio::spawn(simulate::run(tags, args.swipes.clone()));

    tokio::select! {
        _ = tokio::time::sleep(args.run_time()) => {}
        result = tokio::signal::ctrl_c() => {
            result.context("waiting for Ctrl-C")?;
            info!("Interrupted");
        }
    }

    script.abort();
    let scanner = handle.shutdown().await?;
    let report = scanner.report();

    // Dropping the scanner closes the swipe channel so the printer drains.
    drop(scanner);
    printer.await.context("swipe printer task failed")?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Whole milliseconds in `duration`, saturating at `u64::MAX`.
fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
