//! Command-line arguments.

use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tagscan_core::TagId;

/// Run a tag scanner against a simulated reader and print swipes as JSON.
#[derive(Debug, Parser)]
#[command(name = "tagscan", version, about)]
pub struct Args {
    /// JSON configuration file (scanner settings and cached tags).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Tag presentation: `UID@START_MS+HOLD_MS`, e.g. `04-A1-2B@100+300`.
    /// A later overlapping presentation takes the field until it ends.
    #[arg(short = 's', long = "swipe", value_name = "UID@START+HOLD")]
    pub swipes: Vec<Presentation>,

    /// How long to run, in milliseconds. Defaults to 500ms past the last
    /// presentation.
    #[arg(short, long, value_name = "MS")]
    pub duration_ms: Option<u64>,

    /// Simulate a board with no reader chip attached.
    #[arg(long)]
    pub no_reader: bool,
}

impl Args {
    /// Total run time.
    pub fn run_time(&self) -> Duration {
        let ms = self.duration_ms.unwrap_or_else(|| {
            self.swipes
                .iter()
                .map(|p| p.start_ms + p.hold_ms)
                .max()
                .unwrap_or(0)
                + 500
        });
        Duration::from_millis(ms)
    }
}

/// One simulated presentation of a tag to the reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    pub tag: TagId,
    pub start_ms: u64,
    pub hold_ms: u64,
}

impl FromStr for Presentation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (uid, timing) = s
            .split_once('@')
            .ok_or_else(|| format!("expected UID@START+HOLD, got {s:?}"))?;
        let (start, hold) = timing
            .split_once('+')
            .ok_or_else(|| format!("expected START+HOLD after '@', got {timing:?}"))?;

        Ok(Self {
            tag: uid.parse().map_err(|e| format!("{e}"))?,
            start_ms: start
                .parse()
                .map_err(|e| format!("invalid start {start:?}: {e}"))?,
            hold_ms: hold
                .parse()
                .map_err(|e| format!("invalid hold {hold:?}: {e}"))?,
        })
    }
}
