//! Replays tag presentations against a mock reader.

use std::time::Duration;
use tagscan_hardware::mock::MockNfcReaderHandle;
use tokio::time::{Instant, sleep_until};
use tracing::debug;

use crate::args::Presentation;

/// A change to the reader field at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
enum FieldChange {
    Present(Vec<u8>),
    Remove,
}

/// Flatten presentations into time-ordered field changes.
///
/// The field holds the most recently started presentation that is still
/// running. When it ends, the field goes back to the next one still held,
/// and is cleared only once nothing is left.
fn timeline(presentations: &[Presentation]) -> Vec<(u64, FieldChange)> {
    // (time, is_removal, presentation index); starts sort before ends.
    let mut edges: Vec<(u64, bool, usize)> = presentations
        .iter()
        .enumerate()
        .flat_map(|(i, p)| [(p.start_ms, false, i), (p.start_ms + p.hold_ms, true, i)])
        .collect();
    edges.sort_by_key(|&(at, removal, i)| (at, removal, i));

    let mut held: Vec<usize> = Vec::new();
    let mut events = Vec::new();

    for (at, removal, i) in edges {
        if !removal {
            held.push(i);
            events.push((at, FieldChange::Present(presentations[i].tag.uid_bytes())));
            continue;
        }

        let was_top = held.last() == Some(&i);
        held.retain(|&h| h != i);
        if !was_top {
            continue;
        }
        match held.last() {
            Some(&next) => {
                events.push((at, FieldChange::Present(presentations[next].tag.uid_bytes())))
            }
            None => events.push((at, FieldChange::Remove)),
        }
    }
    events
}

/// Apply `presentations` to the reader in real time.
pub async fn run(tags: MockNfcReaderHandle, presentations: Vec<Presentation>) {
    let start = Instant::now();

    for (at_ms, change) in timeline(&presentations) {
        sleep_until(start + Duration::from_millis(at_ms)).await;
        match change {
            FieldChange::Present(uid) => {
                debug!("Presenting {} byte tag at {}ms", uid.len(), at_ms);
                tags.present(uid);
            }
            FieldChange::Remove => {
                debug!("Field cleared at {}ms", at_ms);
                tags.remove();
            }
        }
    }
}
