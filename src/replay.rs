//! Event-log replay
//!
//! A recorded session is a JSON Lines file: one timestamped lifecycle event
//! per line, in capture order. Replaying drives a manual clock to each
//! record's timestamp and feeds the event through the adapter, then finishes
//! the turn, reconstructing exactly the measurement set the live session
//! produced. The log does not say when each original turn ended, so a
//! deferred end mark resolves at its committing record's timestamp.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::adapter::LifecycleAdapter;
use crate::clock::ManualClock;
use crate::lifecycle::LifecycleEvent;
use crate::marker::MissingMarkerError;
use crate::recorder::Recorder;

/// One line of a recorded session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Milliseconds since the session's time origin.
    pub at_ms: f64,
    /// The lifecycle signal, flattened next to the timestamp.
    #[serde(flatten)]
    pub event: LifecycleEvent,
}

/// Error raised while replaying an event log.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// The log could not be read.
    #[error("failed to read event log")]
    Io(#[from] std::io::Error),
    /// A line was not a valid event record.
    #[error("malformed event record on line {line}")]
    Malformed {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    /// A record's timestamp went backwards.
    #[error("event log goes backwards on line {line}: {at_ms} ms after {previous_ms} ms")]
    NonMonotonic {
        line: usize,
        at_ms: f64,
        previous_ms: f64,
    },
    /// A signal could not be correlated.
    #[error("correlation failed on line {line} (at {at_ms} ms)")]
    Correlation {
        line: usize,
        at_ms: f64,
        #[source]
        source: MissingMarkerError,
    },
}

/// Replay a recorded session from a reader.
///
/// Each record is treated as its own execution turn. Blank lines are
/// skipped. After the last record, ids whose start never resolved are
/// reported at warn level; orphaned starts are legal (a session can end
/// mid-computation) so they do not fail the replay.
pub fn replay<R: BufRead>(reader: R) -> Result<Recorder<ManualClock>, ReplayError> {
    let clock = ManualClock::new();
    let mut adapter = LifecycleAdapter::with_clock(clock.clone());
    let mut previous_ms: Option<f64> = None;
    let mut records = 0usize;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let number = index + 1;

        let record: EventRecord =
            serde_json::from_str(&line).map_err(|source| ReplayError::Malformed {
                line: number,
                source,
            })?;

        if let Some(previous_ms) = previous_ms {
            if record.at_ms < previous_ms {
                return Err(ReplayError::NonMonotonic {
                    line: number,
                    at_ms: record.at_ms,
                    previous_ms,
                });
            }
        }
        previous_ms = Some(record.at_ms);
        records += 1;

        clock.set(record.at_ms);
        adapter
            .handle_event(&record.event)
            .and_then(|_| adapter.finish_turn().map(|_| ()))
            .map_err(|source| ReplayError::Correlation {
                line: number,
                at_ms: record.at_ms,
                source,
            })?;
    }

    let recorder = adapter.into_recorder();
    let open: Vec<&str> = recorder.open_cycles().collect();
    if !open.is_empty() {
        warn!(
            unresolved = open.len(),
            ids = open.join(", "),
            "session ended with unresolved start markers"
        );
    }
    debug!(
        records,
        measurements = recorder.measurements().count(),
        "replay finished"
    );

    Ok(recorder)
}

/// Replay a recorded session from a file path.
pub fn replay_file(path: &Path) -> Result<Recorder<ManualClock>, ReplayError> {
    let file = File::open(path)?;
    replay(BufReader::new(file))
}
