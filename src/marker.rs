//! Append-only marker log and measurement resolution
//!
//! The store owns a single ordered log holding both raw markers and the
//! measurements resolved from them. Entries are never mutated or removed;
//! re-marking a label appends a new marker and makes it the label's most
//! recent occurrence. Reads observe measurements in resolution order.

use std::collections::HashMap;

use thiserror::Error;
use tracing::{debug, trace};

use crate::clock::{Clock, MonotonicClock};

/// Error returned when resolution references a label that was never marked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no marker recorded under label `{label}`")]
pub struct MissingMarkerError {
    /// The label that had no marker in the log.
    pub label: String,
}

impl MissingMarkerError {
    fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
        }
    }
}

/// A named point event captured once and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Label the marker was recorded under.
    pub label: String,
    /// Milliseconds since the store's time origin.
    pub timestamp: f64,
}

/// A resolved duration between a start marker and an end marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    /// Label the measurement was resolved under.
    pub name: String,
    /// End timestamp minus start timestamp, in milliseconds.
    pub duration: f64,
    /// Timestamp of the start marker, in milliseconds.
    pub start_time: f64,
}

/// One entry in the log: markers and measurements share it, in capture order.
#[derive(Debug, Clone, PartialEq)]
enum LogEntry {
    Mark(Marker),
    Measure(Measurement),
}

/// Append-only timestamped log of markers and resolved measurements.
///
/// Generic over the clock so replay and tests can drive time by hand; live
/// hosts use the default monotonic clock.
#[derive(Debug)]
pub struct MarkerStore<C: Clock = MonotonicClock> {
    clock: C,
    entries: Vec<LogEntry>,
    /// Label -> timestamp of its most recent marker.
    latest_mark: HashMap<String, f64>,
}

impl MarkerStore<MonotonicClock> {
    /// Create a store over a monotonic clock with its origin at "now".
    pub fn new() -> Self {
        Self::with_clock(MonotonicClock::new())
    }
}

impl Default for MarkerStore<MonotonicClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> MarkerStore<C> {
    /// Create a store over the given clock.
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            entries: Vec::new(),
            latest_mark: HashMap::new(),
        }
    }

    /// Append a marker under `label` at the clock's current reading.
    ///
    /// Any earlier marker under the same label stays in the log but is no
    /// longer the label's most recent occurrence.
    pub fn mark(&mut self, label: &str) {
        let timestamp = self.clock.now_ms();
        trace!(label, timestamp, "marker appended");
        self.latest_mark.insert(label.to_string(), timestamp);
        self.entries.push(LogEntry::Mark(Marker {
            label: label.to_string(),
            timestamp,
        }));
    }

    /// Resolve the most recent markers under `start_label` and `end_label`
    /// into a measurement appended under `name`.
    ///
    /// Fails without appending anything when either label has never been
    /// marked. Timestamps are subtracted as-is: if the end marker predates
    /// the start marker the duration comes out negative, pointing at an
    /// ordering bug in the caller's signal stream.
    pub fn measure(
        &mut self,
        name: &str,
        start_label: &str,
        end_label: &str,
    ) -> Result<Measurement, MissingMarkerError> {
        let start_time = self.latest(start_label)?;
        let end_time = self.latest(end_label)?;

        let measurement = Measurement {
            name: name.to_string(),
            duration: end_time - start_time,
            start_time,
        };
        debug!(
            name,
            duration = measurement.duration,
            start_time,
            "measurement resolved"
        );
        self.entries.push(LogEntry::Measure(measurement.clone()));
        Ok(measurement)
    }

    /// Timestamp of the most recent marker under `label`.
    fn latest(&self, label: &str) -> Result<f64, MissingMarkerError> {
        self.latest_mark
            .get(label)
            .copied()
            .ok_or_else(|| MissingMarkerError::new(label))
    }

    /// True if at least one marker was recorded under `label`.
    pub fn has_mark(&self, label: &str) -> bool {
        self.latest_mark.contains_key(label)
    }

    /// All measurements, in resolution order.
    pub fn measurements(&self) -> impl Iterator<Item = &Measurement> {
        self.entries.iter().filter_map(|entry| match entry {
            LogEntry::Measure(measurement) => Some(measurement),
            LogEntry::Mark(_) => None,
        })
    }

    /// All raw markers, in capture order (superseded ones included).
    pub fn marks(&self) -> impl Iterator<Item = &Marker> {
        self.entries.iter().filter_map(|entry| match entry {
            LogEntry::Mark(marker) => Some(marker),
            LogEntry::Measure(_) => None,
        })
    }

    /// Total number of log entries, markers and measurements combined.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn manual_store() -> (ManualClock, MarkerStore<ManualClock>) {
        let clock = ManualClock::new();
        let store = MarkerStore::with_clock(clock.clone());
        (clock, store)
    }

    #[test]
    fn test_mark_appends_at_clock_reading() {
        let (clock, mut store) = manual_store();
        clock.set(12.5);
        store.mark("out1_start");

        let marks: Vec<_> = store.marks().collect();
        assert_eq!(marks.len(), 1);
        assert_eq!(marks[0].label, "out1_start");
        assert_eq!(marks[0].timestamp, 12.5);
    }

    #[test]
    fn test_measure_resolves_most_recent_markers() {
        let (clock, mut store) = manual_store();
        clock.set(10.0);
        store.mark("out1_start");
        clock.set(14.0);
        store.mark("out1_end");

        let measurement = store
            .measure("out1_measurement", "out1_start", "out1_end")
            .unwrap();
        assert_eq!(measurement.name, "out1_measurement");
        assert_eq!(measurement.duration, 4.0);
        assert_eq!(measurement.start_time, 10.0);
    }

    #[test]
    fn test_remarking_supersedes_earlier_marker() {
        let (clock, mut store) = manual_store();
        clock.set(0.0);
        store.mark("out1_start");
        clock.set(50.0);
        store.mark("out1_start");
        clock.set(60.0);
        store.mark("out1_end");

        let measurement = store
            .measure("out1_measurement", "out1_start", "out1_end")
            .unwrap();
        // The second start wins; the first stays in the log.
        assert_eq!(measurement.duration, 10.0);
        assert_eq!(measurement.start_time, 50.0);
        assert_eq!(store.marks().count(), 3);
    }

    #[test]
    fn test_measure_missing_start_names_the_label() {
        let (clock, mut store) = manual_store();
        clock.set(5.0);
        store.mark("out1_end");

        let err = store
            .measure("out1_measurement", "out1_start", "out1_end")
            .unwrap_err();
        assert_eq!(err.label, "out1_start");
    }

    #[test]
    fn test_measure_missing_end_names_the_label() {
        let (clock, mut store) = manual_store();
        clock.set(5.0);
        store.mark("out1_start");

        let err = store
            .measure("out1_measurement", "out1_start", "out1_end")
            .unwrap_err();
        assert_eq!(err.label, "out1_end");
    }

    #[test]
    fn test_failed_measure_appends_nothing() {
        let (_, mut store) = manual_store();
        store.mark("only_start");
        let before = store.len();

        let result = store.measure("m", "only_start", "never_marked");
        assert!(result.is_err());
        assert_eq!(store.len(), before);
        assert_eq!(store.measurements().count(), 0);
    }

    #[test]
    fn test_measurements_read_in_resolution_order() {
        let (clock, mut store) = manual_store();
        clock.set(0.0);
        store.mark("a_start");
        store.mark("b_start");
        clock.set(3.0);
        store.mark("b_end");
        store.measure("b_measurement", "b_start", "b_end").unwrap();
        clock.set(7.0);
        store.mark("a_end");
        store.measure("a_measurement", "a_start", "a_end").unwrap();

        let names: Vec<_> = store.measurements().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["b_measurement", "a_measurement"]);
    }

    #[test]
    fn test_out_of_order_markers_produce_negative_duration() {
        let (clock, mut store) = manual_store();
        clock.set(20.0);
        store.mark("x_end");
        clock.set(30.0);
        store.mark("x_start");

        let measurement = store.measure("x_measurement", "x_start", "x_end").unwrap();
        assert_eq!(measurement.duration, -10.0);
    }

    #[test]
    fn test_empty_store_reads_empty() {
        let store = MarkerStore::new();
        assert!(store.is_empty());
        assert_eq!(store.measurements().count(), 0);
        assert_eq!(store.marks().count(), 0);
        assert!(!store.has_mark("anything"));
    }

    #[test]
    fn test_monotonic_store_measures_nonnegative() {
        let mut store = MarkerStore::new();
        store.mark("op_start");
        store.mark("op_end");
        let measurement = store
            .measure("op_measurement", "op_start", "op_end")
            .unwrap();
        assert!(measurement.duration >= 0.0);
    }
}
