//! Measurement cycles keyed by logical id
//!
//! The recorder is the write API over the marker store: `start_measurement`
//! and `end_measurement` derive the id's marker labels, append the markers,
//! and resolve the measurement. Cycles for different ids never interact;
//! restarting an id before it ends simply moves its start marker forward.

use std::collections::BTreeSet;

use tracing::debug;

use crate::clock::{Clock, MonotonicClock};
use crate::label;
use crate::marker::{MarkerStore, Measurement, MissingMarkerError};

/// Start/end correlation over an owned marker store.
#[derive(Debug)]
pub struct Recorder<C: Clock = MonotonicClock> {
    store: MarkerStore<C>,
    /// Ids with a start marker and no resolution yet.
    open: BTreeSet<String>,
}

impl Recorder<MonotonicClock> {
    /// Create a recorder over a fresh monotonic store.
    pub fn new() -> Self {
        Self::with_store(MarkerStore::new())
    }
}

impl Default for Recorder<MonotonicClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Recorder<C> {
    /// Create a recorder over an existing store.
    pub fn with_store(store: MarkerStore<C>) -> Self {
        Self {
            store,
            open: BTreeSet::new(),
        }
    }

    /// Create a recorder over a fresh store driven by `clock`.
    pub fn with_clock(clock: C) -> Self {
        Self::with_store(MarkerStore::with_clock(clock))
    }

    /// Open a measurement cycle for `id` by appending its start marker.
    ///
    /// Starting an already-open id restarts it: the new start marker
    /// supersedes the old one and any earlier, unended cycle is abandoned.
    pub fn start_measurement(&mut self, id: &str) {
        debug!(id, "measurement cycle started");
        self.store.mark(&label::start_label(id));
        self.open.insert(id.to_string());
    }

    /// Close the cycle for `id`: append its end marker and resolve the
    /// measurement between the most recent start and end markers.
    ///
    /// The end marker is appended before resolution, so when no start was
    /// ever recorded the error still leaves that end marker in the log
    /// (nothing is ever retracted from the store).
    pub fn end_measurement(&mut self, id: &str) -> Result<Measurement, MissingMarkerError> {
        self.store.mark(&label::end_label(id));
        let measurement = self.store.measure(
            &label::measurement_label(id),
            &label::start_label(id),
            &label::end_label(id),
        )?;
        self.open.remove(id);
        Ok(measurement)
    }

    /// Whether `id` has a start marker with no resolution yet.
    pub fn open_cycle(&self, id: &str) -> bool {
        self.open.contains(id)
    }

    /// Ids whose latest start has not been resolved, in sorted order.
    ///
    /// Orphaned starts are legal (a session can end mid-computation); this
    /// exists so hosts and the replay driver can report them.
    pub fn open_cycles(&self) -> impl Iterator<Item = &str> {
        self.open.iter().map(String::as_str)
    }

    /// All resolved measurements, in resolution order.
    pub fn measurements(&self) -> impl Iterator<Item = &Measurement> {
        self.store.measurements()
    }

    /// Read access to the underlying store.
    pub fn store(&self) -> &MarkerStore<C> {
        &self.store
    }

    /// Consume the recorder, handing back its store.
    pub fn into_store(self) -> MarkerStore<C> {
        self.store
    }
}
