//! Lifecycle-to-recorder correlation
//!
//! The adapter turns lifecycle signals into recorder calls. Start marks are
//! taken synchronously; end marks for committed values are deferred until
//! the current execution turn finishes, so downstream render work that runs
//! in the same turn still lands inside the measured window.
//!
//! Hosts drive the turn protocol themselves: `handle_event` for every signal
//! that arrives during a turn, then `finish_turn` once when the turn ends.
//! `process` bundles both for hosts that treat each event as its own turn.

use tracing::{trace, warn};

use crate::clock::{Clock, MonotonicClock};
use crate::label::SERVER_COMPUTATION_ID;
use crate::lifecycle::LifecycleEvent;
use crate::marker::{Measurement, MissingMarkerError};
use crate::recorder::Recorder;
use crate::scheduler::DeferralQueue;

/// Correlates lifecycle signals into measurement cycles.
#[derive(Debug)]
pub struct LifecycleAdapter<C: Clock = MonotonicClock> {
    recorder: Recorder<C>,
    deferred_ends: DeferralQueue<String>,
}

impl LifecycleAdapter<MonotonicClock> {
    /// Create an adapter over a fresh monotonic recorder.
    pub fn new() -> Self {
        Self::with_recorder(Recorder::new())
    }
}

impl Default for LifecycleAdapter<MonotonicClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> LifecycleAdapter<C> {
    /// Create an adapter over an existing recorder.
    pub fn with_recorder(recorder: Recorder<C>) -> Self {
        Self {
            recorder,
            deferred_ends: DeferralQueue::new(),
        }
    }

    /// Create an adapter over a fresh recorder driven by `clock`.
    pub fn with_clock(clock: C) -> Self {
        Self::with_recorder(Recorder::with_clock(clock))
    }

    /// Handle one signal within the current turn.
    ///
    /// Recalculating and server-busy signals open cycles immediately.
    /// Value-committed signals (and custom operations) defer their end mark
    /// to `finish_turn`. Server-idle resolves synchronously, and its
    /// correlation failure surfaces here; a custom message without a
    /// payload is not a measurable operation and is ignored.
    pub fn handle_event(&mut self, event: &LifecycleEvent) -> Result<(), MissingMarkerError> {
        trace!(kind = event.kind(), "lifecycle event");
        match event {
            LifecycleEvent::Recalculating { output_id } => {
                self.recorder.start_measurement(output_id);
            }
            LifecycleEvent::ValueCommitted { output_id } => {
                self.deferred_ends.defer(output_id.clone());
            }
            LifecycleEvent::ServerBusy => {
                self.recorder.start_measurement(SERVER_COMPUTATION_ID);
            }
            LifecycleEvent::ServerIdle => {
                self.recorder.end_measurement(SERVER_COMPUTATION_ID)?;
            }
            LifecycleEvent::CustomMessage {
                payload: Some(payload),
            } => {
                self.recorder.start_measurement(&payload.operation_id);
                self.deferred_ends.defer(payload.operation_id.clone());
            }
            LifecycleEvent::CustomMessage { payload: None } => {
                trace!("custom message without operation payload ignored");
            }
        }
        Ok(())
    }

    /// Finish the current turn: take end marks for every deferred id, in
    /// the order the commits arrived.
    ///
    /// Ids are independent, so one failed resolution does not stop the
    /// rest of the batch; the first failure is returned after the whole
    /// batch has run. Completed measurements are returned in batch order.
    pub fn finish_turn(&mut self) -> Result<Vec<Measurement>, MissingMarkerError> {
        let ready = self.deferred_ends.drain_ready();
        let mut completed = Vec::with_capacity(ready.len());
        let mut first_error = None;

        for id in ready {
            match self.recorder.end_measurement(&id) {
                Ok(measurement) => completed.push(measurement),
                Err(err) => {
                    warn!(id, %err, "deferred end mark failed to resolve");
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(completed),
        }
    }

    /// Handle one signal as a complete turn of its own.
    pub fn process(&mut self, event: &LifecycleEvent) -> Result<Vec<Measurement>, MissingMarkerError> {
        self.handle_event(event)?;
        self.finish_turn()
    }

    /// Number of end marks waiting for the turn to finish.
    pub fn pending_ends(&self) -> usize {
        self.deferred_ends.len()
    }

    /// Read access to the recorder.
    pub fn recorder(&self) -> &Recorder<C> {
        &self.recorder
    }

    /// Consume the adapter, handing back its recorder.
    ///
    /// End marks still waiting in the deferral queue are dropped; callers
    /// that care should `finish_turn` first.
    pub fn into_recorder(self) -> Recorder<C> {
        self.recorder
    }
}
