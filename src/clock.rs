//! Monotonic time sources for marker timestamps
//!
//! Timestamps are fractional milliseconds relative to an engine-local time
//! origin. They are monotonic and immune to wall-clock adjustment, and they
//! are only comparable to other timestamps from the same engine instance.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Source of "now" readings in milliseconds since the clock's origin.
pub trait Clock {
    /// Current offset from the time origin, in fractional milliseconds.
    fn now_ms(&self) -> f64;
}

/// Real monotonic clock with its origin fixed at construction.
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Create a clock whose origin is the current instant.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Hand-driven clock for replay and tests.
///
/// Clones share one reading: the replay driver keeps a handle and advances
/// it while the marker store reads through its own handle.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    /// Create a clock reading 0.0 ms.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clock with an initial reading.
    pub fn starting_at(ms: f64) -> Self {
        let clock = Self::default();
        clock.set(ms);
        clock
    }

    /// Move the clock to an absolute reading.
    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }

    /// Advance the clock by a relative amount.
    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}
