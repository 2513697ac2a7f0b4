//! Zero-delay deferral queue
//!
//! The measurement engine is single-threaded and cooperative: work queued
//! during an execution turn runs when that turn finishes. This queue is the
//! explicit replacement for the zero-delay host timer the end-marking path
//! needs, so that "after the current turn" is a testable scheduling point
//! instead of an ambient timer.

use std::collections::VecDeque;

/// FIFO queue of tasks deferred to the end of the current turn.
///
/// Draining takes a snapshot of everything queued so far; tasks queued while
/// a drained batch is being processed belong to the next drain.
#[derive(Debug)]
pub struct DeferralQueue<T> {
    pending: VecDeque<T>,
}

impl<T> DeferralQueue<T> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            pending: VecDeque::new(),
        }
    }

    /// Queue a task to run when the current turn finishes.
    pub fn defer(&mut self, task: T) {
        self.pending.push_back(task);
    }

    /// Take every task queued so far, in the order it was queued.
    pub fn drain_ready(&mut self) -> VecDeque<T> {
        std::mem::take(&mut self.pending)
    }

    /// Number of tasks waiting for the turn to finish.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// True when no tasks are waiting.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<T> Default for DeferralQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
