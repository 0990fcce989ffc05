//! Cancellable settle timer.
//!
//! The machine owns no thread and no clock. Callers pass `now` in and poll;
//! tests and the replay driver use a virtual clock.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct SettleTimer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl SettleTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// (Re)arm the timer to fire `delay` after `now`.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns true exactly once, on the first poll at or after the deadline.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
