//! Cancellable one-shot timer
//!
//! Holds a deadline; the owner polls it against a clock. Starting always
//! replaces the previous deadline, so timers never stack.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default)]
pub struct ExpiryTimer {
    deadline: Option<Instant>,
}

impl ExpiryTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, now: Instant, after: Duration) {
        self.deadline = Some(now + after);
    }

    /// No-op when not armed
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }
}
