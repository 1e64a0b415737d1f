//! Debounce and throttle primitives driven by caller-supplied instants.

use std::time::{Duration, Instant};

/// Trailing-edge debouncer: fires once `delay` after the last schedule call.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Request a fire, pushing any pending deadline back.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Returns true (once) when the pending deadline has passed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Take a pending fire immediately, ignoring the deadline.
    pub fn flush(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }
}

/// Leading-edge throttle: the first call fires, calls within `interval` of
/// the last fire are dropped.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    last_fire: Option<Instant>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fire: None,
        }
    }

    pub fn try_fire(&mut self, now: Instant) -> bool {
        let ready = self
            .last_fire
            .is_none_or(|last| now.saturating_duration_since(last) >= self.interval);
        if ready {
            self.last_fire = Some(now);
        }
        ready
    }
}
