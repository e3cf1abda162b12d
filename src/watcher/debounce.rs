//! Leading-edge debounce
//!
//! A render+sync cycle is allowed only when more than `min_delay` has
//! elapsed since the last one. There is no trailing flush: a change landing
//! while the window is closed is dropped, and only a later event reopens
//! the pipeline. The decision is a pure function of `(now, last_sync,
//! min_delay)` so it can be tested without sleeping.

use std::time::{Duration, Instant};

/// Debounce state for the watch worker
#[derive(Debug, Clone, Copy)]
pub struct Debounce {
    min_delay: Duration,
    last_sync: Instant,
}

impl Debounce {
    /// The window starts closed: `last_sync` is the watch start time
    pub fn new(min_delay: Duration, now: Instant) -> Self {
        Self {
            min_delay,
            last_sync: now,
        }
    }

    /// Whether a cycle may fire at `now`; zero delay disables debouncing
    pub fn ready(&self, now: Instant) -> bool {
        self.min_delay.is_zero() || now.duration_since(self.last_sync) > self.min_delay
    }

    /// Record that a cycle fired at `now`
    pub fn mark(&mut self, now: Instant) {
        self.last_sync = now;
    }
}
