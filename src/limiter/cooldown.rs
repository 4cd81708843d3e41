//! # Cooldown gate.
//!
//! Tracks the most recent execution boundary and answers two questions:
//! is the gate open right now, and if not, how long until it opens.
//!
//! The gate records a timestamp after **every** attempt (success, failure,
//! or timeout), so the configured spacing applies both before starting a new
//! task when the prior spacing has not elapsed, and after finishing a task
//! as a mandatory delay before the next one.
//!
//! Pure bookkeeping: timers live in the scheduler, not here.

use std::time::Duration;

use tokio::time::Instant;

/// Minimum-spacing bookkeeping between execution starts.
#[derive(Debug)]
pub(crate) struct CooldownGate {
    spacing: Duration,
    last: Option<Instant>,
}

impl CooldownGate {
    pub fn new(spacing: Duration) -> Self {
        Self {
            spacing,
            last: None,
        }
    }

    /// Records an execution boundary; the gate stays closed for the
    /// configured spacing from `now`.
    pub fn record(&mut self, now: Instant) {
        self.last = Some(now);
    }

    /// Forgets the last boundary (used by reset; the gate opens immediately).
    pub fn clear(&mut self) {
        self.last = None;
    }

    /// Time left before the next execution may start. Zero when open.
    pub fn remaining(&self, now: Instant) -> Duration {
        match self.last {
            None => Duration::ZERO,
            Some(last) => self.spacing.saturating_sub(now.duration_since(last)),
        }
    }

    /// True when the next execution may start now.
    pub fn is_open(&self, now: Instant) -> bool {
        self.remaining(now).is_zero()
    }
}
