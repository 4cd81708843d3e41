//! Observable projection of the scheduler's internal state.

use std::time::Duration;

/// Read-only snapshot published after every internal transition.
///
/// `cooldown_remaining` is refreshed by a coarse periodic tick (~100ms) while
/// the gate is closed; treat it as a display value, not a precise deadline.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LimiterState {
    /// Whether a cooldown is currently blocking dequeue.
    pub is_limited: bool,
    /// Time left on the cooldown; zero when the gate is open.
    pub cooldown_remaining: Duration,
    /// Number of tasks waiting in the backlog.
    pub pending_count: usize,
    /// Number of tasks currently executing.
    pub active_count: usize,
}

impl LimiterState {
    /// True while at least one task is executing.
    #[inline]
    pub fn is_executing(&self) -> bool {
        self.active_count > 0
    }
}
