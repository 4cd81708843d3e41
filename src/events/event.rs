//! # Lifecycle events emitted by the scheduler.
//!
//! [`EventKind`] classifies what happened; [`Event`] carries the metadata
//! relevant to that kind (attempt number, delay, remaining cooldown, reason).
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore exact order when events are observed
//! out of order by a slow receiver.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of scheduler events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A submission was accepted into the backlog (or started directly).
    ///
    /// Sets: `pending`, `active`, `at`, `seq`.
    Submitted,

    /// A submission was refused because the backlog was at capacity.
    ///
    /// Sets: `pending`, `at`, `seq`.
    Rejected,

    /// A task is starting an execution attempt.
    ///
    /// Sets: `attempt` (0-based), `active`, `at`, `seq`.
    TaskStarting,

    /// An attempt finished successfully; the caller has been settled.
    ///
    /// Sets: `attempt`, `at`, `seq`.
    TaskStopped,

    /// An attempt failed terminally; the caller received the error.
    ///
    /// Sets: `attempt`, `reason`, `at`, `seq`.
    TaskFailed,

    /// An attempt exceeded the per-task deadline (terminal, never retried).
    ///
    /// Sets: `attempt`, `timeout`, `at`, `seq`.
    TimeoutHit,

    /// A failed attempt was scheduled for retry after a backoff delay.
    ///
    /// Sets: `attempt` (the attempt that failed), `delay`, `reason`, `at`, `seq`.
    RetryScheduled,

    /// The cooldown gate closed; draining is paused.
    ///
    /// Sets: `remaining`, `at`, `seq`.
    CooldownStarted,

    /// The cooldown gate reopened; draining resumes.
    ///
    /// Sets: `at`, `seq`.
    CooldownElapsed,

    /// `reset()` was issued: backlog dropped, timers canceled.
    ///
    /// Sets: `pending` (tasks that were canceled), `at`, `seq`.
    ResetIssued,
}

/// Scheduler event with optional metadata.
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Attempt number (0-based), if applicable.
    pub attempt: Option<u32>,
    /// Backoff delay before the retry, if applicable.
    pub delay: Option<Duration>,
    /// Exceeded deadline, for `TimeoutHit`.
    pub timeout: Option<Duration>,
    /// Remaining cooldown, for `CooldownStarted`.
    pub remaining: Option<Duration>,
    /// Queue length at the time of the event.
    pub pending: Option<usize>,
    /// Active executions at the time of the event.
    pub active: Option<usize>,
    /// Human-readable reason (failure message).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with the current timestamp and
    /// the next global sequence number.
    pub fn now(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            attempt: None,
            delay: None,
            timeout: None,
            remaining: None,
            pending: None,
            active: None,
            reason: None,
        }
    }

    /// Attaches an attempt number (0-based).
    #[inline]
    pub fn with_attempt(mut self, n: u32) -> Self {
        self.attempt = Some(n);
        self
    }

    /// Attaches a backoff delay.
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        self.delay = Some(d);
        self
    }

    /// Attaches the exceeded deadline.
    #[inline]
    pub fn with_timeout(mut self, d: Duration) -> Self {
        self.timeout = Some(d);
        self
    }

    /// Attaches the remaining cooldown.
    #[inline]
    pub fn with_remaining(mut self, d: Duration) -> Self {
        self.remaining = Some(d);
        self
    }

    /// Attaches the backlog length.
    #[inline]
    pub fn with_pending(mut self, n: usize) -> Self {
        self.pending = Some(n);
        self
    }

    /// Attaches the active-execution count.
    #[inline]
    pub fn with_active(mut self, n: usize) -> Self {
        self.active = Some(n);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}
