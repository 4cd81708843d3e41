//! # Limiter configuration.
//!
//! [`LimiterConfig`] is materialized once, at construction, with explicit
//! defaults; it is immutable for the lifetime of a [`RateLimiter`](crate::RateLimiter)
//! instance. There is no ad-hoc per-call merging.
//!
//! ## Field semantics
//! - `max_concurrent`: simultaneous executions (clamped to a minimum of 1)
//! - `cooldown`: mandatory spacing between execution starts
//! - `max_queue_size`: waiting tasks allowed before outright rejection
//!   (`0` = no backlog: submissions that cannot start immediately are rejected)
//! - `timeout`: per-attempt forced-failure deadline
//! - `enable_retry` / `max_retries` / `retry_base_delay`: retry behavior for
//!   retryable failures (see [`RetryPolicy`](crate::RetryPolicy))

use std::time::Duration;

/// Configuration for one limiter instance.
///
/// All fields are public; prefer the accessors where a field has a clamp.
#[derive(Clone, Debug)]
pub struct LimiterConfig {
    /// Upper bound on simultaneous executions (minimum 1).
    pub max_concurrent: usize,

    /// Mandatory spacing between execution starts.
    ///
    /// The gate is re-armed after every attempt, so this is also the minimum
    /// delay between one task finishing and the next one starting.
    pub cooldown: Duration,

    /// Backlog capacity. Submissions beyond it settle with
    /// [`TaskError::QueueFull`](crate::TaskError::QueueFull) immediately.
    pub max_queue_size: usize,

    /// Per-attempt deadline. A timed-out attempt is terminal and never retried.
    pub timeout: Duration,

    /// Whether retryable failures are re-queued.
    pub enable_retry: bool,

    /// Attempts allowed beyond the first.
    pub max_retries: u32,

    /// Base for the exponential backoff: `retry_base_delay × 2^attempt`.
    pub retry_base_delay: Duration,

    /// Ring-buffer capacity of the event bus (minimum 1).
    ///
    /// Slow event receivers that lag behind more than this many events skip
    /// the oldest ones.
    pub event_capacity: usize,
}

impl Default for LimiterConfig {
    /// Default configuration:
    ///
    /// - `max_concurrent = 1`
    /// - `cooldown = 1s`
    /// - `max_queue_size = 3`
    /// - `timeout = 60s`
    /// - `enable_retry = false`
    /// - `max_retries = 3`
    /// - `retry_base_delay = 1s`
    /// - `event_capacity = 128`
    fn default() -> Self {
        Self {
            max_concurrent: 1,
            cooldown: Duration::from_secs(1),
            max_queue_size: 3,
            timeout: Duration::from_secs(60),
            enable_retry: false,
            max_retries: 3,
            retry_base_delay: Duration::from_secs(1),
            event_capacity: 128,
        }
    }
}

impl LimiterConfig {
    /// Concurrency limit with the minimum of 1 applied.
    #[inline]
    pub fn concurrency_limit(&self) -> usize {
        self.max_concurrent.max(1)
    }

    /// Preset for interactive calls to a language-model provider.
    ///
    /// One call at a time, 2s spacing, short backlog, retries enabled.
    pub fn llm() -> Self {
        Self {
            max_concurrent: 1,
            cooldown: Duration::from_secs(2),
            max_queue_size: 3,
            timeout: Duration::from_secs(60),
            enable_retry: true,
            max_retries: 2,
            retry_base_delay: Duration::from_secs(2),
            ..Self::default()
        }
    }

    /// Preset for operations that must not overlap at all.
    ///
    /// No retries and a backlog of one: a second submission while busy waits,
    /// a third is rejected.
    pub fn exclusive() -> Self {
        Self {
            max_concurrent: 1,
            cooldown: Duration::from_secs(1),
            max_queue_size: 1,
            timeout: Duration::from_secs(120),
            enable_retry: false,
            ..Self::default()
        }
    }

    /// Preset for batch fan-out against a tolerant backend.
    pub fn batch() -> Self {
        Self {
            max_concurrent: 3,
            cooldown: Duration::from_millis(500),
            max_queue_size: 10,
            timeout: Duration::from_secs(120),
            enable_retry: true,
            max_retries: 2,
            ..Self::default()
        }
    }
}
