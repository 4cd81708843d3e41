//! Error type delivered to `submit()` callers.
//!
//! Every task settles with exactly one terminal outcome: the operation's
//! success value, or one of the [`TaskError`] variants below. Queue-full
//! rejection is a deterministic admission decision, not a runtime fault,
//! but it travels through the same tagged type so callers can never confuse
//! "rejected" with a legitimate empty result.
//!
//! Retryability:
//! - [`TaskError::Failed`] — retryable when the limiter is configured for it.
//! - [`TaskError::Timeout`] — terminal, never retried.
//! - [`TaskError::Canceled`] — terminal, produced by `reset()`/teardown.
//! - [`TaskError::QueueFull`] — terminal, produced before a task exists.

use std::time::Duration;
use thiserror::Error;

/// Terminal outcome of a submission that did not produce a value.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// Admission was refused because the backlog is at capacity.
    #[error("queue full, submission rejected")]
    QueueFull,

    /// The attempt exceeded the per-task deadline.
    #[error("timed out after {timeout:?}")]
    Timeout {
        /// The deadline that was exceeded.
        timeout: Duration,
    },

    /// The operation failed; may be retried if the limiter allows it.
    #[error("execution failed: {reason}")]
    Failed {
        /// The underlying error message.
        reason: String,
    },

    /// The task was dropped by `reset()` or limiter teardown.
    #[error("canceled")]
    Canceled,
}

impl TaskError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use pacer::TaskError;
    ///
    /// assert_eq!(TaskError::QueueFull.as_label(), "queue_full");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::QueueFull => "queue_full",
            TaskError::Timeout { .. } => "timeout",
            TaskError::Failed { .. } => "failed",
            TaskError::Canceled => "canceled",
        }
    }

    /// Indicates whether the error may be retried by the limiter.
    ///
    /// Only [`TaskError::Failed`] qualifies: timeouts are a hard per-task
    /// deadline, cancellation is a teardown signal, and a queue-full
    /// rejection never created a task in the first place.
    ///
    /// # Example
    /// ```
    /// use pacer::TaskError;
    /// use std::time::Duration;
    ///
    /// assert!(TaskError::Failed { reason: "boom".into() }.is_retryable());
    /// assert!(!TaskError::Timeout { timeout: Duration::from_secs(1) }.is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        matches!(self, TaskError::Failed { .. })
    }

    /// Convenience constructor for an operation failure.
    pub fn failed(reason: impl Into<String>) -> Self {
        TaskError::Failed {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_stable() {
        assert_eq!(TaskError::QueueFull.as_label(), "queue_full");
        assert_eq!(
            TaskError::Timeout {
                timeout: Duration::from_secs(1)
            }
            .as_label(),
            "timeout"
        );
        assert_eq!(TaskError::failed("x").as_label(), "failed");
        assert_eq!(TaskError::Canceled.as_label(), "canceled");
    }

    #[test]
    fn test_only_failed_is_retryable() {
        assert!(TaskError::failed("boom").is_retryable());
        assert!(!TaskError::QueueFull.is_retryable());
        assert!(!TaskError::Canceled.is_retryable());
        assert!(!TaskError::Timeout {
            timeout: Duration::from_millis(50)
        }
        .is_retryable());
    }

    #[test]
    fn test_display_includes_reason() {
        let e = TaskError::failed("connection refused");
        assert!(e.to_string().contains("connection refused"));
    }
}
