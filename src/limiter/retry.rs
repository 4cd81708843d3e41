//! # Retry policy.
//!
//! Decides, given a failed attempt, whether the task goes back into the
//! queue and after what delay. The delay for a task that has already used
//! `attempt` attempts is `base × 2^attempt` (exponential backoff, attempt
//! counted from 0).
//!
//! Timeouts and cancellations are never retried regardless of configuration;
//! only [`TaskError::Failed`] is eligible.

use std::time::Duration;

use crate::config::LimiterConfig;
use crate::error::TaskError;

/// Eligibility and backoff computation for failed attempts.
#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    /// Master switch; when false every failure is terminal.
    pub enabled: bool,
    /// Attempts allowed beyond the first.
    pub max_retries: u32,
    /// Backoff base: delay = `base × 2^attempt`.
    pub base: Duration,
}

impl RetryPolicy {
    /// Extracts the retry parameters from a limiter configuration.
    pub fn from_config(cfg: &LimiterConfig) -> Self {
        Self {
            enabled: cfg.enable_retry,
            max_retries: cfg.max_retries,
            base: cfg.retry_base_delay,
        }
    }

    /// Returns the backoff delay before the next attempt, or `None` when the
    /// failure is terminal (retries disabled, attempts exhausted, or the
    /// error itself is not retryable).
    pub fn decide(&self, err: &TaskError, attempt: u32) -> Option<Duration> {
        if !self.enabled || !err.is_retryable() || attempt >= self.max_retries {
            return None;
        }
        Some(self.delay_for(attempt))
    }

    /// Backoff delay for a 0-based attempt number, saturating on overflow.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.base.saturating_mul(factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(enabled: bool, max_retries: u32, base_ms: u64) -> RetryPolicy {
        RetryPolicy {
            enabled,
            max_retries,
            base: Duration::from_millis(base_ms),
        }
    }

    #[test]
    fn test_exponential_delays() {
        let p = policy(true, 5, 100);
        assert_eq!(p.delay_for(0), Duration::from_millis(100));
        assert_eq!(p.delay_for(1), Duration::from_millis(200));
        assert_eq!(p.delay_for(2), Duration::from_millis(400));
        assert_eq!(p.delay_for(3), Duration::from_millis(800));
    }

    #[test]
    fn test_delay_saturates_on_huge_attempt() {
        let p = policy(true, u32::MAX, 1000);
        // 2^40 shifts out of u32; must clamp, not wrap.
        assert_eq!(p.delay_for(40), Duration::from_millis(1000).saturating_mul(u32::MAX));
    }

    #[test]
    fn test_disabled_policy_never_retries() {
        let p = policy(false, 3, 100);
        assert_eq!(p.decide(&TaskError::failed("boom"), 0), None);
    }

    #[test]
    fn test_attempts_exhausted() {
        let p = policy(true, 2, 100);
        assert!(p.decide(&TaskError::failed("boom"), 0).is_some());
        assert!(p.decide(&TaskError::failed("boom"), 1).is_some());
        assert_eq!(p.decide(&TaskError::failed("boom"), 2), None);
    }

    #[test]
    fn test_timeout_and_cancel_are_terminal() {
        let p = policy(true, 3, 100);
        let timeout = TaskError::Timeout {
            timeout: Duration::from_millis(50),
        };
        assert_eq!(p.decide(&timeout, 0), None);
        assert_eq!(p.decide(&TaskError::Canceled, 0), None);
    }

    #[test]
    fn test_decide_returns_backoff_for_attempt() {
        let p = policy(true, 3, 100);
        assert_eq!(
            p.decide(&TaskError::failed("boom"), 1),
            Some(Duration::from_millis(200))
        );
    }

    #[test]
    fn test_from_config() {
        let cfg = LimiterConfig {
            enable_retry: true,
            max_retries: 7,
            retry_base_delay: Duration::from_millis(250),
            ..LimiterConfig::default()
        };
        let p = RetryPolicy::from_config(&cfg);
        assert!(p.enabled);
        assert_eq!(p.max_retries, 7);
        assert_eq!(p.base, Duration::from_millis(250));
    }
}
