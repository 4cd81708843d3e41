//! One admitted unit of work tracked by the scheduler.

use tokio::sync::oneshot;

use crate::error::TaskError;
use crate::operation::OperationRef;

/// A submitted task: the operation, its attempt counter, and the channel
/// that settles the original `submit()` call.
///
/// Owned exclusively by the scheduler from admission until it settles.
/// Dropping a job without settling it closes the reply channel, which the
/// caller observes as [`TaskError::Canceled`].
pub(crate) struct Job<T> {
    /// The caller-supplied operation; invoked once per attempt.
    pub op: OperationRef<T>,
    /// Attempts already consumed (0 before the first execution).
    pub attempt: u32,
    reply: oneshot::Sender<Result<T, TaskError>>,
}

impl<T> Job<T> {
    pub fn new(op: OperationRef<T>, reply: oneshot::Sender<Result<T, TaskError>>) -> Self {
        Self {
            op,
            attempt: 0,
            reply,
        }
    }

    /// Delivers the terminal outcome to the caller.
    ///
    /// The send fails only if the caller dropped its `submit()` future;
    /// the outcome is discarded in that case.
    pub fn settle(self, outcome: Result<T, TaskError>) {
        let _ = self.reply.send(outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_settle_delivers_outcome() {
        let op: OperationRef<u32> = Arc::new(|| async { Ok(1) });
        let (tx, rx) = oneshot::channel();
        let job = Job::new(op, tx);
        assert_eq!(job.attempt, 0);

        job.settle(Err(TaskError::QueueFull));
        assert_eq!(rx.await.unwrap(), Err(TaskError::QueueFull));
    }

    #[tokio::test]
    async fn test_dropping_job_closes_reply() {
        let op: OperationRef<u32> = Arc::new(|| async { Ok(1) });
        let (tx, rx) = oneshot::channel();
        let job = Job::new(op, tx);
        drop(job);
        assert!(rx.await.is_err());
    }
}
