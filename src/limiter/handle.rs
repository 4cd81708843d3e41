//! # RateLimiter: the public handle.
//!
//! Construction spawns the scheduler loop; the handle is a cheap clone that
//! submits work, issues resets, reads the observable state, and tears the
//! limiter down. One limiter instance governs one logical resource — create
//! as many independent instances as there are resources to pace.
//!
//! Lifetime: `dispose()` cancels the root token explicitly; dropping the last
//! handle does the same, so a limiter never outlives its owners.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio_util::sync::CancellationToken;

use crate::config::LimiterConfig;
use crate::error::TaskError;
use crate::events::{Bus, Event};
use crate::operation::{Operation, OperationRef};
use crate::subscribers::Subscribe;

use super::core::{Msg, Scheduler};
use super::job::Job;
use super::state::LimiterState;

/// Admission-controlled scheduler handle, generic over the operation's
/// success type `T`.
///
/// # Example
/// ```
/// use pacer::{LimiterConfig, RateLimiter, TaskError};
///
/// # async fn demo() -> Result<(), TaskError> {
/// let limiter: RateLimiter<u32> = RateLimiter::new(LimiterConfig::default());
///
/// let value = limiter.submit(|| async { Ok(41 + 1) }).await?;
/// assert_eq!(value, 42);
/// assert!(limiter.is_limited()); // cooldown armed after the attempt
/// # Ok(())
/// # }
/// ```
pub struct RateLimiter<T> {
    tx: mpsc::UnboundedSender<Msg<T>>,
    state: watch::Receiver<LimiterState>,
    bus: Bus,
    token: CancellationToken,
    _lifetime: Arc<LifetimeGuard>,
}

/// Cancels the root token when the last handle is dropped.
struct LifetimeGuard {
    token: CancellationToken,
}

impl Drop for LifetimeGuard {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

impl<T> Clone for RateLimiter<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            state: self.state.clone(),
            bus: self.bus.clone(),
            token: self.token.clone(),
            _lifetime: Arc::clone(&self._lifetime),
        }
    }
}

impl<T: Send + 'static> RateLimiter<T> {
    /// Creates a limiter with no subscribers attached.
    pub fn new(cfg: LimiterConfig) -> Self {
        Self::with_subscribers(cfg, Vec::new())
    }

    /// Creates a limiter and attaches the given subscribers.
    ///
    /// Subscribers run on a dedicated listener task fed from the event bus;
    /// a slow subscriber delays the others but never the scheduler.
    pub fn with_subscribers(cfg: LimiterConfig, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(LimiterState::default());
        let token = CancellationToken::new();
        let bus = Bus::new(cfg.event_capacity);

        if !subscribers.is_empty() {
            Self::spawn_listener(bus.subscribe(), subscribers, token.clone());
        }

        let scheduler = Scheduler::new(cfg, bus.clone(), state_tx, tx.clone(), token.clone());
        tokio::spawn(scheduler.run(rx));

        Self {
            tx,
            state: state_rx,
            bus,
            token: token.clone(),
            _lifetime: Arc::new(LifetimeGuard { token }),
        }
    }

    fn spawn_listener(
        mut rx: broadcast::Receiver<Event>,
        subscribers: Vec<Arc<dyn Subscribe>>,
        token: CancellationToken,
    ) {
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    res = rx.recv() => match res {
                        Ok(ev) => {
                            for sub in &subscribers {
                                sub.on_event(&ev).await;
                            }
                        }
                        Err(broadcast::error::RecvError::Lagged(_)) => continue,
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                }
            }
        });
    }

    /// Submits an operation and waits for it to settle.
    ///
    /// Resolves immediately with [`TaskError::QueueFull`] when the backlog is
    /// at capacity; otherwise the future suspends until the task succeeds,
    /// fails terminally, or is canceled by `reset()`/teardown.
    pub async fn submit<O: Operation<T>>(&self, op: O) -> Result<T, TaskError> {
        self.submit_ref(Arc::new(op)).await
    }

    /// Like [`submit`](Self::submit), for an already-shared operation.
    pub async fn submit_ref(&self, op: OperationRef<T>) -> Result<T, TaskError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let job = Job::new(op, reply_tx);
        if self.tx.send(Msg::Submit(job)).is_err() {
            return Err(TaskError::Canceled);
        }
        // A dropped reply channel means the scheduler discarded the task
        // (reset during backoff, or disposal).
        reply_rx.await.unwrap_or(Err(TaskError::Canceled))
    }

    /// Cancels every pending timer, settles every queued task with
    /// [`TaskError::Canceled`], and clears the cooldown gate.
    ///
    /// Tasks already mid-execution run to completion and their outcome is
    /// still delivered.
    pub fn reset(&self) {
        let _ = self.tx.send(Msg::Reset);
    }

    /// Tears the limiter down: every timer is cancelled, queued tasks settle
    /// with [`TaskError::Canceled`], and no further state mutation occurs.
    /// Outcomes of attempts still in flight are discarded.
    pub fn dispose(&self) {
        self.token.cancel();
    }

    /// True once `dispose()` ran or the last handle was dropped.
    pub fn is_disposed(&self) -> bool {
        self.token.is_cancelled()
    }

    // ---- observable state ----

    /// Current snapshot of the observable state.
    pub fn state(&self) -> LimiterState {
        self.state.borrow().clone()
    }

    /// Whether a cooldown is currently blocking dequeue.
    pub fn is_limited(&self) -> bool {
        self.state.borrow().is_limited
    }

    /// Time left on the cooldown (coarse; refreshed ~every 100ms).
    pub fn cooldown_remaining(&self) -> Duration {
        self.state.borrow().cooldown_remaining
    }

    /// Number of tasks waiting in the backlog.
    pub fn pending_count(&self) -> usize {
        self.state.borrow().pending_count
    }

    /// Number of tasks currently executing.
    pub fn active_count(&self) -> usize {
        self.state.borrow().active_count
    }

    /// True while at least one task is executing.
    pub fn is_executing(&self) -> bool {
        self.state.borrow().is_executing()
    }

    /// A watch receiver for callers that want to await state changes instead
    /// of polling.
    pub fn watch(&self) -> watch::Receiver<LimiterState> {
        self.state.clone()
    }

    /// A receiver of lifecycle [`Event`]s published from this point on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }
}
