//! # Tracked, cancellable timers.
//!
//! Two primitives, both delivering into the scheduler mailbox so that every
//! timer callback is serialized through the single-owner loop:
//!
//! - [`TimerSet::once`] — one-shot delayed message, returns a cancellation
//!   handle;
//! - [`TimerSet::every`] — periodic message, same handle.
//!
//! All timers are children of an *epoch* token, which itself is a child of
//! the limiter's root token. [`TimerSet::cancel_all`] cancels the epoch and
//! starts a fresh one — `reset()` kills every outstanding timer atomically
//! without touching the limiter's lifetime. Disposal cancels the root, which
//! reaches the epoch and therefore every timer, including ones already
//! sleeping; a cancelled timer never delivers its message.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Cancellation handle for one scheduled timer.
#[derive(Debug)]
pub(crate) struct TimerHandle {
    token: CancellationToken,
}

impl TimerHandle {
    /// Cancels the timer; a pending fire is suppressed.
    pub fn cancel(&self) {
        self.token.cancel();
    }
}

/// Factory for tracked timers delivering messages of type `M`.
pub(crate) struct TimerSet<M> {
    tx: mpsc::UnboundedSender<M>,
    root: CancellationToken,
    epoch: CancellationToken,
}

impl<M: Send + 'static> TimerSet<M> {
    pub fn new(tx: mpsc::UnboundedSender<M>, root: CancellationToken) -> Self {
        let epoch = root.child_token();
        Self { tx, root, epoch }
    }

    /// Schedules `msg` for delivery after `delay`.
    pub fn once(&self, delay: Duration, msg: M) -> TimerHandle {
        let token = self.epoch.child_token();
        let guard = token.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = guard.cancelled() => {}
                _ = time::sleep(delay) => {
                    let _ = tx.send(msg);
                }
            }
        });
        TimerHandle { token }
    }

    /// Schedules a message every `period`, starting one period from now.
    ///
    /// The loop exits when the handle (or an ancestor token) is cancelled or
    /// the mailbox is gone.
    pub fn every(&self, period: Duration, make: impl Fn() -> M + Send + 'static) -> TimerHandle {
        let token = self.epoch.child_token();
        let guard = token.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let mut ticks = time::interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = guard.cancelled() => break,
                    _ = ticks.tick() => {
                        if tx.send(make()).is_err() {
                            break;
                        }
                    }
                }
            }
        });
        TimerHandle { token }
    }

    /// Cancels every timer created so far and starts a fresh epoch.
    pub fn cancel_all(&mut self) {
        self.epoch.cancel();
        self.epoch = self.root.child_token();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (TimerSet<u32>, mpsc::UnboundedReceiver<u32>, CancellationToken) {
        let (tx, rx) = mpsc::unbounded_channel();
        let root = CancellationToken::new();
        (TimerSet::new(tx, root.clone()), rx, root)
    }

    #[tokio::test(start_paused = true)]
    async fn test_once_fires_after_delay() {
        let (set, mut rx, _root) = setup();
        set.once(Duration::from_millis(100), 1);

        time::advance(Duration::from_millis(99)).await;
        assert!(rx.try_recv().is_err());

        time::advance(Duration::from_millis(1)).await;
        assert_eq!(rx.recv().await, Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_once_never_fires() {
        let (set, mut rx, _root) = setup();
        let handle = set.once(Duration::from_millis(100), 1);
        handle.cancel();

        time::advance(Duration::from_millis(200)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_ticks_until_cancelled() {
        let (set, mut rx, _root) = setup();
        let handle = set.every(Duration::from_millis(100), || 7);

        time::advance(Duration::from_millis(100)).await;
        assert_eq!(rx.recv().await, Some(7));
        time::advance(Duration::from_millis(100)).await;
        assert_eq!(rx.recv().await, Some(7));

        handle.cancel();
        time::advance(Duration::from_millis(300)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_all_kills_outstanding_timers() {
        let (mut set, mut rx, _root) = setup();
        set.once(Duration::from_millis(100), 1);
        set.every(Duration::from_millis(50), || 2);

        set.cancel_all();
        time::advance(Duration::from_millis(500)).await;
        assert!(rx.try_recv().is_err());

        // New epoch still works.
        set.once(Duration::from_millis(10), 3);
        time::advance(Duration::from_millis(10)).await;
        assert_eq!(rx.recv().await, Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_root_cancellation_reaches_timers() {
        let (set, mut rx, root) = setup();
        set.once(Duration::from_millis(100), 1);

        root.cancel();
        time::advance(Duration::from_millis(200)).await;
        assert!(rx.try_recv().is_err());
    }
}
