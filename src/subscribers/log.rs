//! # LogWriter — simple event printer
//!
//! A minimal subscriber that prints incoming [`Event`]s to stdout.
//! Use it for tests or demos.
//!
//! ## Example output
//! ```text
//! [submitted] pending=1 active=0
//! [starting] attempt=0 active=1
//! [failed] attempt=0 err="connection refused"
//! [retry] delay=200ms after_attempt=0
//! [cooldown] remaining=1s
//! [stopped] attempt=1
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Constructs a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::Submitted => {
                println!("[submitted] pending={:?} active={:?}", e.pending, e.active);
            }
            EventKind::Rejected => {
                println!("[rejected] pending={:?}", e.pending);
            }
            EventKind::TaskStarting => {
                println!("[starting] attempt={:?} active={:?}", e.attempt, e.active);
            }
            EventKind::TaskStopped => {
                println!("[stopped] attempt={:?}", e.attempt);
            }
            EventKind::TaskFailed => {
                println!("[failed] attempt={:?} err={:?}", e.attempt, e.reason);
            }
            EventKind::TimeoutHit => {
                println!("[timeout] attempt={:?} after={:?}", e.attempt, e.timeout);
            }
            EventKind::RetryScheduled => {
                println!(
                    "[retry] delay={:?} after_attempt={:?} err={:?}",
                    e.delay, e.attempt, e.reason
                );
            }
            EventKind::CooldownStarted => {
                println!("[cooldown] remaining={:?}", e.remaining);
            }
            EventKind::CooldownElapsed => {
                println!("[cooldown-elapsed]");
            }
            EventKind::ResetIssued => {
                println!("[reset] dropped={:?}", e.pending);
            }
        }
    }

    fn name(&self) -> &'static str {
        "log_writer"
    }
}
