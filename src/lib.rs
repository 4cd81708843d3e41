//! # pacer
//!
//! **pacer** is an admission-controlled scheduler for expensive async
//! operations — calls to a rate-limited external service, typically a
//! language-model provider. It bounds how many operations run concurrently,
//! enforces a mandatory cooldown between executions, keeps a bounded backlog
//! of pending submissions, and retries transient failures with exponential
//! backoff, all without ever exceeding the configured limits.
//!
//! ## Architecture
//! ```text
//!     caller                 caller                 caller
//!       │ submit(op)           │ submit(op)           │ reset()
//!       ▼                      ▼                      ▼
//! ┌───────────────────────────────────────────────────────────────┐
//! │  RateLimiter<T> (cloneable handle)                            │
//! │  - mailbox sender (mpsc)                                      │
//! │  - observable state (watch<LimiterState>)                     │
//! │  - event bus (broadcast<Event>)                               │
//! └──────────────────────────────┬────────────────────────────────┘
//!                                ▼  one mailbox, serialized
//! ┌───────────────────────────────────────────────────────────────┐
//! │  Scheduler (single-owner loop)                                │
//! │  - BoundedQueue: FIFO backlog, retries re-enter at the head   │
//! │  - CooldownGate: spacing between execution starts             │
//! │  - RetryPolicy: eligibility + exponential backoff             │
//! │  - TimerSet: cancellable one-shot / periodic timers           │
//! └───────┬──────────────────────────────────────────────┬────────┘
//!         ▼ spawn per attempt                             ▼
//!   timeout(cfg.timeout, op.invoke())              Bus ──► subscribers
//!         │                                              (LogWriter, ...)
//!         ▼
//!   Msg::Settled { job, outcome }
//! ```
//!
//! ## Lifecycle of a submission
//! ```text
//! submit(op)
//!   ├─ backlog full ──► Err(QueueFull)          (immediate, no task created)
//!   └─ admitted ──► Queued ⇄ Executing
//!         │             │
//!         │             ├─ Ok(value) ───────────► caller gets Ok(value)
//!         │             ├─ Timeout ─────────────► caller gets Err(Timeout)   (never retried)
//!         │             ├─ Failed, retries left ► backoff, re-queued at head
//!         │             └─ Failed, exhausted ───► caller gets Err(Failed)
//!         └─ reset()/dispose() ─────────────────► caller gets Err(Canceled)
//! ```
//!
//! After **every** attempt the cooldown re-arms, so execution starts are
//! always spaced by at least [`LimiterConfig::cooldown`].
//!
//! ## Example
//! ```rust
//! use pacer::{LimiterConfig, RateLimiter, TaskError};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), TaskError> {
//!     let limiter: RateLimiter<String> = RateLimiter::new(LimiterConfig::llm());
//!
//!     let answer = limiter
//!         .submit(|| async {
//!             // call the expensive service here
//!             Ok("ok".to_string())
//!         })
//!         .await?;
//!
//!     assert_eq!(answer, "ok");
//!     assert!(limiter.is_limited()); // cooldown in progress
//!     Ok(())
//! }
//! ```
//!
//! | Area              | Description                                              | Key types / traits              |
//! |-------------------|----------------------------------------------------------|---------------------------------|
//! | **Admission**     | Bounded backlog, immediate rejection at capacity.        | [`RateLimiter`], [`TaskError`]  |
//! | **Pacing**        | Cooldown spacing between execution starts.               | [`LimiterConfig`]               |
//! | **Retry**         | Exponential backoff for retryable failures.              | [`RetryPolicy`]                 |
//! | **Observability** | State snapshots and lifecycle events.                    | [`LimiterState`], [`Subscribe`] |
//! | **Operations**    | Caller-supplied niladic async units.                     | [`Operation`]                   |

mod config;
mod error;
mod events;
mod limiter;
mod operation;
mod subscribers;

// ---- Public re-exports ----

pub use config::LimiterConfig;
pub use error::TaskError;
pub use events::{Bus, Event, EventKind};
pub use limiter::{LimiterState, RateLimiter, RetryPolicy};
pub use operation::{Operation, OperationRef};
pub use subscribers::{LogWriter, Subscribe};
