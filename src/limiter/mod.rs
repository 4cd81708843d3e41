//! Admission controller: handle, scheduler loop, and supporting pieces.

mod cooldown;
mod core;
mod handle;
mod job;
mod queue;
mod state;
mod timers;

pub mod retry;

pub use handle::RateLimiter;
pub use retry::RetryPolicy;
pub use state::LimiterState;
