//! # Subscriber trait
//!
//! `Subscribe` is the extension point for plugging custom event handlers into
//! the limiter (logging, metrics, UI state). Subscribers attached via
//! [`RateLimiter::with_subscribers`](crate::RateLimiter::with_subscribers)
//! are driven by a dedicated listener task fed from the event [`Bus`](crate::Bus);
//! they never run on the scheduler loop itself.

use async_trait::async_trait;

use crate::events::Event;

/// Contract for event subscribers.
///
/// Called from the listener task. Implementations should avoid blocking the
/// async runtime (prefer async I/O and cooperative waits); a slow subscriber
/// delays other subscribers, not the scheduler.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handle a single event.
    async fn on_event(&self, event: &Event);

    /// Human-readable name (for logs/metrics).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
