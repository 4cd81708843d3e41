//! # Operation abstraction.
//!
//! An [`Operation`] is the opaque, niladic async function a caller submits to
//! the limiter. The scheduler never inspects it: it either produces a value
//! of type `T` or fails with a [`TaskError`]. Each attempt calls
//! [`Operation::invoke`] again, producing a **fresh** future — this is what
//! makes retries possible without shared mutable state inside the closure.
//!
//! A blanket implementation covers plain closures, so callers normally write:
//!
//! ```
//! use pacer::{LimiterConfig, RateLimiter, TaskError};
//!
//! # async fn demo() -> Result<(), TaskError> {
//! let limiter: RateLimiter<String> = RateLimiter::new(LimiterConfig::default());
//! let value = limiter.submit(|| async { Ok("hello".to_string()) }).await?;
//! # Ok(())
//! # }
//! ```

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::error::TaskError;

/// Shared handle to an operation, cheap to clone per attempt.
pub type OperationRef<T> = Arc<dyn Operation<T>>;

/// A repeatable, niladic async unit of work.
///
/// `invoke` must return a new future on every call; the scheduler calls it
/// once per attempt (the first execution and every retry).
pub trait Operation<T>: Send + Sync + 'static {
    /// Starts one attempt of the operation.
    fn invoke(&self) -> BoxFuture<'static, Result<T, TaskError>>;
}

impl<T, F, Fut> Operation<T> for F
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, TaskError>> + Send + 'static,
{
    fn invoke(&self) -> BoxFuture<'static, Result<T, TaskError>> {
        Box::pin((self)())
    }
}
