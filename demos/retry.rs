//! # Demo: retry
//!
//! A flaky operation that fails twice before succeeding, retried with
//! exponential backoff (200ms, then 400ms).
//!
//! ## Run
//! ```bash
//! cargo run --example retry
//! ```

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use pacer::{LimiterConfig, LogWriter, RateLimiter, Subscribe, TaskError};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = LimiterConfig {
        cooldown: Duration::from_millis(100),
        enable_retry: true,
        max_retries: 3,
        retry_base_delay: Duration::from_millis(200),
        ..LimiterConfig::default()
    };

    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let limiter: RateLimiter<&'static str> = RateLimiter::with_subscribers(cfg, subs);

    let attempts = Arc::new(AtomicU32::new(0));
    let a = attempts.clone();
    let out = limiter
        .submit(move || {
            let a = a.clone();
            async move {
                let n = a.fetch_add(1, Ordering::SeqCst) + 1;
                println!("[flaky] attempt {n}");
                if n <= 2 {
                    Err(TaskError::failed(format!("boom #{n}")))
                } else {
                    Ok("success on attempt 3")
                }
            }
        })
        .await?;

    println!("final outcome: {out}");
    limiter.dispose();
    Ok(())
}
