//! # Demo: basic
//!
//! Submits a handful of fake "expensive" operations through a limiter with a
//! short cooldown and watches the observable state evolve.
//!
//! ## Run
//! ```bash
//! cargo run --example basic
//! ```

use std::sync::Arc;
use std::time::Duration;

use pacer::{LimiterConfig, LogWriter, RateLimiter, Subscribe, TaskError};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = LimiterConfig {
        max_concurrent: 1,
        cooldown: Duration::from_millis(500),
        max_queue_size: 3,
        ..LimiterConfig::default()
    };

    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let limiter: RateLimiter<String> = RateLimiter::with_subscribers(cfg, subs);

    let mut handles = Vec::new();
    for i in 0..5 {
        let l = limiter.clone();
        handles.push(tokio::spawn(async move {
            let out = l
                .submit(move || async move {
                    tokio::time::sleep(Duration::from_millis(100)).await;
                    Ok(format!("result #{i}"))
                })
                .await;
            (i, out)
        }));
    }

    // With a backlog of 3, one running and three queued fit; the fifth
    // submission is rejected outright.
    for h in handles {
        match h.await? {
            (i, Ok(v)) => println!("op {i}: {v}"),
            (i, Err(TaskError::QueueFull)) => println!("op {i}: rejected, queue full"),
            (i, Err(e)) => println!("op {i}: {e}"),
        }
        println!(
            "  state: limited={} remaining={:?} pending={} active={}",
            limiter.is_limited(),
            limiter.cooldown_remaining(),
            limiter.pending_count(),
            limiter.active_count(),
        );
    }

    limiter.dispose();
    Ok(())
}
