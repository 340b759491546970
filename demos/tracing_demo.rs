//! Demonstrates tracing integration with retry runs
//!
//! Run with: cargo run --example tracing_demo --features tracing

use std::time::Duration;

use headwater::{Retrier, RetrySchedule};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    // Set up tracing subscriber
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    tracing::info!("starting retry demo");

    let retrier = Retrier::new(RetrySchedule::new([
        Duration::from_millis(100),
        Duration::from_millis(200),
        Duration::from_millis(400),
    ]));

    let mut attempts = 0;
    let result = retrier
        .execute(&CancellationToken::new(), || {
            attempts += 1;
            let ready = attempts >= 3;
            async move {
                if ready {
                    Ok("upstream healthy")
                } else {
                    Err("probe failed")
                }
            }
        })
        .await;

    match result {
        Ok(message) => tracing::info!("run finished: {}", message),
        Err(err) => tracing::error!("run failed: {}", err),
    }

    // A run that exhausts its schedule, with the backoff events visible.
    let short = Retrier::new(RetrySchedule::new(vec![Duration::from_millis(50); 2]));
    let outcome = short
        .execute(&CancellationToken::new(), || async {
            Err::<(), _>("still down")
        })
        .await;
    tracing::info!("short run outcome: {:?}", outcome);
}
