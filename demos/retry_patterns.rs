//! Retry Patterns Example
//!
//! Demonstrates schedule-driven retries with jitter and cancellation.
//! Shows practical patterns including:
//! - Basic retry over a custom schedule
//! - Inspecting schedules and jitter bands
//! - Cooperative cancellation mid-run
//! - Handling exhaustion
//! - Guarding a flaky dependency with a circuit breaker

use std::time::Duration;

use headwater::{BreakerError, CircuitBreaker, Retrier, RetryError, RetrySchedule};
use tokio_util::sync::CancellationToken;

// ==================== Basic Retry ====================

/// Example 1: Basic retry over a short custom schedule
///
/// Demonstrates retrying an operation that fails transiently.
async fn example_basic_retry() {
    println!("\n=== Example 1: Basic Retry ===");

    let retrier = Retrier::new(RetrySchedule::new([
        Duration::from_millis(50),
        Duration::from_millis(100),
        Duration::from_millis(200),
    ]));

    let mut attempts = 0;
    let result = retrier
        .execute(&CancellationToken::new(), || {
            attempts += 1;
            println!("  Attempt {}", attempts);
            let ready = attempts >= 3;
            async move {
                if ready {
                    Ok("success!")
                } else {
                    Err("transient failure")
                }
            }
        })
        .await;

    match result {
        Ok(value) => println!("Succeeded after {} attempts: {}", attempts, value),
        Err(err) => println!("Gave up: {}", err),
    }
}

// ==================== Schedules and Jitter ====================

/// Example 2: The default schedule and its jitter band
///
/// Shows the base delay table and how jitter spreads individual waits.
async fn example_schedules() {
    println!("\n=== Example 2: Schedules and Jitter ===");

    let schedule = RetrySchedule::default();
    println!("Default base delays ({} attempts):", schedule.len());
    for (slot, base) in schedule.delays().iter().enumerate() {
        println!("  slot {}: {:?}", slot, base);
    }

    println!("Three jittered samples of the 4s slot:");
    for _ in 0..3 {
        println!("  {:?}", schedule.apply_jitter(Duration::from_secs(4)));
    }

    let tight = RetrySchedule::new([Duration::from_millis(100)]).with_jitter(0.0);
    println!(
        "With jitter disabled the sample is exact: {:?}",
        tight.apply_jitter(Duration::from_millis(100))
    );
}

// ==================== Cancellation ====================

/// Example 3: Cooperative cancellation
///
/// A long retry run stops cleanly when the shutdown token fires.
async fn example_cancellation() {
    println!("\n=== Example 3: Cooperative Cancellation ===");

    let retrier = Retrier::new(RetrySchedule::new(vec![Duration::from_secs(3600); 5]));
    let token = CancellationToken::new();

    let canceller = {
        let token = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            println!("  Shutting down...");
            token.cancel();
        })
    };

    let result = retrier
        .execute(&token, || async { Err::<(), _>("service unavailable") })
        .await;

    match result {
        Err(RetryError::Cancelled { attempts }) => {
            println!("Run stopped by cancellation after {} attempts", attempts);
        }
        other => println!("Unexpected outcome: {:?}", other),
    }

    let _ = canceller.await;
}

// ==================== Exhaustion ====================

/// Example 4: Handling exhaustion
///
/// When every scheduled attempt fails, the error reports the attempt count.
async fn example_exhaustion() {
    println!("\n=== Example 4: Exhaustion ===");

    let retrier = Retrier::new(RetrySchedule::new(vec![Duration::from_millis(20); 4]));

    let result = retrier
        .execute(&CancellationToken::new(), || async {
            Err::<(), _>("hard down")
        })
        .await;

    match result {
        Err(err) if err.is_exhausted() => println!("Report: {}", err),
        other => println!("Unexpected outcome: {:?}", other),
    }
}

// ==================== Circuit Breaker ====================

/// Example 5: Circuit breaker in front of a failing dependency
///
/// After the failure threshold the breaker rejects calls outright, then
/// admits a probe once the reset timeout has passed.
async fn example_circuit_breaker() {
    println!("\n=== Example 5: Circuit Breaker ===");

    let breaker = CircuitBreaker::new(3, Duration::from_millis(250));

    for call in 1..=5 {
        let result = breaker
            .call(|| async { Err::<(), _>("connection refused") })
            .await;
        match result {
            Err(BreakerError::Inner(e)) => println!("  call {}: failed ({})", call, e),
            Err(BreakerError::Open) => println!("  call {}: rejected, breaker is open", call),
            Ok(()) => println!("  call {}: ok", call),
        }
    }
    println!("State after the burst: {:?}", breaker.state());

    tokio::time::sleep(Duration::from_millis(300)).await;
    let probe = breaker.call(|| async { Ok::<_, &str>("recovered") }).await;
    println!("Probe after the reset timeout: {:?}", probe);
    println!("State: {:?}", breaker.state());
}

#[tokio::main]
async fn main() {
    println!("======================================");
    println!("       Retry Patterns Example         ");
    println!("======================================");

    example_basic_retry().await;
    example_schedules().await;
    example_cancellation().await;
    example_exhaustion().await;
    example_circuit_breaker().await;

    println!("\n======================================");
    println!("           Examples Complete          ");
    println!("======================================");
}
