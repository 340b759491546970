//! End-to-end tests for retry runs, breakers, and background tasks.
//!
//! Everything here runs on a paused tokio clock, so multi-minute schedules
//! resolve instantly in virtual time.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use headwater::testing::FlakyOp;
use headwater::{
    BreakerError, CircuitBreaker, Retrier, RetryError, RetrySchedule, Task, TaskError,
};
use tokio_util::sync::CancellationToken;

#[tokio::test(start_paused = true)]
async fn retry_drives_a_flaky_dependency_to_success() {
    let retrier =
        Retrier::new(RetrySchedule::new(vec![Duration::from_secs(1); 10]).with_jitter(0.0));
    let op = FlakyOp::failing(6);

    let handle = op.clone();
    let start = tokio::time::Instant::now();
    let result = retrier
        .execute(&CancellationToken::new(), || {
            let op = handle.clone();
            async move { op.attempt() }
        })
        .await;

    // Six failures, then success on attempt seven after six backoff waits.
    assert_eq!(result, Ok(7));
    assert_eq!(op.calls(), 7);
    assert_eq!(start.elapsed(), Duration::from_secs(6));
}

#[tokio::test(start_paused = true)]
async fn default_schedule_caps_a_run_at_ten_attempts() {
    let retrier = Retrier::default();
    let start = tokio::time::Instant::now();

    let result = retrier
        .execute(&CancellationToken::new(), || async { Err::<(), _>("down") })
        .await;

    assert_eq!(result, Err(RetryError::Exhausted { attempts: 10 }));

    // The base table totals 303s; jitter keeps the run inside ±25% of that.
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_secs_f64(303.0 * 0.75), "{elapsed:?}");
    assert!(elapsed <= Duration::from_secs_f64(303.0 * 1.25), "{elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn shutdown_token_stops_a_background_retry_loop() {
    let retrier = Retrier::default();
    let shutdown = CancellationToken::new();

    let task = Task::spawn_with_token(&shutdown, move |token| async move {
        retrier
            .execute(&token, || async { Err::<(), _>("db down") })
            .await
    });

    // The first backoff ends by t=1.25s and the second no earlier than
    // t=2.25s, so cancelling at t=2s always lands inside the second wait.
    tokio::time::sleep(Duration::from_secs(2)).await;
    shutdown.cancel();

    assert_eq!(
        task.join().await,
        Err(TaskError::Failed(RetryError::Cancelled { attempts: 2 }))
    );
}

#[tokio::test(start_paused = true)]
async fn breaker_short_circuits_the_tail_of_a_retry_run() {
    let breaker = CircuitBreaker::new(2, Duration::from_secs(3600));
    let retrier =
        Retrier::new(RetrySchedule::new(vec![Duration::from_millis(100); 4]).with_jitter(0.0));

    let real_calls = Arc::new(AtomicU32::new(0));
    let result = retrier
        .execute(&CancellationToken::new(), || {
            let breaker = breaker.clone();
            let real_calls = real_calls.clone();
            async move {
                breaker
                    .call(|| async {
                        real_calls.fetch_add(1, Ordering::SeqCst);
                        Err::<(), _>("connection refused")
                    })
                    .await
            }
        })
        .await;

    // All four scheduled attempts ran, but the breaker let only the first
    // two reach the dependency.
    assert_eq!(result, Err(RetryError::Exhausted { attempts: 4 }));
    assert_eq!(real_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn breaker_recovers_between_retry_runs() {
    let breaker = CircuitBreaker::new(1, Duration::from_secs(30));

    let denied = breaker
        .call(|| async { Err::<(), _>("cold start") })
        .await;
    assert_eq!(denied, Err(BreakerError::Inner("cold start")));

    tokio::time::advance(Duration::from_secs(30)).await;

    let retrier = Retrier::new(RetrySchedule::new(vec![Duration::from_millis(50); 2]));
    let result = retrier
        .execute(&CancellationToken::new(), || {
            let breaker = breaker.clone();
            async move { breaker.call(|| async { Ok::<_, &str>("warm") }).await }
        })
        .await;

    assert_eq!(result, Ok("warm"));
}

#[tokio::test(start_paused = true)]
async fn aborting_the_task_does_not_disturb_other_runs() {
    let stuck: Task<(), &str> = Task::spawn(async {
        tokio::time::sleep(Duration::from_secs(86_400)).await;
        Ok(())
    });
    stuck.abort();
    assert_eq!(stuck.join().await, Err(TaskError::Aborted));

    // A fresh run on the same runtime is unaffected.
    let retrier = Retrier::new(RetrySchedule::new([Duration::from_millis(10)]));
    let result = retrier
        .execute(&CancellationToken::new(), || async { Ok::<_, &str>(5) })
        .await;
    assert_eq!(result, Ok(5));
}
