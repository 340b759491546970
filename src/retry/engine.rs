//! The retry executor: drives operations through a schedule.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use super::error::RetryError;
use super::schedule::RetrySchedule;

/// Drives a fallible async operation through a [`RetrySchedule`].
///
/// The retrier re-invokes the operation until it succeeds, the schedule runs
/// out, or the cancellation token fires. Individual attempt errors are
/// swallowed: the terminal [`RetryError`] reports only how the run ended and
/// how many attempts were made. Callers that want the underlying errors
/// collect them inside the operation.
///
/// Cancellation is cooperative and observed at two points: immediately before
/// each attempt, and for the whole duration of each backoff wait. A token
/// that fires while an attempt is mid-flight does not interrupt it; the
/// attempt finishes and the run stops at the next checkpoint. When the token
/// and the timer are both ready, cancellation wins.
///
/// After every failed attempt the retrier waits out that slot's jittered
/// delay, including the final slot, so an exhausted run takes the schedule's
/// full duration.
///
/// # Examples
///
/// Succeed once the operation comes good:
///
/// ```rust
/// use headwater::{Retrier, RetrySchedule};
/// use std::time::Duration;
/// use tokio_util::sync::CancellationToken;
///
/// # tokio_test::block_on(async {
/// let retrier = Retrier::new(RetrySchedule::new([Duration::from_millis(1); 4]));
/// let token = CancellationToken::new();
///
/// let mut calls = 0;
/// let result = retrier
///     .execute(&token, || {
///         calls += 1;
///         let ready = calls >= 3;
///         async move {
///             if ready {
///                 Ok("connected")
///             } else {
///                 Err("connection refused")
///             }
///         }
///     })
///     .await;
///
/// assert_eq!(result, Ok("connected"));
/// assert_eq!(calls, 3);
/// # });
/// ```
///
/// A token cancelled up front stops the run before the first attempt:
///
/// ```rust
/// use headwater::{Retrier, RetryError};
/// use tokio_util::sync::CancellationToken;
///
/// # tokio_test::block_on(async {
/// let token = CancellationToken::new();
/// token.cancel();
///
/// let result = Retrier::default()
///     .execute(&token, || async { Ok::<_, &str>(()) })
///     .await;
///
/// assert_eq!(result, Err(RetryError::Cancelled { attempts: 0 }));
/// # });
/// ```
#[derive(Debug, Clone, Default)]
pub struct Retrier {
    schedule: RetrySchedule,
}

impl Retrier {
    /// Create a retrier over the given schedule.
    pub fn new(schedule: RetrySchedule) -> Self {
        Self { schedule }
    }

    /// The schedule this retrier runs.
    pub fn schedule(&self) -> &RetrySchedule {
        &self.schedule
    }

    /// Run `operation` until it succeeds, the schedule is exhausted, or
    /// `token` fires.
    ///
    /// Returns the operation's success value, [`RetryError::Exhausted`] with
    /// the total attempt count once every slot has been used, or
    /// [`RetryError::Cancelled`] with the attempts completed so far. An empty
    /// schedule exhausts immediately with zero attempts and never invokes the
    /// operation.
    pub async fn execute<Op, Fut, T, E>(
        &self,
        token: &CancellationToken,
        mut operation: Op,
    ) -> Result<T, RetryError>
    where
        Op: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let delays = self.schedule.delays();

        for (attempt, &base) in delays.iter().enumerate() {
            if token.is_cancelled() {
                return Err(RetryError::Cancelled { attempts: attempt });
            }

            if let Ok(value) = operation().await {
                #[cfg(feature = "tracing")]
                tracing::debug!(attempts = attempt + 1, "retry run succeeded");
                return Ok(value);
            }

            let delay = self.schedule.apply_jitter(base);
            #[cfg(feature = "tracing")]
            tracing::debug!(
                attempt = attempt + 1,
                delay_ms = delay.as_millis() as u64,
                "attempt failed, backing off"
            );

            // Cancellation wins over the timer when both are ready.
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    return Err(RetryError::Cancelled { attempts: attempt + 1 });
                }
                _ = tokio::time::sleep(delay) => {}
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(attempts = delays.len(), "retry schedule exhausted");
        Err(RetryError::Exhausted {
            attempts: delays.len(),
        })
    }

    /// Like [`execute`](Self::execute), but hands each attempt a clone of the
    /// run's token so long-running operations can bail out mid-attempt.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use headwater::{Retrier, RetrySchedule};
    /// use std::time::Duration;
    /// use tokio_util::sync::CancellationToken;
    ///
    /// # tokio_test::block_on(async {
    /// let retrier = Retrier::new(RetrySchedule::new([Duration::from_millis(1)]));
    /// let token = CancellationToken::new();
    ///
    /// let result = retrier
    ///     .execute_with_token(&token, |attempt_token| async move {
    ///         if attempt_token.is_cancelled() {
    ///             return Err("shutting down");
    ///         }
    ///         Ok(7)
    ///     })
    ///     .await;
    ///
    /// assert_eq!(result, Ok(7));
    /// # });
    /// ```
    pub async fn execute_with_token<Op, Fut, T, E>(
        &self,
        token: &CancellationToken,
        mut operation: Op,
    ) -> Result<T, RetryError>
    where
        Op: FnMut(CancellationToken) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.execute(token, || operation(token.clone())).await
    }
}
