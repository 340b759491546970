//! A circuit breaker for repeatedly failing operations.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

/// Why a breaker-wrapped call did not return a value.
///
/// # Examples
///
/// ```rust
/// use headwater::BreakerError;
///
/// let rejected: BreakerError<&str> = BreakerError::Open;
/// assert_eq!(rejected.to_string(), "circuit breaker is open");
///
/// let failed = BreakerError::Inner("connection reset");
/// assert_eq!(failed.to_string(), "connection reset");
/// assert_eq!(failed.into_inner(), Some("connection reset"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BreakerError<E> {
    /// The breaker rejected the call without running the operation.
    Open,
    /// The operation ran and failed with its own error.
    Inner(E),
}

impl<E> BreakerError<E> {
    /// True when the call was rejected without running.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }

    /// The operation's own error, when one ran and failed.
    pub fn into_inner(self) -> Option<E> {
        match self {
            Self::Inner(error) => Some(error),
            Self::Open => None,
        }
    }
}

impl<E: fmt::Display> fmt::Display for BreakerError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => f.write_str("circuit breaker is open"),
            Self::Inner(error) => write!(f, "{error}"),
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for BreakerError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Open => None,
            Self::Inner(error) => Some(error),
        }
    }
}

/// Which mode the breaker is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    /// Calls flow through; failures are being counted.
    Closed,
    /// Calls are rejected until the reset timeout elapses.
    Open,
    /// One probe call is in flight; its outcome decides the next state.
    HalfOpen,
}

#[derive(Debug)]
enum Phase {
    Closed,
    Open { since: Instant },
    HalfOpen,
}

#[derive(Debug)]
struct Core {
    consecutive_failures: u32,
    phase: Phase,
}

/// Rejects calls outright after too many consecutive failures.
///
/// The breaker starts closed, passing calls through and counting consecutive
/// failures. Reaching `max_failures` opens it: calls are rejected immediately
/// with [`BreakerError::Open`], giving the failing dependency room to
/// recover. Once `reset_timeout` has elapsed, the next call is admitted as a
/// half-open probe. A successful probe closes the breaker and clears the
/// count; a failed probe reopens it for another full timeout.
///
/// Any success resets the consecutive-failure count, so intermittent
/// failures below the threshold never trip the breaker.
///
/// Clones share the same breaker: hand one to each task guarding the same
/// dependency.
///
/// # Examples
///
/// ```rust
/// use headwater::{BreakerError, CircuitBreaker};
/// use std::time::Duration;
///
/// # tokio_test::block_on(async {
/// let breaker = CircuitBreaker::new(2, Duration::from_secs(30));
///
/// for _ in 0..2 {
///     let _ = breaker
///         .call(|| async { Err::<(), _>("refused") })
///         .await;
/// }
///
/// // Two consecutive failures tripped it; this call never runs.
/// let rejected = breaker.call(|| async { Ok::<_, &str>(()) }).await;
/// assert_eq!(rejected, Err(BreakerError::Open));
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct CircuitBreaker {
    max_failures: u32,
    reset_timeout: Duration,
    core: Arc<Mutex<Core>>,
}

impl CircuitBreaker {
    /// Create a closed breaker that opens after `max_failures` consecutive
    /// failures and admits a probe after `reset_timeout`.
    pub fn new(max_failures: u32, reset_timeout: Duration) -> Self {
        Self {
            max_failures,
            reset_timeout,
            core: Arc::new(Mutex::new(Core {
                consecutive_failures: 0,
                phase: Phase::Closed,
            })),
        }
    }

    /// The consecutive-failure threshold.
    pub fn max_failures(&self) -> u32 {
        self.max_failures
    }

    /// How long an open breaker waits before admitting a probe.
    pub fn reset_timeout(&self) -> Duration {
        self.reset_timeout
    }

    /// The breaker's current mode.
    ///
    /// Transitions happen on calls: an open breaker whose timeout has
    /// elapsed still reports [`BreakerState::Open`] until a call arrives to
    /// become the probe.
    pub fn state(&self) -> BreakerState {
        match self.core.lock().phase {
            Phase::Closed => BreakerState::Closed,
            Phase::Open { .. } => BreakerState::Open,
            Phase::HalfOpen => BreakerState::HalfOpen,
        }
    }

    /// Run `operation` through the breaker.
    ///
    /// Rejected calls return [`BreakerError::Open`] without invoking the
    /// operation at all. The breaker lock is never held while the operation
    /// runs, so slow calls don't block [`state`](Self::state) or other
    /// callers' admission checks.
    pub async fn call<Op, Fut, T, E>(&self, operation: Op) -> Result<T, BreakerError<E>>
    where
        Op: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if !self.admit() {
            return Err(BreakerError::Open);
        }

        match operation().await {
            Ok(value) => {
                self.record_success();
                Ok(value)
            }
            Err(error) => {
                self.record_failure();
                Err(BreakerError::Inner(error))
            }
        }
    }

    fn admit(&self) -> bool {
        let mut core = self.core.lock();
        match core.phase {
            Phase::Closed => true,
            // The probe slot is taken; reject until it resolves.
            Phase::HalfOpen => false,
            Phase::Open { since } => {
                if since.elapsed() >= self.reset_timeout {
                    core.phase = Phase::HalfOpen;
                    true
                } else {
                    false
                }
            }
        }
    }

    fn record_success(&self) {
        let mut core = self.core.lock();
        core.consecutive_failures = 0;
        core.phase = Phase::Closed;
    }

    fn record_failure(&self) {
        let mut core = self.core.lock();
        match core.phase {
            // A failed probe reopens for another full timeout.
            Phase::HalfOpen => {
                core.phase = Phase::Open {
                    since: Instant::now(),
                };
            }
            _ => {
                core.consecutive_failures += 1;
                if core.consecutive_failures >= self.max_failures {
                    core.phase = Phase::Open {
                        since: Instant::now(),
                    };
                }
            }
        }
    }
}
