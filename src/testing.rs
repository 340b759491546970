//! Testing utilities and helpers for headwater.
//!
//! This module provides ergonomic utilities for testing code built on cells
//! and retries: a transition recorder for watcher assertions, a
//! deterministic flaky operation for retry runs, and assertion macros for
//! the write outcomes of [`ValueCell::set`](crate::ValueCell::set).
//!
//! # Examples
//!
//! ## Recording watcher transitions
//!
//! ```rust
//! use headwater::testing::Recorder;
//! use headwater::ValueCell;
//!
//! let cell = ValueCell::new(0);
//! let recorder = Recorder::new();
//! cell.watch(recorder.watcher());
//!
//! cell.set(3).unwrap();
//! cell.set(9).unwrap();
//!
//! assert_eq!(recorder.transitions(), vec![(0, 3), (3, 9)]);
//! ```
//!
//! ## Assertion macros
//!
//! ```rust
//! use headwater::{assert_changed, assert_unchanged, ValueCell};
//!
//! let cell = ValueCell::new("a");
//! assert_changed!(cell.set("b"));
//! assert_unchanged!(cell.set("b"));
//! ```

use std::sync::Arc;

use parking_lot::Mutex;

/// Records every `(old, new)` transition a watcher observes.
///
/// Clone a watcher closure out of the recorder with
/// [`watcher`](Self::watcher) and register it on any cell; the recorder
/// handle then exposes what was seen, in order.
#[derive(Debug)]
pub struct Recorder<T> {
    transitions: Arc<Mutex<Vec<(T, T)>>>,
}

impl<T> Default for Recorder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Recorder<T> {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self {
            transitions: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A watcher closure that logs into this recorder.
    pub fn watcher(&self) -> impl FnMut(&T, &T) + Send + 'static
    where
        T: Clone + Send + 'static,
    {
        let log = Arc::clone(&self.transitions);
        move |old: &T, new: &T| log.lock().push((old.clone(), new.clone()))
    }

    /// Snapshot of the observed transitions, in observation order.
    pub fn transitions(&self) -> Vec<(T, T)>
    where
        T: Clone,
    {
        self.transitions.lock().clone()
    }

    /// Number of transitions observed so far.
    pub fn count(&self) -> usize {
        self.transitions.lock().len()
    }

    /// True when nothing has been observed.
    pub fn is_empty(&self) -> bool {
        self.transitions.lock().is_empty()
    }
}

/// Handles share the same log.
impl<T> Clone for Recorder<T> {
    fn clone(&self) -> Self {
        Self {
            transitions: Arc::clone(&self.transitions),
        }
    }
}

/// An operation that fails a fixed number of times, then succeeds forever.
///
/// Successful attempts return the 1-based call number, which makes "how many
/// attempts did the run take" a direct assertion. Clones share the same
/// counters, so a handle can be moved into a retried closure while the test
/// keeps one for inspection.
///
/// # Examples
///
/// ```rust
/// use headwater::testing::FlakyOp;
///
/// let op = FlakyOp::failing(2);
/// assert!(op.attempt().is_err());
/// assert!(op.attempt().is_err());
/// assert_eq!(op.attempt(), Ok(3));
/// assert_eq!(op.calls(), 3);
/// ```
#[derive(Debug)]
pub struct FlakyOp {
    state: Arc<Mutex<FlakyState>>,
}

#[derive(Debug)]
struct FlakyState {
    remaining_failures: u32,
    calls: u32,
}

impl FlakyOp {
    /// An operation that fails `times` times before its first success.
    pub fn failing(times: u32) -> Self {
        Self {
            state: Arc::new(Mutex::new(FlakyState {
                remaining_failures: times,
                calls: 0,
            })),
        }
    }

    /// Run one attempt.
    pub fn attempt(&self) -> Result<u32, &'static str> {
        let mut state = self.state.lock();
        state.calls += 1;
        if state.remaining_failures > 0 {
            state.remaining_failures -= 1;
            Err("simulated failure")
        } else {
            Ok(state.calls)
        }
    }

    /// Total attempts made so far.
    pub fn calls(&self) -> u32 {
        self.state.lock().calls
    }
}

/// Handles share the same counters.
impl Clone for FlakyOp {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

/// Assert that a cell write changed the value.
///
/// Panics if the write was an equal-value no-op or a reentrancy rejection.
///
/// # Example
///
/// ```rust
/// use headwater::{assert_changed, ValueCell};
///
/// let cell = ValueCell::new(1);
/// assert_changed!(cell.set(2));
/// ```
#[macro_export]
macro_rules! assert_changed {
    ($set:expr) => {
        match $set {
            Ok(true) => {}
            Ok(false) => panic!("Expected a changed write, got an equal-value no-op"),
            Err(e) => panic!("Expected a changed write, got rejection: {}", e),
        }
    };
}

/// Assert that a cell write was an equal-value no-op.
///
/// Panics if the write changed the value or was rejected.
///
/// # Example
///
/// ```rust
/// use headwater::{assert_unchanged, ValueCell};
///
/// let cell = ValueCell::new(1);
/// assert_unchanged!(cell.set(1));
/// ```
#[macro_export]
macro_rules! assert_unchanged {
    ($set:expr) => {
        match $set {
            Ok(false) => {}
            Ok(true) => panic!("Expected a no-op write, but the value changed"),
            Err(e) => panic!("Expected a no-op write, got rejection: {}", e),
        }
    };
}

/// Assert that a cell write was rejected as reentrant.
///
/// Panics if the write went through (changed or not).
///
/// # Example
///
/// ```rust
/// use headwater::{assert_reentrant_rejected, ValueCell};
///
/// let cell = ValueCell::new(0);
/// let inner = cell.clone();
/// cell.watch(move |_, _| {
///     assert_reentrant_rejected!(inner.set(9));
/// });
/// cell.set(1).unwrap();
/// ```
#[macro_export]
macro_rules! assert_reentrant_rejected {
    ($set:expr) => {
        match $set {
            Err($crate::ReentrantSet) => {}
            Ok(changed) => panic!(
                "Expected a reentrancy rejection, got Ok({:?})",
                changed
            ),
        }
    };
}

#[cfg(feature = "proptest")]
use proptest::prelude::*;

#[cfg(feature = "proptest")]
use crate::RetrySchedule;

#[cfg(feature = "proptest")]
impl Arbitrary for RetrySchedule {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        let delays = proptest::collection::vec(1u64..=120_000, 0..=12);
        (delays, 0.0f64..=1.0)
            .prop_map(|(millis, jitter)| {
                let table: Vec<_> = millis
                    .into_iter()
                    .map(std::time::Duration::from_millis)
                    .collect();
                RetrySchedule::new(table).with_jitter(jitter)
            })
            .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ValueCell;

    #[test]
    fn recorder_logs_transitions_in_order() {
        let cell = ValueCell::new(1);
        let recorder = Recorder::new();
        cell.watch(recorder.watcher());

        cell.set(2).unwrap();
        cell.set(2).unwrap();
        cell.set(5).unwrap();

        assert_eq!(recorder.count(), 2);
        assert_eq!(recorder.transitions(), vec![(1, 2), (2, 5)]);
    }

    #[test]
    fn recorder_clones_share_the_log() {
        let recorder: Recorder<i32> = Recorder::new();
        let clone = recorder.clone();

        let cell = ValueCell::new(0);
        cell.watch(recorder.watcher());
        cell.set(1).unwrap();

        assert_eq!(clone.count(), 1);
    }

    #[test]
    fn flaky_op_fails_then_succeeds() {
        let op = FlakyOp::failing(3);

        assert_eq!(op.attempt(), Err("simulated failure"));
        assert_eq!(op.attempt(), Err("simulated failure"));
        assert_eq!(op.attempt(), Err("simulated failure"));
        assert_eq!(op.attempt(), Ok(4));
        assert_eq!(op.attempt(), Ok(5));
        assert_eq!(op.calls(), 5);
    }

    #[test]
    fn flaky_op_with_zero_failures_succeeds_immediately() {
        let op = FlakyOp::failing(0);
        assert_eq!(op.attempt(), Ok(1));
    }

    #[test]
    fn assert_changed_macro() {
        let cell = ValueCell::new(1);
        assert_changed!(cell.set(2));
    }

    #[test]
    fn assert_unchanged_macro() {
        let cell = ValueCell::new(1);
        assert_unchanged!(cell.set(1));
    }

    #[test]
    fn assert_reentrant_rejected_macro() {
        let cell = ValueCell::new(0);
        let inner = cell.clone();
        cell.watch(move |_, _| {
            assert_reentrant_rejected!(inner.set(7));
        });
        cell.set(1).unwrap();
    }

    #[test]
    #[should_panic(expected = "Expected a changed write")]
    fn assert_changed_panics_on_no_op() {
        let cell = ValueCell::new(1);
        assert_changed!(cell.set(1));
    }

    #[test]
    #[should_panic(expected = "Expected a no-op write")]
    fn assert_unchanged_panics_on_change() {
        let cell = ValueCell::new(1);
        assert_unchanged!(cell.set(2));
    }

    #[test]
    #[should_panic(expected = "Expected a reentrancy rejection")]
    fn assert_reentrant_rejected_panics_on_plain_write() {
        let cell = ValueCell::new(1);
        assert_reentrant_rejected!(cell.set(2));
    }

    #[cfg(feature = "proptest")]
    mod proptest_tests {
        use super::*;
        use crate::RetrySchedule;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn any_schedule_keeps_jitter_in_band(schedule in any::<RetrySchedule>()) {
                let j = schedule.jitter_factor();
                for &base in schedule.delays() {
                    let applied = schedule.apply_jitter(base);
                    prop_assert!(applied >= base.mul_f64(1.0 - j));
                    prop_assert!(applied <= base.mul_f64(1.0 + j));
                }
            }
        }
    }
}
