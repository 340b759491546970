//! Schedule-driven retries with jittered backoff and cooperative cancellation.
//!
//! The module splits cleanly into data and machinery:
//!
//! - **Pure core**: [`RetrySchedule`] is just data - an ordered delay table
//!   plus a jitter factor, immutable once built and cheap to clone.
//! - **Imperative shell**: [`Retrier`] drives an async operation through a
//!   schedule, sleeping between attempts and watching a
//!   [`CancellationToken`](tokio_util::sync::CancellationToken).
//!
//! # Quick Start
//!
//! ```rust
//! use headwater::{Retrier, RetrySchedule};
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//!
//! # tokio_test::block_on(async {
//! let retrier = Retrier::new(RetrySchedule::new([
//!     Duration::from_millis(1),
//!     Duration::from_millis(2),
//! ]));
//!
//! let mut calls = 0;
//! let result = retrier
//!     .execute(&CancellationToken::new(), || {
//!         calls += 1;
//!         let ready = calls > 1;
//!         async move { if ready { Ok(calls) } else { Err("warming up") } }
//!     })
//!     .await;
//!
//! assert_eq!(result, Ok(2));
//! # });
//! ```
//!
//! # Semantics
//!
//! - A schedule of length N permits exactly N attempts; the empty schedule
//!   exhausts immediately without invoking the operation.
//! - Each delay is jittered by a uniform factor (±25% by default) so callers
//!   sharing a schedule spread out instead of hammering in lockstep.
//! - Per-attempt errors are swallowed; the terminal [`RetryError`] carries
//!   only the outcome and the attempt count.
//! - Cancellation is checked before every attempt and preempts any backoff
//!   wait, but never interrupts an attempt that is already running.

mod engine;
mod error;
mod schedule;

pub use engine::Retrier;
pub use error::RetryError;
pub use schedule::RetrySchedule;
