//! # Headwater
//!
//! > *"Every river runs from its headwater"*
//!
//! Small resilience and reactivity primitives for Rust services: jittered
//! retries, watchable value cells, and lossless error aggregation.
//!
//! ## Philosophy
//!
//! **Headwater** keeps its core as plain data and its machinery thin:
//! - **Schedules are values**: a retry schedule is an immutable delay table,
//!   shared by reference, never mutated mid-run.
//! - **Effects are explicit**: the [`Retrier`] sleeps and watches a
//!   cancellation token; cells notify synchronously so callers know exactly
//!   when watchers have run.
//! - **Errors are kept, not guessed at**: [`MultiError`] aggregates every
//!   failure in order; retry exhaustion reports exactly how many attempts
//!   ran.
//!
//! ## Quick Example
//!
//! ```rust
//! use headwater::{Retrier, RetrySchedule, ValueCell};
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//!
//! # tokio_test::block_on(async {
//! // Watchable state: equality-gated writes, ordered notification.
//! let health = ValueCell::new("down");
//! health.watch(|old, new| println!("health: {old} -> {new}"));
//!
//! // Schedule-driven retries with jitter and cooperative cancellation.
//! let retrier = Retrier::new(RetrySchedule::new([
//!     Duration::from_millis(1),
//!     Duration::from_millis(2),
//! ]));
//!
//! let mut probes = 0;
//! let result = retrier
//!     .execute(&CancellationToken::new(), || {
//!         probes += 1;
//!         let up = probes >= 2;
//!         async move { if up { Ok(()) } else { Err("no route") } }
//!     })
//!     .await;
//!
//! if result.is_ok() {
//!     health.set("up").unwrap();
//! }
//! assert_eq!(health.get(), "up");
//! # });
//! ```
//!
//! For more examples, see the [demos](https://github.com/iepathos/headwater/tree/master/demos) directory.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod breaker;
pub mod cell;
pub mod functional;
pub mod memo;
pub mod multi_error;
pub mod retry;
pub mod semigroup;
pub mod task;
pub mod testing;

// Re-exports
pub use breaker::{BreakerError, BreakerState, CircuitBreaker};
pub use cell::{FormulaCell, ReentrantSet, ValueCell};
pub use memo::Memo;
pub use multi_error::MultiError;
pub use retry::{Retrier, RetryError, RetrySchedule};
pub use semigroup::Semigroup;
pub use task::{Task, TaskError};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::breaker::{BreakerError, BreakerState, CircuitBreaker};
    pub use crate::cell::{FormulaCell, ReentrantSet, ValueCell};
    pub use crate::memo::Memo;
    pub use crate::multi_error::MultiError;
    pub use crate::retry::{Retrier, RetryError, RetrySchedule};
    pub use crate::semigroup::Semigroup;
    pub use crate::task::{Task, TaskError};
}
