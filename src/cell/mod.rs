//! Watchable value cells with synchronous, ordered change notification.
//!
//! Two types cooperate here:
//!
//! - [`ValueCell`] holds one comparable value behind a lock. Writes are
//!   equality-gated: setting an equal value is a reported no-op, setting a
//!   different value fans out to every watcher, in registration order, with
//!   the old and new values, before the write returns.
//! - [`FormulaCell`] derives a value from an upstream cell through a combine
//!   function and memoizes the result, so downstream watchers only hear about
//!   *derived* changes.
//!
//! Notification is synchronous and runs under the cell's lock. That gives a
//! strong ordering guarantee (when `set` returns, every watcher has seen the
//! transition) and one rule: watchers must not write back into the cell that
//! is notifying them. Such a write fails fast with [`ReentrantSet`] instead
//! of deadlocking.
//!
//! # Quick Start
//!
//! ```rust
//! use headwater::{FormulaCell, ValueCell};
//!
//! let latency_ms = ValueCell::new(12u64);
//! let smoothed = FormulaCell::new(&latency_ms, |old, new| (old + new) / 2);
//!
//! latency_ms.set(48).unwrap();
//!
//! assert_eq!(latency_ms.get(), 48);
//! assert_eq!(smoothed.get(), 30);
//! ```

mod formula;
mod value;

pub use formula::FormulaCell;
pub use value::{ReentrantSet, ValueCell};

#[cfg(test)]
mod tests;
