//! Mutex-guarded watchable values.

use std::fmt;
use std::sync::Arc;
use std::thread::{self, ThreadId};

use parking_lot::Mutex;

/// A nested write was rejected because the cell was mid-notification.
///
/// Returned by [`ValueCell::set`] when a watcher, running inside a
/// notification fan-out, tries to write the same cell again from the same
/// thread. Rejecting immediately keeps watcher cycles from deadlocking on the
/// cell's own lock.
///
/// # Examples
///
/// ```rust
/// use headwater::ReentrantSet;
///
/// assert_eq!(
///     ReentrantSet.to_string(),
///     "rejected: cell is currently notifying"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReentrantSet;

impl fmt::Display for ReentrantSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("rejected: cell is currently notifying")
    }
}

impl std::error::Error for ReentrantSet {}

type Watcher<T> = Box<dyn FnMut(&T, &T) + Send>;

struct CellState<T> {
    value: T,
    watchers: Vec<Watcher<T>>,
}

struct CellShared<T> {
    state: Mutex<CellState<T>>,
    // Thread currently running this cell's fan-out, if any.
    notifier: Mutex<Option<ThreadId>>,
}

/// A shared, watchable value with equality-gated writes.
///
/// A `ValueCell` holds one comparable value behind a lock. Writing through
/// [`set`](Self::set) compares against the current value first: equal writes
/// are no-ops that report `Ok(false)` and wake nobody, while a genuine change
/// stores the new value and synchronously invokes every registered watcher,
/// in registration order, with the old and new values. The watcher run
/// happens under the cell's lock, so by the time `set` returns every watcher
/// has observed the transition.
///
/// Cloning a `ValueCell` clones the handle, not the value: all clones read
/// and write the same underlying state, which is how a cell is shared across
/// threads or moved into watcher closures.
///
/// Because watchers run under the lock, a watcher must not call back into
/// [`get`](Self::get) or [`watch`](Self::watch) on the same cell, and a
/// nested [`set`](Self::set) from the notifying thread is rejected with
/// [`ReentrantSet`] rather than left to deadlock. Watchers receive both the
/// old and new values precisely so they don't need to read the cell.
///
/// # Examples
///
/// ```rust
/// use headwater::ValueCell;
///
/// let cell = ValueCell::new(1);
/// assert_eq!(cell.get(), 1);
///
/// assert_eq!(cell.set(5), Ok(true));
/// assert_eq!(cell.set(5), Ok(false)); // equal write, watchers stay quiet
/// assert_eq!(cell.get(), 5);
/// ```
///
/// Watchers see every real transition:
///
/// ```rust
/// use headwater::ValueCell;
/// use parking_lot::Mutex;
/// use std::sync::Arc;
///
/// let cell = ValueCell::new("idle".to_string());
/// let seen = Arc::new(Mutex::new(Vec::new()));
///
/// let log = Arc::clone(&seen);
/// cell.watch(move |old, new| log.lock().push(format!("{old} -> {new}")));
///
/// cell.set("running".to_string()).unwrap();
/// cell.set("running".to_string()).unwrap(); // no change, no entry
/// cell.set("done".to_string()).unwrap();
///
/// assert_eq!(seen.lock().as_slice(), ["idle -> running", "running -> done"]);
/// ```
pub struct ValueCell<T> {
    shared: Arc<CellShared<T>>,
}

impl<T> ValueCell<T> {
    /// Create a cell holding `initial`.
    pub fn new(initial: T) -> Self {
        Self {
            shared: Arc::new(CellShared {
                state: Mutex::new(CellState {
                    value: initial,
                    watchers: Vec::new(),
                }),
                notifier: Mutex::new(None),
            }),
        }
    }

    /// A copy of the current value.
    ///
    /// Must not be called from inside a watcher on the same cell; watchers
    /// are handed the old and new values instead.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.shared.state.lock().value.clone()
    }

    /// Store `value` if it differs from the current value.
    ///
    /// Returns `Ok(true)` when the value changed and every watcher has run,
    /// `Ok(false)` when the write was equal to the current value and nothing
    /// happened. Writers on other threads block until an in-flight fan-out
    /// finishes; a write from *inside* that fan-out (the notifying thread
    /// itself) fails fast with [`ReentrantSet`].
    ///
    /// A panicking watcher propagates to the caller of `set`. The new value
    /// is already stored at that point and the cell remains usable, but later
    /// watchers in the registration order will not have run.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use headwater::{ReentrantSet, ValueCell};
    ///
    /// let cell = ValueCell::new(0);
    ///
    /// let inner = cell.clone();
    /// cell.watch(move |_, _| {
    ///     assert_eq!(inner.set(99), Err(ReentrantSet));
    /// });
    ///
    /// assert_eq!(cell.set(1), Ok(true));
    /// assert_eq!(cell.get(), 1); // the nested write never landed
    /// ```
    pub fn set(&self, value: T) -> Result<bool, ReentrantSet>
    where
        T: PartialEq,
    {
        let me = thread::current().id();
        if *self.shared.notifier.lock() == Some(me) {
            return Err(ReentrantSet);
        }

        let mut state = self.shared.state.lock();
        if state.value == value {
            return Ok(false);
        }
        let old = std::mem::replace(&mut state.value, value);

        *self.shared.notifier.lock() = Some(me);
        // Declared after `state` so it drops first: the notifier mark is
        // cleared while the state lock is still held, even on unwind.
        let _mark = NotifierGuard {
            slot: &self.shared.notifier,
        };

        let CellState { value, watchers } = &mut *state;
        for watcher in watchers.iter_mut() {
            watcher(&old, value);
        }
        Ok(true)
    }

    /// Register a watcher invoked on every change with `(old, new)`.
    ///
    /// Watchers run synchronously inside [`set`](Self::set), in the order
    /// they were registered, and stay registered for the life of the cell.
    /// Must not be called from inside a watcher on the same cell.
    pub fn watch<F>(&self, watcher: F)
    where
        F: FnMut(&T, &T) + Send + 'static,
    {
        self.shared.state.lock().watchers.push(Box::new(watcher));
    }
}

struct NotifierGuard<'a> {
    slot: &'a Mutex<Option<ThreadId>>,
}

impl Drop for NotifierGuard<'_> {
    fn drop(&mut self) {
        *self.slot.lock() = None;
    }
}

/// Clones are handles onto the same underlying cell.
impl<T> Clone for ValueCell<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ValueCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("ValueCell");
        match self.shared.state.try_lock() {
            Some(state) => {
                s.field("value", &state.value);
                s.field("watchers", &state.watchers.len());
            }
            None => {
                s.field("value", &"<locked>");
            }
        }
        s.finish()
    }
}
