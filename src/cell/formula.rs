//! Derived cells computed from an upstream [`ValueCell`].

use std::fmt;

use super::value::ValueCell;

/// A cell whose value is recomputed from an upstream cell's transitions.
///
/// At construction the formula seeds itself with `combine(initial, initial)`
/// over the upstream's current value. Afterwards, every upstream change runs
/// `combine(old, new)` and stores the result in a private memo cell. The memo
/// is itself equality-gated, so a recomputation that lands on the same result
/// wakes none of the formula's own watchers.
///
/// The upstream registration lives as long as the upstream cell: dropping the
/// `FormulaCell` handle stops nobody from reading its last value through
/// clones, and the upstream keeps feeding the memo either way.
///
/// # Examples
///
/// ```rust
/// use headwater::{FormulaCell, ValueCell};
///
/// let source = ValueCell::new(40);
/// // Track how far each update moved the value.
/// let delta = FormulaCell::new(&source, |old, new| new - old);
/// assert_eq!(delta.get(), 0);
///
/// source.set(52).unwrap();
/// assert_eq!(delta.get(), 12);
///
/// source.set(45).unwrap();
/// assert_eq!(delta.get(), -7);
/// ```
///
/// Deduplication: watchers on the formula fire only when the *derived* value
/// actually changes.
///
/// ```rust
/// use headwater::{FormulaCell, ValueCell};
/// use parking_lot::Mutex;
/// use std::sync::Arc;
///
/// let source = ValueCell::new(10);
/// let capped = FormulaCell::new(&source, |_, new| (*new).min(50));
///
/// let fired = Arc::new(Mutex::new(0));
/// let count = Arc::clone(&fired);
/// capped.watch(move |_, _| *count.lock() += 1);
///
/// source.set(60).unwrap(); // capped: 10 -> 50, watcher fires
/// source.set(70).unwrap(); // capped stays 50, watcher quiet
///
/// assert_eq!(capped.get(), 50);
/// assert_eq!(*fired.lock(), 1);
/// ```
pub struct FormulaCell<T> {
    memo: ValueCell<T>,
}

impl<T> FormulaCell<T> {
    /// Derive a new cell from `upstream` through `combine`.
    ///
    /// `combine` is called once immediately with the upstream's current value
    /// in both positions to seed the formula, then with `(old, new)` on every
    /// upstream change.
    pub fn new<F>(upstream: &ValueCell<T>, mut combine: F) -> Self
    where
        T: Clone + PartialEq + Send + 'static,
        F: FnMut(&T, &T) -> T + Send + 'static,
    {
        let initial = upstream.get();
        let memo = ValueCell::new(combine(&initial, &initial));

        let sink = memo.clone();
        upstream.watch(move |old, new| {
            // Equal results are dropped by the memo's own gate. A rejected
            // reentrant write cannot happen here: any same-thread cycle is
            // already cut off at the upstream cell.
            let _ = sink.set(combine(old, new));
        });

        Self { memo }
    }

    /// A copy of the current derived value.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.memo.get()
    }

    /// Register a watcher on the derived value.
    ///
    /// Fires with `(old, new)` only when a recomputation produces a value
    /// different from the memo's current one.
    pub fn watch<F>(&self, watcher: F)
    where
        F: FnMut(&T, &T) + Send + 'static,
    {
        self.memo.watch(watcher);
    }

    /// Chain a further formula off this one's derived value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use headwater::{FormulaCell, ValueCell};
    ///
    /// let source: ValueCell<i32> = ValueCell::new(10);
    /// let delta = FormulaCell::new(&source, |old, new| new - old);
    /// let magnitude = delta.derive(|_, new| new.abs());
    ///
    /// source.set(4).unwrap();
    /// assert_eq!(delta.get(), -6);
    /// assert_eq!(magnitude.get(), 6);
    /// ```
    pub fn derive<F>(&self, combine: F) -> FormulaCell<T>
    where
        T: Clone + PartialEq + Send + 'static,
        F: FnMut(&T, &T) -> T + Send + 'static,
    {
        FormulaCell::new(&self.memo, combine)
    }
}

/// Clones are handles onto the same derived cell.
impl<T> Clone for FormulaCell<T> {
    fn clone(&self) -> Self {
        Self {
            memo: self.memo.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for FormulaCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormulaCell")
            .field("memo", &self.memo)
            .finish()
    }
}
