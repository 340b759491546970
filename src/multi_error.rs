//! An ordered, lossless aggregate of errors.

use std::fmt;

use crate::semigroup::Semigroup;

/// A collection of errors that preserves every error in arrival order.
///
/// Batch operations that keep going past individual failures need somewhere
/// to put all of them. `MultiError` is that container: errors are pushed in
/// the order encountered, nothing is deduplicated or dropped, and the
/// [`Display`](fmt::Display) rendering joins the individual messages with
/// `"; "`.
///
/// [`into_result`](Self::into_result) converts an accumulator into a
/// `Result`, mapping "no errors" to `Ok(())` so call sites read naturally.
///
/// # Examples
///
/// ```rust
/// use headwater::MultiError;
///
/// let mut errors = MultiError::new();
/// assert!(errors.is_empty());
///
/// errors.push("row 2: missing id");
/// errors.push("row 5: bad checksum");
///
/// assert_eq!(errors.len(), 2);
/// assert_eq!(errors.to_string(), "row 2: missing id; row 5: bad checksum");
///
/// match errors.into_result() {
///     Ok(()) => unreachable!(),
///     Err(errors) => assert_eq!(errors.len(), 2),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MultiError<E> {
    errors: Vec<E>,
}

impl<E> MultiError<E> {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Append an error, preserving arrival order.
    pub fn push(&mut self, error: E) {
        self.errors.push(error);
    }

    /// Number of collected errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// True when nothing has been collected.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// The collected errors, in arrival order.
    pub fn errors(&self) -> &[E] {
        &self.errors
    }

    /// Iterate over the collected errors.
    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.errors.iter()
    }

    /// `Ok(())` when empty, otherwise `Err(self)` with every error intact.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use headwater::MultiError;
    ///
    /// let clean: MultiError<&str> = MultiError::new();
    /// assert!(clean.into_result().is_ok());
    /// ```
    pub fn into_result(self) -> Result<(), Self> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Consume the accumulator, yielding the raw error list.
    pub fn into_errors(self) -> Vec<E> {
        self.errors
    }
}

impl<E> From<Vec<E>> for MultiError<E> {
    fn from(errors: Vec<E>) -> Self {
        Self { errors }
    }
}

impl<E> FromIterator<E> for MultiError<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        Self {
            errors: iter.into_iter().collect(),
        }
    }
}

impl<E> Extend<E> for MultiError<E> {
    fn extend<I: IntoIterator<Item = E>>(&mut self, iter: I) {
        self.errors.extend(iter);
    }
}

impl<E> IntoIterator for MultiError<E> {
    type Item = E;
    type IntoIter = std::vec::IntoIter<E>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a, E> IntoIterator for &'a MultiError<E> {
    type Item = &'a E;
    type IntoIter = std::slice::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

/// Combining two aggregates appends the right-hand errors after the left.
impl<E> Semigroup for MultiError<E> {
    fn combine(mut self, other: Self) -> Self {
        self.errors.extend(other.errors);
        self
    }
}

impl<E: fmt::Display> fmt::Display for MultiError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl<E: fmt::Display + fmt::Debug> std::error::Error for MultiError<E> {}
