//! Batch helpers over fallible element operations.
//!
//! These wrap the common "apply a fallible function across a batch" shapes so
//! pipelines read as data flow instead of loop plumbing. Two error postures
//! are deliberate:
//!
//! - [`try_map`] and [`try_group_by`] fail fast: the first element error
//!   aborts the batch.
//! - [`try_filter`] is validation-flavored: it inspects every element and
//!   reports *all* predicate failures in one [`MultiError`].

use std::collections::HashMap;
use std::hash::Hash;

use crate::multi_error::MultiError;

/// Map a fallible function over a batch, stopping at the first error.
///
/// # Examples
///
/// ```rust
/// use headwater::functional::try_map;
///
/// let parsed = try_map(["1", "2", "3"], |s| s.parse::<u32>());
/// assert_eq!(parsed.unwrap(), vec![1, 2, 3]);
///
/// let bad = try_map(["1", "x", "3"], |s| s.parse::<u32>());
/// assert!(bad.is_err());
/// ```
pub fn try_map<T, U, E, F>(items: impl IntoIterator<Item = T>, f: F) -> Result<Vec<U>, E>
where
    F: FnMut(T) -> Result<U, E>,
{
    items.into_iter().map(f).collect()
}

/// Keep the elements a fallible predicate accepts, collecting every
/// predicate error.
///
/// Unlike [`try_map`], the whole batch is always inspected: a failing
/// predicate records its error and moves on, and the result is `Err` only
/// after the full pass, with the errors in input order.
///
/// # Examples
///
/// ```rust
/// use headwater::functional::try_filter;
///
/// let kept = try_filter(vec![2, 7, 4], |n| Ok::<_, String>(n % 2 == 0));
/// assert_eq!(kept.unwrap(), vec![2, 4]);
///
/// let outcome = try_filter(vec![1, -3, 5, -8], |n| {
///     if *n < 0 {
///         Err(format!("negative input {n}"))
///     } else {
///         Ok(*n > 2)
///     }
/// });
/// let errors = outcome.unwrap_err();
/// assert_eq!(errors.to_string(), "negative input -3; negative input -8");
/// ```
pub fn try_filter<T, E, F>(
    items: impl IntoIterator<Item = T>,
    mut keep: F,
) -> Result<Vec<T>, MultiError<E>>
where
    F: FnMut(&T) -> Result<bool, E>,
{
    let mut kept = Vec::new();
    let mut errors = MultiError::new();

    for item in items {
        match keep(&item) {
            Ok(true) => kept.push(item),
            Ok(false) => {}
            Err(error) => errors.push(error),
        }
    }

    errors.into_result().map(|()| kept)
}

/// Group a batch by a fallible key function, stopping at the first error.
///
/// Elements within each group keep their input order.
///
/// # Examples
///
/// ```rust
/// use headwater::functional::try_group_by;
///
/// let groups = try_group_by(["alpha", "beta", "avocet"], |s| {
///     s.chars().next().ok_or("empty name")
/// })
/// .unwrap();
///
/// assert_eq!(groups[&'a'], vec!["alpha", "avocet"]);
/// assert_eq!(groups[&'b'], vec!["beta"]);
/// ```
pub fn try_group_by<T, K, E, F>(
    items: impl IntoIterator<Item = T>,
    mut key: F,
) -> Result<HashMap<K, Vec<T>>, E>
where
    K: Eq + Hash,
    F: FnMut(&T) -> Result<K, E>,
{
    let mut groups: HashMap<K, Vec<T>> = HashMap::new();
    for item in items {
        let k = key(&item)?;
        groups.entry(k).or_default().push(item);
    }
    Ok(groups)
}

/// The first element of a batch, if any.
pub fn head<T>(items: &[T]) -> Option<&T> {
    items.first()
}

/// Everything after the first element; empty when the batch has fewer than
/// two elements.
///
/// # Examples
///
/// ```rust
/// use headwater::functional::{head, tail};
///
/// let batch = [10, 20, 30];
/// assert_eq!(head(&batch), Some(&10));
/// assert_eq!(tail(&batch), &[20, 30]);
///
/// let empty: [i32; 0] = [];
/// assert_eq!(head(&empty), None);
/// assert!(tail(&empty).is_empty());
/// ```
pub fn tail<T>(items: &[T]) -> &[T] {
    items.get(1..).unwrap_or(&[])
}
