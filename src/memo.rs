//! Memoization for fallible keyed computations.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// Caches the successful results of a fallible computation, keyed by input.
///
/// The first call for a key runs the computation; later calls return the
/// cached value. Errors are never cached: a failed key is recomputed on the
/// next call, so transient failures don't poison the cache.
///
/// [`call`](Self::call) reports whether the value came from the cache, which
/// makes hit behavior easy to assert on and cheap to meter.
///
/// # Examples
///
/// ```rust
/// use headwater::Memo;
///
/// let mut lookups = 0;
/// let mut dns = Memo::new(|host: &String| {
///     lookups += 1;
///     if host.is_empty() {
///         Err("empty hostname")
///     } else {
///         Ok(format!("10.0.0.{}", host.len()))
///     }
/// });
///
/// let (addr, hit) = dns.call("db.internal".to_string()).unwrap();
/// assert_eq!(addr, "10.0.0.11");
/// assert!(!hit);
///
/// let (addr, hit) = dns.call("db.internal".to_string()).unwrap();
/// assert_eq!(addr, "10.0.0.11");
/// assert!(hit);
///
/// drop(dns);
/// assert_eq!(lookups, 1);
/// ```
pub struct Memo<K, V, F> {
    compute: F,
    cache: HashMap<K, V>,
}

impl<K, V, F, E> Memo<K, V, F>
where
    K: Eq + Hash,
    V: Clone,
    F: FnMut(&K) -> Result<V, E>,
{
    /// Wrap a computation in a fresh, empty cache.
    pub fn new(compute: F) -> Self {
        Self {
            compute,
            cache: HashMap::new(),
        }
    }

    /// Compute or recall the value for `key`.
    ///
    /// The boolean is `true` when the value was served from the cache. An
    /// `Err` outcome caches nothing.
    pub fn call(&mut self, key: K) -> Result<(V, bool), E> {
        if let Some(value) = self.cache.get(&key) {
            return Ok((value.clone(), true));
        }
        let value = (self.compute)(&key)?;
        self.cache.insert(key, value.clone());
        Ok((value, false))
    }

    /// Whether a successful result for `key` is cached.
    pub fn contains(&self, key: &K) -> bool {
        self.cache.contains_key(key)
    }

    /// Number of cached results.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// True when nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Drop the cached result for `key`, returning it if present.
    pub fn invalidate(&mut self, key: &K) -> Option<V> {
        self.cache.remove(key)
    }
}

// Manual Debug keeps the closure out of the picture.
impl<K, V, F> fmt::Debug for Memo<K, V, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memo")
            .field("cached", &self.cache.len())
            .finish_non_exhaustive()
    }
}
