//! Backoff schedule types and configuration.

use std::time::Duration;

/// The default backoff table: four doubling steps into a one-minute plateau.
const DEFAULT_DELAYS: [Duration; 10] = [
    Duration::from_secs(1),
    Duration::from_secs(2),
    Duration::from_secs(4),
    Duration::from_secs(8),
    Duration::from_secs(16),
    Duration::from_secs(32),
    Duration::from_secs(60),
    Duration::from_secs(60),
    Duration::from_secs(60),
    Duration::from_secs(60),
];

/// An ordered table of base delays driving a retry run.
///
/// Schedules are pure data - they describe how long to wait between attempts
/// but don't execute anything. The schedule also bounds the run: a schedule of
/// length N allows exactly N attempts. Build one, hand it to a
/// [`Retrier`](crate::Retrier), and share the retrier by reference; a schedule
/// is immutable once constructed, so concurrent runs can never observe a
/// half-replaced table.
///
/// Every delay handed to the timer is multiplied by a uniform random factor in
/// `[1 - jitter, 1 + jitter]` (±25% by default) so that many callers sharing
/// one schedule don't wake in lockstep.
///
/// # Examples
///
/// ```rust
/// use headwater::RetrySchedule;
/// use std::time::Duration;
///
/// // The default table: 1, 2, 4, 8, 16, 32, then 60s four times.
/// let schedule = RetrySchedule::default();
/// assert_eq!(schedule.len(), 10);
/// assert_eq!(schedule.base_delay(0), Some(Duration::from_secs(1)));
/// assert_eq!(schedule.base_delay(9), Some(Duration::from_secs(60)));
/// assert_eq!(schedule.base_delay(10), None);
///
/// // A short custom table for a latency-sensitive path.
/// let schedule = RetrySchedule::new([
///     Duration::from_millis(50),
///     Duration::from_millis(100),
///     Duration::from_millis(200),
/// ]);
/// assert_eq!(schedule.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RetrySchedule {
    delays: Vec<Duration>,
    jitter: f64,
}

impl RetrySchedule {
    /// The jitter factor applied when none is configured explicitly: ±25%.
    pub const DEFAULT_JITTER: f64 = 0.25;

    /// Create a schedule from an explicit delay table.
    ///
    /// The table may be empty; an empty schedule permits zero attempts and a
    /// run over it reports exhaustion immediately without invoking the
    /// operation. Jitter starts at [`Self::DEFAULT_JITTER`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use headwater::RetrySchedule;
    /// use std::time::Duration;
    ///
    /// let schedule = RetrySchedule::new(vec![Duration::from_secs(1); 5]);
    /// assert_eq!(schedule.len(), 5);
    /// assert_eq!(schedule.jitter_factor(), RetrySchedule::DEFAULT_JITTER);
    /// ```
    pub fn new(delays: impl Into<Vec<Duration>>) -> Self {
        Self {
            delays: delays.into(),
            jitter: Self::DEFAULT_JITTER,
        }
    }

    /// Set the proportional jitter factor.
    ///
    /// The factor is clamped to `[0.0, 1.0]`. A factor of `0.25` means each
    /// applied delay lands uniformly in `[0.75 * base, 1.25 * base]`; a factor
    /// of `0.0` disables jitter entirely.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use headwater::RetrySchedule;
    /// use std::time::Duration;
    ///
    /// let schedule = RetrySchedule::new([Duration::from_secs(1)]).with_jitter(0.5);
    /// assert_eq!(schedule.jitter_factor(), 0.5);
    ///
    /// // Out-of-range factors are clamped.
    /// let schedule = RetrySchedule::new([Duration::from_secs(1)]).with_jitter(3.0);
    /// assert_eq!(schedule.jitter_factor(), 1.0);
    /// ```
    pub fn with_jitter(mut self, factor: f64) -> Self {
        self.jitter = factor.clamp(0.0, 1.0);
        self
    }

    /// The base delay table, in attempt order.
    pub fn delays(&self) -> &[Duration] {
        &self.delays
    }

    /// The configured jitter factor.
    pub fn jitter_factor(&self) -> f64 {
        self.jitter
    }

    /// Number of attempts this schedule permits.
    pub fn len(&self) -> usize {
        self.delays.len()
    }

    /// Whether the schedule permits no attempts at all.
    pub fn is_empty(&self) -> bool {
        self.delays.is_empty()
    }

    /// The base (un-jittered) delay following attempt N (0-indexed).
    ///
    /// Returns `None` once the table is exhausted.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use headwater::RetrySchedule;
    /// use std::time::Duration;
    ///
    /// let schedule = RetrySchedule::default();
    /// assert_eq!(schedule.base_delay(1), Some(Duration::from_secs(2)));
    /// assert_eq!(schedule.base_delay(5), Some(Duration::from_secs(32)));
    /// assert_eq!(schedule.base_delay(42), None);
    /// ```
    pub fn base_delay(&self, attempt: usize) -> Option<Duration> {
        self.delays.get(attempt).copied()
    }

    /// Scale a base delay by a fresh uniform sample from the jitter range.
    ///
    /// With jitter factor `j`, the result lies in `[base * (1 - j),
    /// base * (1 + j)]`, endpoints included. A zero factor returns the base
    /// unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use headwater::RetrySchedule;
    /// use std::time::Duration;
    ///
    /// let schedule = RetrySchedule::default();
    /// let base = Duration::from_secs(4);
    /// let applied = schedule.apply_jitter(base);
    ///
    /// assert!(applied >= base.mul_f64(0.75));
    /// assert!(applied <= base.mul_f64(1.25));
    /// ```
    pub fn apply_jitter(&self, base: Duration) -> Duration {
        if self.jitter == 0.0 {
            return base;
        }
        use rand::Rng;
        let factor = rand::rng().random_range(1.0 - self.jitter..=1.0 + self.jitter);
        base.mul_f64(factor)
    }
}

/// The source-of-record table: 1, 2, 4, 8, 16, 32, 60, 60, 60, 60 seconds,
/// ±25% jitter.
impl Default for RetrySchedule {
    fn default() -> Self {
        Self::new(DEFAULT_DELAYS)
    }
}
