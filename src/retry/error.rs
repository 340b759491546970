//! Terminal outcomes of a retry run.

use std::fmt;

/// Why a retry run stopped without succeeding.
///
/// Per-attempt failures are deliberately not carried here: the run treats
/// every attempt error as "try again" and reports only how the run as a whole
/// ended. Callers that need the individual errors should collect them inside
/// the operation itself.
///
/// # Examples
///
/// ```rust
/// use headwater::RetryError;
///
/// let err = RetryError::Exhausted { attempts: 10 };
/// assert_eq!(err.to_string(), "failed after 10 attempts");
/// assert!(err.is_exhausted());
///
/// let err = RetryError::Cancelled { attempts: 3 };
/// assert_eq!(err.to_string(), "cancelled after 3 attempts");
/// assert_eq!(err.attempts(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryError {
    /// The cancellation token fired before the run could succeed.
    Cancelled {
        /// Attempts completed before cancellation was observed.
        attempts: usize,
    },
    /// Every scheduled attempt failed.
    Exhausted {
        /// Total attempts made, which equals the schedule length.
        attempts: usize,
    },
}

impl RetryError {
    /// Number of attempts that actually ran before the run stopped.
    pub fn attempts(&self) -> usize {
        match self {
            Self::Cancelled { attempts } | Self::Exhausted { attempts } => *attempts,
        }
    }

    /// True if the run stopped because the token fired.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// True if the run used up its whole schedule.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted { .. })
    }
}

impl fmt::Display for RetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled { attempts } => {
                write!(f, "cancelled after {attempts} attempts")
            }
            Self::Exhausted { attempts } => {
                write!(f, "failed after {attempts} attempts")
            }
        }
    }
}

impl std::error::Error for RetryError {}

#[cfg(test)]
mod error_tests {
    use super::*;

    #[test]
    fn display_matches_outcome() {
        assert_eq!(
            RetryError::Cancelled { attempts: 2 }.to_string(),
            "cancelled after 2 attempts"
        );
        assert_eq!(
            RetryError::Exhausted { attempts: 10 }.to_string(),
            "failed after 10 attempts"
        );
    }

    #[test]
    fn predicates_and_attempts() {
        let cancelled = RetryError::Cancelled { attempts: 0 };
        assert!(cancelled.is_cancelled());
        assert!(!cancelled.is_exhausted());
        assert_eq!(cancelled.attempts(), 0);

        let exhausted = RetryError::Exhausted { attempts: 4 };
        assert!(exhausted.is_exhausted());
        assert!(!exhausted.is_cancelled());
        assert_eq!(exhausted.attempts(), 4);
    }

    #[test]
    fn implements_std_error() {
        fn takes_error(_: &dyn std::error::Error) {}
        takes_error(&RetryError::Exhausted { attempts: 1 });
    }
}
