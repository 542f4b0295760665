//! Error types for the countkit library.
//!
//! ## Key Components
//!
//! - [`CountError`]: Returned when a mutation of a frequency distribution is
//!   rejected (zero amount, decrement of a missing key, decrement below zero,
//!   or a sum that no longer fits in `u64`). A rejected mutation never
//!   changes the distribution.
//! - [`InvariantError`]: Returned when internal data-structure invariants are
//!   violated (`check_invariants` methods).
//!
//! ## Example Usage
//!
//! ```
//! use countkit::error::CountError;
//! use countkit::dist::HashFrequencyDistribution;
//! use countkit::traits::FrequencyDistribution;
//!
//! let mut fd: HashFrequencyDistribution<&str> = HashFrequencyDistribution::new();
//! fd.increment_by("a", 3).unwrap();
//!
//! // Over-decrement is rejected instead of clamping to zero
//! let err = fd.decrement_by(&"a", 4).unwrap_err();
//! assert_eq!(err, CountError::Underflow { current: 3, requested: 4 });
//! assert_eq!(fd.get(&"a"), 3);
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// CountError
// ---------------------------------------------------------------------------

/// Error returned when a count mutation is rejected.
///
/// Callers wanting a non-failing decrement should check
/// [`get`](crate::traits::FrequencyDistribution::get) first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountError {
    /// Increment or decrement by zero.
    ZeroAmount,
    /// Decrement of a key that holds no count.
    MissingKey,
    /// Decrement by more than the key's current count.
    Underflow {
        /// Count held by the key before the call.
        current: u64,
        /// Amount the caller asked to subtract.
        requested: u64,
    },
    /// A count or the running sum would exceed `u64::MAX`.
    Overflow,
}

impl fmt::Display for CountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountError::ZeroAmount => f.write_str("amount must be greater than zero"),
            CountError::MissingKey => f.write_str("cannot decrement a key with no count"),
            CountError::Underflow { current, requested } => write!(
                f,
                "cannot decrement by {} from a count of {}",
                requested, current
            ),
            CountError::Overflow => f.write_str("count overflows u64"),
        }
    }
}

impl std::error::Error for CountError {}

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal distribution invariants are violated.
///
/// Produced by `check_invariants` on the backings (e.g.
/// [`SortedFrequencyDistribution::check_invariants`](crate::dist::SortedFrequencyDistribution::check_invariants)).
/// Carries a human-readable description of which invariant failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- CountError -------------------------------------------------------

    #[test]
    fn count_display_zero_amount() {
        assert_eq!(
            CountError::ZeroAmount.to_string(),
            "amount must be greater than zero"
        );
    }

    #[test]
    fn count_display_underflow_names_both_values() {
        let err = CountError::Underflow {
            current: 3,
            requested: 4,
        };
        let msg = err.to_string();
        assert!(msg.contains('3'));
        assert!(msg.contains('4'));
    }

    #[test]
    fn count_missing_key_and_underflow_are_distinct() {
        assert_ne!(
            CountError::MissingKey,
            CountError::Underflow {
                current: 0,
                requested: 1
            }
        );
    }

    #[test]
    fn count_implements_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<CountError>();
    }

    // -- InvariantError ---------------------------------------------------

    #[test]
    fn invariant_display_shows_message() {
        let err = InvariantError::new("sum mismatch");
        assert_eq!(err.to_string(), "sum mismatch");
    }

    #[test]
    fn invariant_message_accessor() {
        let err = InvariantError::new("test");
        assert_eq!(err.message(), "test");
    }

    #[test]
    fn invariant_clone_and_eq() {
        let a = InvariantError::new("x");
        let b = a.clone();
        assert_eq!(a, b);
    }

    #[test]
    fn invariant_implements_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<InvariantError>();
    }
}
