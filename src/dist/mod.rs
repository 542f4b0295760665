//! Frequency distribution backings.
//!
//! Both backings implement [`FrequencyDistribution`](crate::traits::FrequencyDistribution)
//! and [`OrderedEntries`](crate::traits::OrderedEntries) and differ only in
//! cost profile:
//!
//! | Backing                         | Mutation   | `top_entries(k)` | Key bounds        |
//! |---------------------------------|------------|------------------|-------------------|
//! | [`HashFrequencyDistribution`]   | O(1) avg   | O(n log k)       | `Eq + Hash`       |
//! | [`SortedFrequencyDistribution`] | O(log n)   | O(log n + k)     | `Ord + Clone`     |
//!
//! Pick one directly, or at runtime through
//! [`DistributionBuilder`](crate::builder::DistributionBuilder).

use crate::error::CountError;

pub mod hashed;
pub mod sorted;

#[cfg(feature = "concurrency")]
pub mod concurrent;

#[cfg(feature = "concurrency")]
pub use concurrent::ConcurrentFrequencyDistribution;
pub use hashed::HashFrequencyDistribution;
pub use sorted::SortedFrequencyDistribution;

/// Logs a rejected mutation and hands the error back.
pub(crate) fn rejected(op: &'static str, err: CountError) -> CountError {
    log::debug!("{} rejected: {}", op, err);
    err
}
