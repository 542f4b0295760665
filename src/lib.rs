//! countkit: frequency distributions over arbitrary events.
//!
//! Counts how often each distinct event occurs, keeps the running total, and
//! answers relative-frequency and ordered top-k queries.

pub mod builder;
pub mod dist;
pub mod ds;
pub mod error;
pub mod prelude;
pub mod traits;

pub use builder::{Backing, Distribution, DistributionBuilder};
#[cfg(feature = "concurrency")]
pub use dist::ConcurrentFrequencyDistribution;
pub use dist::{HashFrequencyDistribution, SortedFrequencyDistribution};
pub use error::{CountError, InvariantError};
pub use traits::{FrequencyDistribution, Order, OrderedEntries};
