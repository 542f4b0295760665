pub use crate::builder::{Backing, Distribution, DistributionBuilder};
#[cfg(feature = "concurrency")]
pub use crate::dist::ConcurrentFrequencyDistribution;
pub use crate::dist::{HashFrequencyDistribution, SortedFrequencyDistribution};
pub use crate::ds::TopK;
pub use crate::error::{CountError, InvariantError};
pub use crate::traits::{FrequencyDistribution, Order, OrderedEntries};
