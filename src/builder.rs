//! Unified distribution builder for both backings.
//!
//! Lets the caller pick the backing at construction time, based on whether
//! writes or ordered reads dominate, and use one type either way.
//!
//! ## Example
//!
//! ```rust
//! use countkit::builder::{Backing, DistributionBuilder};
//! use countkit::traits::{FrequencyDistribution, Order, OrderedEntries};
//!
//! let mut fd = DistributionBuilder::new().capacity(100).build::<&str>(Backing::Hashed);
//! fd.increment("hello").unwrap();
//! fd.increment("hello").unwrap();
//! fd.increment("world").unwrap();
//! assert_eq!(fd.top_entries(Order::ByCountDescending, 1), vec![(&"hello", 2)]);
//! ```

use std::hash::Hash;

use crate::dist::{HashFrequencyDistribution, SortedFrequencyDistribution, hashed, sorted};
use crate::error::{CountError, InvariantError};
use crate::traits::{FrequencyDistribution, Order, OrderedEntries};

/// Available backings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backing {
    /// Hash map, sorted on demand. Best when writes dominate.
    Hashed,
    /// Key and count order kept continuously. Best when ordered reads dominate.
    Sorted,
}

/// Frequency distribution whose backing is chosen at runtime.
#[derive(Debug, Clone)]
pub struct Distribution<K>
where
    K: Eq + Hash + Ord + Clone,
{
    inner: DistributionInner<K>,
}

#[derive(Debug, Clone)]
enum DistributionInner<K>
where
    K: Eq + Hash + Ord + Clone,
{
    Hashed(HashFrequencyDistribution<K>),
    Sorted(SortedFrequencyDistribution<K>),
}

impl<K> Distribution<K>
where
    K: Eq + Hash + Ord + Clone,
{
    /// Backing selected at construction.
    pub fn backing(&self) -> Backing {
        match &self.inner {
            DistributionInner::Hashed(_) => Backing::Hashed,
            DistributionInner::Sorted(_) => Backing::Sorted,
        }
    }

    /// Lazy iterator over `(key, count)` pairs in backing order.
    pub fn iter(&self) -> Iter<'_, K> {
        match &self.inner {
            DistributionInner::Hashed(fd) => Iter::Hashed(fd.iter()),
            DistributionInner::Sorted(fd) => Iter::Sorted(fd.iter()),
        }
    }

    /// Counts each key once, stopping at the first failure.
    pub fn try_extend<I>(&mut self, iter: I) -> Result<(), CountError>
    where
        I: IntoIterator<Item = K>,
    {
        match &mut self.inner {
            DistributionInner::Hashed(fd) => fd.try_extend(iter),
            DistributionInner::Sorted(fd) => fd.try_extend(iter),
        }
    }

    /// Validates the backing's invariants.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        match &self.inner {
            DistributionInner::Hashed(fd) => fd.check_invariants(),
            DistributionInner::Sorted(fd) => fd.check_invariants(),
        }
    }

    /// Returns an approximate memory footprint in bytes.
    pub fn approx_bytes(&self) -> usize {
        match &self.inner {
            DistributionInner::Hashed(fd) => fd.approx_bytes(),
            DistributionInner::Sorted(fd) => fd.approx_bytes(),
        }
    }
}

impl<K> FrequencyDistribution<K> for Distribution<K>
where
    K: Eq + Hash + Ord + Clone,
{
    fn increment_by(&mut self, key: K, amount: u64) -> Result<u64, CountError> {
        match &mut self.inner {
            DistributionInner::Hashed(fd) => fd.increment_by(key, amount),
            DistributionInner::Sorted(fd) => fd.increment_by(key, amount),
        }
    }

    fn decrement_by(&mut self, key: &K, amount: u64) -> Result<u64, CountError> {
        match &mut self.inner {
            DistributionInner::Hashed(fd) => fd.decrement_by(key, amount),
            DistributionInner::Sorted(fd) => fd.decrement_by(key, amount),
        }
    }

    fn set(&mut self, key: K, count: u64) -> Result<u64, CountError> {
        match &mut self.inner {
            DistributionInner::Hashed(fd) => fd.set(key, count),
            DistributionInner::Sorted(fd) => fd.set(key, count),
        }
    }

    fn remove(&mut self, key: &K) -> Option<u64> {
        match &mut self.inner {
            DistributionInner::Hashed(fd) => fd.remove(key),
            DistributionInner::Sorted(fd) => fd.remove(key),
        }
    }

    fn get(&self, key: &K) -> u64 {
        match &self.inner {
            DistributionInner::Hashed(fd) => fd.get(key),
            DistributionInner::Sorted(fd) => fd.get(key),
        }
    }

    fn contains(&self, key: &K) -> bool {
        match &self.inner {
            DistributionInner::Hashed(fd) => fd.contains(key),
            DistributionInner::Sorted(fd) => fd.contains(key),
        }
    }

    fn number_of_events(&self) -> usize {
        match &self.inner {
            DistributionInner::Hashed(fd) => fd.number_of_events(),
            DistributionInner::Sorted(fd) => fd.number_of_events(),
        }
    }

    fn sum_of_counts(&self) -> u64 {
        match &self.inner {
            DistributionInner::Hashed(fd) => fd.sum_of_counts(),
            DistributionInner::Sorted(fd) => fd.sum_of_counts(),
        }
    }

    fn keys<'a>(&'a self) -> impl Iterator<Item = &'a K>
    where
        K: 'a,
    {
        Distribution::iter(self).map(|(key, _)| key)
    }

    fn iter<'a>(&'a self) -> impl Iterator<Item = (&'a K, u64)>
    where
        K: 'a,
    {
        Distribution::iter(self)
    }

    fn clear(&mut self) {
        match &mut self.inner {
            DistributionInner::Hashed(fd) => fd.clear(),
            DistributionInner::Sorted(fd) => fd.clear(),
        }
    }
}

impl<K> OrderedEntries<K> for Distribution<K>
where
    K: Eq + Hash + Ord + Clone,
{
    fn entries<'a>(&'a self, order: Order) -> Vec<(&'a K, u64)>
    where
        K: 'a,
    {
        match &self.inner {
            DistributionInner::Hashed(fd) => fd.entries(order),
            DistributionInner::Sorted(fd) => fd.entries(order),
        }
    }

    fn top_entries<'a>(&'a self, order: Order, k: usize) -> Vec<(&'a K, u64)>
    where
        K: 'a,
    {
        match &self.inner {
            DistributionInner::Hashed(fd) => fd.top_entries(order, k),
            DistributionInner::Sorted(fd) => fd.top_entries(order, k),
        }
    }
}

/// # Panics
///
/// Panics if the sum of counts would exceed `u64::MAX`; see
/// [`Distribution::try_extend`].
impl<K> Extend<K> for Distribution<K>
where
    K: Eq + Hash + Ord + Clone,
{
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        match &mut self.inner {
            DistributionInner::Hashed(fd) => fd.extend(iter),
            DistributionInner::Sorted(fd) => fd.extend(iter),
        }
    }
}

impl<'a, K> IntoIterator for &'a Distribution<K>
where
    K: Eq + Hash + Ord + Clone,
{
    type Item = (&'a K, u64);
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over `(key, count)` pairs of a [`Distribution`].
#[derive(Debug, Clone)]
pub enum Iter<'a, K> {
    /// Hash-order walk of a [`Backing::Hashed`] distribution.
    Hashed(hashed::Iter<'a, K>),
    /// Ascending-key walk of a [`Backing::Sorted`] distribution.
    Sorted(sorted::Iter<'a, K>),
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = (&'a K, u64);

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Iter::Hashed(iter) => iter.next(),
            Iter::Sorted(iter) => iter.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Iter::Hashed(iter) => iter.size_hint(),
            Iter::Sorted(iter) => iter.size_hint(),
        }
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}

/// Builder for [`Distribution`] instances.
#[derive(Debug, Clone, Default)]
pub struct DistributionBuilder {
    capacity: usize,
}

impl DistributionBuilder {
    /// Create a builder with no pre-allocation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate room for `capacity` events. Ignored by [`Backing::Sorted`].
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Build an empty distribution with the specified backing.
    ///
    /// # Type Parameters
    ///
    /// - `K`: Key type, must be `Eq + Hash + Ord + Clone` so either backing
    ///   can hold it
    ///
    /// # Example
    ///
    /// ```rust
    /// use countkit::builder::{Backing, DistributionBuilder};
    ///
    /// // write-heavy
    /// let counts = DistributionBuilder::new().capacity(1 << 16).build::<u64>(Backing::Hashed);
    ///
    /// // top-k dashboards
    /// let ranking = DistributionBuilder::new().build::<String>(Backing::Sorted);
    /// assert_eq!(ranking.backing(), Backing::Sorted);
    /// ```
    pub fn build<K>(self, backing: Backing) -> Distribution<K>
    where
        K: Eq + Hash + Ord + Clone,
    {
        let inner = match backing {
            Backing::Hashed => {
                DistributionInner::Hashed(HashFrequencyDistribution::with_capacity(self.capacity))
            },
            Backing::Sorted => DistributionInner::Sorted(SortedFrequencyDistribution::new()),
        };

        Distribution { inner }
    }
}
