//! Hash-backed frequency distribution.
//!
//! ## Architecture
//! - Counts live in an `FxHashMap<K, u64>`; a running `sum` is updated on
//!   every mutation, so both aggregates are O(1).
//! - Zero counts are never stored: a decrement or `set` that reaches zero
//!   removes the key.
//! - Ordering is computed on demand. Full retrieval sorts; bounded retrieval
//!   uses [`TopK`] selection when `k` is smaller than the number of events.
//!
//! ## Core Operations
//! - `increment_by` / `decrement_by` / `set` / `remove`: O(1) average.
//! - `entries`: O(n log n).
//! - `top_entries`: O(n log k).
//! - `most_common`: O(n + k log k), needs only `K: Eq + Hash`.
//!
//! ## When to Use
//! - Writes dominate and ordered reads are occasional.
//! - Keys are hashable but may not be ordered (`most_common`, `iter`).
//!
//! ## Example Usage
//! ```rust
//! use countkit::dist::HashFrequencyDistribution;
//! use countkit::traits::{FrequencyDistribution, Order, OrderedEntries};
//!
//! let mut fd: HashFrequencyDistribution<&str> = "abracadabra"
//!     .split("")
//!     .filter(|s| !s.is_empty())
//!     .collect();
//!
//! assert_eq!(fd.get(&"a"), 5);
//! assert_eq!(fd.top_entries(Order::ByCountDescending, 2), vec![(&"a", 5), (&"b", 2)]);
//!
//! fd.decrement_by(&"a", 5).unwrap();
//! assert!(!fd.contains(&"a"));
//! ```
//!
//! ## Thread Safety
//! - `HashFrequencyDistribution` is single-threaded; see
//!   `ConcurrentFrequencyDistribution` (feature `concurrency`) for a locked
//!   variant.

use std::collections::hash_map;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::dist::rejected;
use crate::ds::TopK;
use crate::error::{CountError, InvariantError};
use crate::traits::{FrequencyDistribution, Order, OrderedEntries};

/// Frequency distribution over an `FxHashMap`, sorted on demand.
#[derive(Debug, Clone)]
pub struct HashFrequencyDistribution<K> {
    counts: FxHashMap<K, u64>,
    sum: u64,
}

impl<K> HashFrequencyDistribution<K>
where
    K: Eq + Hash,
{
    /// Creates an empty distribution.
    pub fn new() -> Self {
        Self {
            counts: FxHashMap::default(),
            sum: 0,
        }
    }

    /// Creates an empty distribution with room for `capacity` events.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            counts: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            sum: 0,
        }
    }

    /// Reserves room for at least `additional` more events.
    pub fn reserve(&mut self, additional: usize) {
        self.counts.reserve(additional);
    }

    /// Shrinks the backing map to fit the current events.
    pub fn shrink_to_fit(&mut self) {
        self.counts.shrink_to_fit();
    }

    /// Number of events the map holds without reallocating.
    pub fn capacity(&self) -> usize {
        self.counts.capacity()
    }

    /// Lazy iterator over `(key, count)` pairs in hash order.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            inner: self.counts.iter(),
        }
    }

    /// Lazy iterator over the current keys.
    pub fn keys(&self) -> hash_map::Keys<'_, K, u64> {
        self.counts.keys()
    }

    /// The `k` largest counts, largest first.
    ///
    /// Needs only `K: Eq + Hash`; entries with equal counts come out in
    /// unspecified order. Use
    /// [`top_entries`](OrderedEntries::top_entries) for a deterministic
    /// tie-break.
    ///
    /// # Example
    ///
    /// ```
    /// use countkit::dist::HashFrequencyDistribution;
    /// use countkit::traits::FrequencyDistribution;
    ///
    /// let mut fd = HashFrequencyDistribution::new();
    /// fd.set(1, 10).unwrap();
    /// fd.set(2, 30).unwrap();
    /// fd.set(3, 20).unwrap();
    ///
    /// assert_eq!(fd.most_common(2), vec![(&2, 30), (&3, 20)]);
    /// ```
    pub fn most_common(&self, k: usize) -> Vec<(&K, u64)> {
        let mut entries: Vec<(&K, u64)> = self.iter().collect();
        if k < entries.len() {
            entries.select_nth_unstable_by(k, |a, b| b.1.cmp(&a.1));
            entries.truncate(k);
        }
        entries.sort_unstable_by(|a, b| b.1.cmp(&a.1));
        entries
    }

    /// Counts each key once, stopping at the first failure.
    ///
    /// Keys before the failing one stay counted; the failing key and the
    /// rest of `iter` are not consumed into the distribution.
    pub fn try_extend<I>(&mut self, iter: I) -> Result<(), CountError>
    where
        I: IntoIterator<Item = K>,
    {
        for key in iter {
            self.increment(key)?;
        }
        Ok(())
    }

    /// Returns an approximate memory footprint in bytes.
    pub fn approx_bytes(&self) -> usize {
        std::mem::size_of::<Self>() + self.counts.capacity() * std::mem::size_of::<(K, u64)>()
    }

    /// Validates the stored sum and zero-freedom.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let mut total: u64 = 0;
        for &count in self.counts.values() {
            if count == 0 {
                return Err(InvariantError::new("zero count stored"));
            }
            total = total
                .checked_add(count)
                .ok_or_else(|| InvariantError::new("stored counts overflow u64"))?;
        }
        if total != self.sum {
            return Err(InvariantError::new(format!(
                "sum {} != stored counts total {}",
                self.sum, total
            )));
        }
        Ok(())
    }
}

impl<K> Default for HashFrequencyDistribution<K>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> FrequencyDistribution<K> for HashFrequencyDistribution<K>
where
    K: Eq + Hash,
{
    fn increment_by(&mut self, key: K, amount: u64) -> Result<u64, CountError> {
        if amount == 0 {
            return Err(rejected("increment", CountError::ZeroAmount));
        }
        // Every count is bounded by the sum, so checking the sum suffices.
        let sum = self
            .sum
            .checked_add(amount)
            .ok_or_else(|| rejected("increment", CountError::Overflow))?;
        let count = self.counts.entry(key).or_insert(0);
        *count += amount;
        self.sum = sum;
        Ok(*count)
    }

    fn decrement_by(&mut self, key: &K, amount: u64) -> Result<u64, CountError> {
        if amount == 0 {
            return Err(rejected("decrement", CountError::ZeroAmount));
        }
        let Some(count) = self.counts.get_mut(key) else {
            return Err(rejected("decrement", CountError::MissingKey));
        };
        if amount > *count {
            return Err(rejected(
                "decrement",
                CountError::Underflow {
                    current: *count,
                    requested: amount,
                },
            ));
        }
        *count -= amount;
        let remaining = *count;
        self.sum -= amount;
        if remaining == 0 {
            self.counts.remove(key);
        }
        Ok(remaining)
    }

    fn set(&mut self, key: K, count: u64) -> Result<u64, CountError> {
        let previous = self.counts.get(&key).copied().unwrap_or(0);
        let sum = (self.sum - previous)
            .checked_add(count)
            .ok_or_else(|| rejected("set", CountError::Overflow))?;
        if count == 0 {
            self.counts.remove(&key);
        } else {
            self.counts.insert(key, count);
        }
        self.sum = sum;
        Ok(previous)
    }

    fn remove(&mut self, key: &K) -> Option<u64> {
        let count = self.counts.remove(key)?;
        self.sum -= count;
        Some(count)
    }

    fn get(&self, key: &K) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    fn contains(&self, key: &K) -> bool {
        self.counts.contains_key(key)
    }

    fn number_of_events(&self) -> usize {
        self.counts.len()
    }

    fn sum_of_counts(&self) -> u64 {
        self.sum
    }

    fn keys<'a>(&'a self) -> impl Iterator<Item = &'a K>
    where
        K: 'a,
    {
        self.counts.keys()
    }

    fn iter<'a>(&'a self) -> impl Iterator<Item = (&'a K, u64)>
    where
        K: 'a,
    {
        HashFrequencyDistribution::iter(self)
    }

    fn clear(&mut self) {
        log::debug!("clearing {} events (sum {})", self.counts.len(), self.sum);
        self.counts.clear();
        self.sum = 0;
    }
}

impl<K> OrderedEntries<K> for HashFrequencyDistribution<K>
where
    K: Eq + Hash + Ord,
{
    fn entries<'a>(&'a self, order: Order) -> Vec<(&'a K, u64)>
    where
        K: 'a,
    {
        let mut entries: Vec<(&K, u64)> = HashFrequencyDistribution::iter(self).collect();
        entries.sort_unstable_by(|a, b| order.compare(*a, *b));
        entries
    }

    fn top_entries<'a>(&'a self, order: Order, k: usize) -> Vec<(&'a K, u64)>
    where
        K: 'a,
    {
        if k >= self.counts.len() {
            log::trace!(
                "top_entries: k={} covers all {} events, sorting fully",
                k,
                self.counts.len()
            );
            return self.entries(order);
        }
        log::trace!(
            "top_entries: selecting {} of {} events",
            k,
            self.counts.len()
        );
        let mut top = TopK::new(order, k);
        top.extend(HashFrequencyDistribution::iter(self));
        top.into_sorted_vec()
    }
}

impl<K> PartialEq for HashFrequencyDistribution<K>
where
    K: Eq + Hash,
{
    fn eq(&self, other: &Self) -> bool {
        self.sum == other.sum && self.counts == other.counts
    }
}

impl<K> Eq for HashFrequencyDistribution<K> where K: Eq + Hash {}

/// # Panics
///
/// Panics if the sum of counts would exceed `u64::MAX`. Keys counted before
/// the overflowing one stay counted. Use
/// [`try_extend`](HashFrequencyDistribution::try_extend) to handle the overflow instead.
impl<K> Extend<K> for HashFrequencyDistribution<K>
where
    K: Eq + Hash,
{
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        if let Err(err) = self.try_extend(iter) {
            panic!("HashFrequencyDistribution::extend: {}", err);
        }
    }
}

impl<K> FromIterator<K> for HashFrequencyDistribution<K>
where
    K: Eq + Hash,
{
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut fd = Self::new();
        fd.extend(iter);
        fd
    }
}

impl<'a, K> IntoIterator for &'a HashFrequencyDistribution<K>
where
    K: Eq + Hash,
{
    type Item = (&'a K, u64);
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over `(key, count)` pairs of a [`HashFrequencyDistribution`].
#[derive(Debug, Clone)]
pub struct Iter<'a, K> {
    inner: hash_map::Iter<'a, K, u64>,
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = (&'a K, u64);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, &count)| (key, count))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap;

    proptest! {
        /// Property: aggregates track a plain model map after any valid ops
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_aggregates_match_model(
            ops in prop::collection::vec((0u8..4, 0u8..16, 0u64..8), 0..200)
        ) {
            let mut fd: HashFrequencyDistribution<u8> = HashFrequencyDistribution::new();
            let mut model: HashMap<u8, u64> = HashMap::new();

            for (op, key, amount) in ops {
                match op {
                    0 => {
                        let result = fd.increment_by(key, amount);
                        if amount == 0 {
                            prop_assert_eq!(result, Err(CountError::ZeroAmount));
                        } else {
                            *model.entry(key).or_insert(0) += amount;
                        }
                    }
                    1 => {
                        let current = model.get(&key).copied().unwrap_or(0);
                        let result = fd.decrement_by(&key, amount);
                        if amount == 0 || current == 0 || amount > current {
                            prop_assert!(result.is_err());
                        } else {
                            let left = current - amount;
                            prop_assert_eq!(result, Ok(left));
                            if left == 0 {
                                model.remove(&key);
                            } else {
                                model.insert(key, left);
                            }
                        }
                    }
                    2 => {
                        fd.set(key, amount).unwrap();
                        if amount == 0 {
                            model.remove(&key);
                        } else {
                            model.insert(key, amount);
                        }
                    }
                    3 => {
                        prop_assert_eq!(fd.remove(&key), model.remove(&key));
                    }
                    _ => unreachable!(),
                }

                prop_assert_eq!(fd.number_of_events(), model.len());
                prop_assert_eq!(fd.sum_of_counts(), model.values().sum::<u64>());
                prop_assert!(fd.check_invariants().is_ok());
            }
        }
    }
}
