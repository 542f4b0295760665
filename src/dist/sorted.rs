//! Frequency distribution that keeps key order and count order continuously.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                SortedFrequencyDistribution<K> Layout                 │
//! │                                                                      │
//! │  counts: BTreeMap<K, u64>      by_count: BTreeMap<u64, BTreeSet<K>>  │
//! │  (key order, authoritative)    (count buckets, never empty)          │
//! │                                                                      │
//! │   ┌──────┬───────┐                  ┌───────┬──────────────────┐     │
//! │   │ key  │ count │                  │ count │ keys (ascending) │     │
//! │   ├──────┼───────┤                  ├───────┼──────────────────┤     │
//! │   │ "a"  │   5   │                  │   1   │ {"f"}            │     │
//! │   │ "b"  │   5   │                  │   2   │ {"d", "e"}       │     │
//! │   │ "d"  │   2   │                  │   5   │ {"a", "b"}       │     │
//! │   │ "e"  │   2   │                  └───────┴──────────────────┘     │
//! │   │ "f"  │   1   │                                                   │
//! │   └──────┴───────┘                  sum: 15                          │
//! └──────────────────────────────────────────────────────────────────────┘
//!
//! Increment Flow
//! ──────────────
//!   increment_by("d", 3):
//!     1. counts["d"]: 2 → 5
//!     2. take "d" out of bucket 2  (bucket stays, still holds "e")
//!     3. insert "d" into bucket 5  → {"a", "b", "d"}
//!
//! Ordered Walks
//! ─────────────
//!   ByKeyAscending      counts in order
//!   ByKeyDescending     counts reversed
//!   ByCountAscending    buckets in order,    keys ascending inside
//!   ByCountDescending   buckets reversed,    keys ascending inside
//! ```
//!
//! Every order is a lazy walk, so `top_entries(order, k)` costs
//! O(log n + k) and never sorts.
//!
//! ## Operations
//!
//! | Operation        | Complexity   |
//! |------------------|--------------|
//! | `increment_by`   | O(log n)     |
//! | `decrement_by`   | O(log n)     |
//! | `set` / `remove` | O(log n)     |
//! | `get`            | O(log n)     |
//! | `entries`        | O(n)         |
//! | `top_entries`    | O(log n + k) |
//!
//! ## When to Use
//!
//! - Ordered or top-k reads are frequent relative to writes.
//! - Keys are cheap to clone (each key is stored twice).
//!
//! ## Example Usage
//!
//! ```
//! use countkit::dist::SortedFrequencyDistribution;
//! use countkit::traits::{FrequencyDistribution, Order, OrderedEntries};
//!
//! let mut fd = SortedFrequencyDistribution::new();
//! fd.set("a", 5).unwrap();
//! fd.set("d", 2).unwrap();
//! fd.set("b", 5).unwrap();
//!
//! let top: Vec<_> = fd.ordered(Order::ByCountDescending).take(2).collect();
//! assert_eq!(top, vec![(&"a", 5), (&"b", 5)]);
//! assert_eq!(fd.entries(Order::ByKeyDescending)[0], (&"d", 2));
//! ```
//!
//! ## Thread Safety
//!
//! `SortedFrequencyDistribution` is not thread-safe. Wrap in a mutex for
//! concurrent access.

use std::collections::{BTreeMap, BTreeSet, btree_map, btree_set};
use std::iter::Rev;

use crate::dist::rejected;
use crate::error::{CountError, InvariantError};
use crate::traits::{FrequencyDistribution, Order, OrderedEntries};

/// Frequency distribution with continuously maintained key and count order.
#[derive(Debug, Clone)]
pub struct SortedFrequencyDistribution<K> {
    counts: BTreeMap<K, u64>,
    by_count: BTreeMap<u64, BTreeSet<K>>,
    sum: u64,
}

impl<K> SortedFrequencyDistribution<K>
where
    K: Ord + Clone,
{
    /// Creates an empty distribution.
    pub fn new() -> Self {
        Self {
            counts: BTreeMap::new(),
            by_count: BTreeMap::new(),
            sum: 0,
        }
    }

    /// Lazy iterator over `(key, count)` pairs in ascending key order.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            inner: self.counts.iter(),
        }
    }

    /// Lazy iterator over the current keys, ascending.
    pub fn keys(&self) -> btree_map::Keys<'_, K, u64> {
        self.counts.keys()
    }

    /// Lazy walk over all entries in `order`.
    ///
    /// # Example
    ///
    /// ```
    /// use countkit::dist::SortedFrequencyDistribution;
    /// use countkit::traits::{FrequencyDistribution, Order};
    ///
    /// let fd: SortedFrequencyDistribution<char> = "mississippi".chars().collect();
    ///
    /// let by_count: Vec<_> = fd.ordered(Order::ByCountAscending).collect();
    /// assert_eq!(by_count, vec![(&'m', 1), (&'p', 2), (&'i', 4), (&'s', 4)]);
    /// ```
    pub fn ordered(&self, order: Order) -> Ordered<'_, K> {
        let walk = match order {
            Order::ByKeyAscending => Walk::KeyAscending(self.counts.iter()),
            Order::ByKeyDescending => Walk::KeyDescending(self.counts.iter().rev()),
            Order::ByCountAscending => Walk::CountAscending(BucketWalk::new(self.by_count.iter())),
            Order::ByCountDescending => {
                Walk::CountDescending(BucketWalk::new(self.by_count.iter().rev()))
            },
        };
        Ordered {
            walk,
            remaining: self.counts.len(),
        }
    }

    /// Smallest stored count, if any.
    pub fn min_count(&self) -> Option<u64> {
        self.by_count.keys().next().copied()
    }

    /// Largest stored count, if any.
    pub fn max_count(&self) -> Option<u64> {
        self.by_count.keys().next_back().copied()
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
    ///
    /// B-tree node overhead is not included.
    pub fn approx_bytes(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.counts.len() * std::mem::size_of::<(K, u64)>()
            + self.counts.len() * std::mem::size_of::<K>()
            + self.by_count.len() * std::mem::size_of::<(u64, BTreeSet<K>)>()
    }

    /// Validates the stored sum, zero-freedom and count index consistency.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let mut total: u64 = 0;
        for (key, &count) in &self.counts {
            if count == 0 {
                return Err(InvariantError::new("zero count stored"));
            }
            total = total
                .checked_add(count)
                .ok_or_else(|| InvariantError::new("stored counts overflow u64"))?;
            let indexed = self
                .by_count
                .get(&count)
                .is_some_and(|bucket| bucket.contains(key));
            if !indexed {
                return Err(InvariantError::new(format!(
                    "key with count {} missing from its count bucket",
                    count
                )));
            }
        }
        if total != self.sum {
            return Err(InvariantError::new(format!(
                "sum {} != stored counts total {}",
                self.sum, total
            )));
        }

        let mut indexed_keys = 0usize;
        for (&count, bucket) in &self.by_count {
            if bucket.is_empty() {
                return Err(InvariantError::new(format!(
                    "empty bucket for count {}",
                    count
                )));
            }
            indexed_keys += bucket.len();
        }
        if indexed_keys != self.counts.len() {
            return Err(InvariantError::new(format!(
                "count index holds {} keys, map holds {}",
                indexed_keys,
                self.counts.len()
            )));
        }
        Ok(())
    }

    /// Takes `key` out of the bucket for `count`, dropping the bucket if it
    /// empties. Returns the key owned by the bucket.
    fn unlink(&mut self, key: &K, count: u64) -> Option<K> {
        let bucket = self.by_count.get_mut(&count)?;
        let owned = bucket.take(key);
        if bucket.is_empty() {
            self.by_count.remove(&count);
        }
        owned
    }

    fn link(&mut self, key: K, count: u64) {
        self.by_count.entry(count).or_default().insert(key);
    }

    /// Moves `key` between buckets, reusing the bucket's copy of the key.
    fn relink(&mut self, key: &K, from: u64, to: u64) {
        let owned = self.unlink(key, from).unwrap_or_else(|| key.clone());
        self.link(owned, to);
    }
}

impl<K> Default for SortedFrequencyDistribution<K>
where
    K: Ord + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> FrequencyDistribution<K> for SortedFrequencyDistribution<K>
where
    K: Ord + Clone,
{
    fn increment_by(&mut self, key: K, amount: u64) -> Result<u64, CountError> {
        if amount == 0 {
            return Err(rejected("increment", CountError::ZeroAmount));
        }
        let sum = self
            .sum
            .checked_add(amount)
            .ok_or_else(|| rejected("increment", CountError::Overflow))?;
        self.sum = sum;
        match self.counts.get_mut(&key) {
            Some(count) => {
                let previous = *count;
                *count += amount;
                let updated = *count;
                self.relink(&key, previous, updated);
                Ok(updated)
            },
            None => {
                self.counts.insert(key.clone(), amount);
                self.link(key, amount);
                Ok(amount)
            },
        }
    }

    fn decrement_by(&mut self, key: &K, amount: u64) -> Result<u64, CountError> {
        if amount == 0 {
            return Err(rejected("decrement", CountError::ZeroAmount));
        }
        let Some(count) = self.counts.get_mut(key) else {
            return Err(rejected("decrement", CountError::MissingKey));
        };
        let previous = *count;
        if amount > previous {
            return Err(rejected(
                "decrement",
                CountError::Underflow {
                    current: previous,
                    requested: amount,
                },
            ));
        }
        let remaining = previous - amount;
        *count = remaining;
        self.sum -= amount;
        if remaining == 0 {
            self.counts.remove(key);
            self.unlink(key, previous);
        } else {
            self.relink(key, previous, remaining);
        }
        Ok(remaining)
    }

    fn set(&mut self, key: K, count: u64) -> Result<u64, CountError> {
        let previous = self.counts.get(&key).copied().unwrap_or(0);
        let sum = (self.sum - previous)
            .checked_add(count)
            .ok_or_else(|| rejected("set", CountError::Overflow))?;
        self.sum = sum;
        match (previous, count) {
            (0, 0) => {},
            (0, _) => {
                self.counts.insert(key.clone(), count);
                self.link(key, count);
            },
            (_, 0) => {
                self.counts.remove(&key);
                self.unlink(&key, previous);
            },
            _ if previous == count => {},
            _ => {
                if let Some(slot) = self.counts.get_mut(&key) {
                    *slot = count;
                }
                self.relink(&key, previous, count);
            },
        }
        Ok(previous)
    }

    fn remove(&mut self, key: &K) -> Option<u64> {
        let count = self.counts.remove(key)?;
        self.unlink(key, count);
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
        SortedFrequencyDistribution::iter(self)
    }

    fn clear(&mut self) {
        log::debug!("clearing {} events (sum {})", self.counts.len(), self.sum);
        self.counts.clear();
        self.by_count.clear();
        self.sum = 0;
    }
}

impl<K> OrderedEntries<K> for SortedFrequencyDistribution<K>
where
    K: Ord + Clone,
{
    fn entries<'a>(&'a self, order: Order) -> Vec<(&'a K, u64)>
    where
        K: 'a,
    {
        self.ordered(order).collect()
    }

    fn top_entries<'a>(&'a self, order: Order, k: usize) -> Vec<(&'a K, u64)>
    where
        K: 'a,
    {
        self.ordered(order).take(k).collect()
    }
}

impl<K> PartialEq for SortedFrequencyDistribution<K>
where
    K: Ord,
{
    fn eq(&self, other: &Self) -> bool {
        self.sum == other.sum && self.counts == other.counts
    }
}

impl<K> Eq for SortedFrequencyDistribution<K> where K: Ord {}

/// # Panics
///
/// Panics if the sum of counts would exceed `u64::MAX`. Keys counted before
/// the overflowing one stay counted. Use
/// [`try_extend`](SortedFrequencyDistribution::try_extend) to handle the overflow instead.
impl<K> Extend<K> for SortedFrequencyDistribution<K>
where
    K: Ord + Clone,
{
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        if let Err(err) = self.try_extend(iter) {
            panic!("SortedFrequencyDistribution::extend: {}", err);
        }
    }
}

impl<K> FromIterator<K> for SortedFrequencyDistribution<K>
where
    K: Ord + Clone,
{
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut fd = Self::new();
        fd.extend(iter);
        fd
    }
}

impl<'a, K> IntoIterator for &'a SortedFrequencyDistribution<K>
where
    K: Ord + Clone,
{
    type Item = (&'a K, u64);
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over `(key, count)` pairs of a [`SortedFrequencyDistribution`],
/// ascending by key.
#[derive(Debug, Clone)]
pub struct Iter<'a, K> {
    inner: btree_map::Iter<'a, K, u64>,
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

/// Lazy ordered walk returned by
/// [`SortedFrequencyDistribution::ordered`].
#[derive(Debug, Clone)]
pub struct Ordered<'a, K> {
    walk: Walk<'a, K>,
    remaining: usize,
}

#[derive(Debug, Clone)]
enum Walk<'a, K> {
    KeyAscending(btree_map::Iter<'a, K, u64>),
    KeyDescending(Rev<btree_map::Iter<'a, K, u64>>),
    CountAscending(BucketWalk<'a, K, btree_map::Iter<'a, u64, BTreeSet<K>>>),
    CountDescending(BucketWalk<'a, K, Rev<btree_map::Iter<'a, u64, BTreeSet<K>>>>),
}

/// Flattens count buckets into `(key, count)` pairs, keys ascending within
/// each bucket.
#[derive(Debug, Clone)]
struct BucketWalk<'a, K, B> {
    buckets: B,
    current: Option<(u64, btree_set::Iter<'a, K>)>,
}

impl<'a, K, B> BucketWalk<'a, K, B>
where
    B: Iterator<Item = (&'a u64, &'a BTreeSet<K>)>,
    K: 'a,
{
    fn new(buckets: B) -> Self {
        Self {
            buckets,
            current: None,
        }
    }
}

impl<'a, K, B> Iterator for BucketWalk<'a, K, B>
where
    B: Iterator<Item = (&'a u64, &'a BTreeSet<K>)>,
    K: 'a,
{
    type Item = (&'a K, u64);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((count, keys)) = &mut self.current {
                if let Some(key) = keys.next() {
                    return Some((key, *count));
                }
            }
            let (&count, keys) = self.buckets.next()?;
            self.current = Some((count, keys.iter()));
        }
    }
}

impl<'a, K> Iterator for Ordered<'a, K> {
    type Item = (&'a K, u64);

    fn next(&mut self) -> Option<Self::Item> {
        let item = match &mut self.walk {
            Walk::KeyAscending(iter) => iter.next().map(|(key, &count)| (key, count)),
            Walk::KeyDescending(iter) => iter.next().map(|(key, &count)| (key, count)),
            Walk::CountAscending(walk) => walk.next(),
            Walk::CountDescending(walk) => walk.next(),
        };
        if item.is_some() {
            self.remaining -= 1;
        }
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for Ordered<'_, K> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn tie_fixture() -> SortedFrequencyDistribution<&'static str> {
        let mut fd = SortedFrequencyDistribution::new();
        for (key, count) in [("a", 5), ("d", 2), ("b", 5), ("e", 2), ("f", 1), ("c", 5)] {
            fd.set(key, count).unwrap();
        }
        fd
    }

    #[test]
    fn buckets_follow_increments() {
        let mut fd = SortedFrequencyDistribution::new();
        fd.increment("x").unwrap();
        fd.increment("y").unwrap();
        fd.increment("x").unwrap();
        assert_eq!(fd.min_count(), Some(1));
        assert_eq!(fd.max_count(), Some(2));
        fd.check_invariants().unwrap();

        fd.increment_by("y", 4).unwrap();
        assert_eq!(fd.min_count(), Some(2));
        assert_eq!(fd.max_count(), Some(5));
        fd.check_invariants().unwrap();
    }

    #[test]
    fn decrement_moves_and_removes() {
        let mut fd = tie_fixture();
        assert_eq!(fd.decrement_by(&"a", 4), Ok(1));
        assert_eq!(
            fd.top_entries(Order::ByCountAscending, 2),
            vec![(&"a", 1), (&"f", 1)]
        );
        assert_eq!(fd.decrement(&"f"), Ok(0));
        assert!(!fd.contains(&"f"));
        assert_eq!(fd.number_of_events(), 5);
        assert_eq!(fd.sum_of_counts(), 15);
        fd.check_invariants().unwrap();
    }

    #[test]
    fn rejected_decrements_leave_index_intact() {
        let mut fd = tie_fixture();
        assert_eq!(fd.decrement(&"zz"), Err(CountError::MissingKey));
        assert_eq!(
            fd.decrement_by(&"f", 2),
            Err(CountError::Underflow {
                current: 1,
                requested: 2
            })
        );
        assert_eq!(fd.decrement_by(&"f", 0), Err(CountError::ZeroAmount));
        assert_eq!(fd.get(&"f"), 1);
        fd.check_invariants().unwrap();
    }

    #[test]
    fn set_and_remove_keep_index_consistent() {
        let mut fd = tie_fixture();
        assert_eq!(fd.set("d", 9), Ok(2));
        assert_eq!(fd.max_count(), Some(9));
        assert_eq!(fd.set("d", 0), Ok(9));
        assert_eq!(fd.remove(&"e"), Some(2));
        assert_eq!(fd.remove(&"e"), None);
        assert_eq!(fd.sum_of_counts(), 16);
        fd.check_invariants().unwrap();
    }

    #[test]
    fn ordered_walks() {
        let fd = tie_fixture();
        let desc: Vec<_> = fd.ordered(Order::ByCountDescending).collect();
        assert_eq!(
            desc,
            vec![(&"a", 5), (&"b", 5), (&"c", 5), (&"d", 2), (&"e", 2), (&"f", 1)]
        );
        let keys_desc: Vec<_> = fd.ordered(Order::ByKeyDescending).map(|(k, _)| *k).collect();
        assert_eq!(keys_desc, vec!["f", "e", "d", "c", "b", "a"]);
        assert_eq!(fd.ordered(Order::ByCountAscending).len(), 6);
    }

    #[test]
    fn iteration_is_key_ordered() {
        let fd = tie_fixture();
        let keys: Vec<_> = fd.keys().copied().collect();
        assert_eq!(keys, vec!["a", "b", "c", "d", "e", "f"]);
        assert_eq!((&fd).into_iter().len(), 6);
    }

    #[test]
    fn clear_resets_everything() {
        let mut fd = tie_fixture();
        fd.clear();
        assert!(fd.is_empty());
        assert_eq!(fd.sum_of_counts(), 0);
        assert_eq!(fd.min_count(), None);
        assert!(fd.entries(Order::ByCountDescending).is_empty());
        fd.increment("a").unwrap();
        assert_eq!(fd.get(&"a"), 1);
        fd.check_invariants().unwrap();
    }

    #[test]
    fn overflow_is_rejected() {
        let mut fd = SortedFrequencyDistribution::new();
        fd.set(1u8, u64::MAX).unwrap();
        assert_eq!(fd.increment(2), Err(CountError::Overflow));
        assert!(!fd.contains(&2));
        fd.check_invariants().unwrap();
    }

    #[test]
    fn approx_bytes_grows_with_events() {
        let empty: SortedFrequencyDistribution<u64> = SortedFrequencyDistribution::new();
        let full: SortedFrequencyDistribution<u64> = (0..100).collect();
        assert!(full.approx_bytes() > empty.approx_bytes());
    }

    #[test]
    fn try_extend_stops_at_overflow() {
        let mut fd = SortedFrequencyDistribution::new();
        fd.set("a", u64::MAX - 2).unwrap();
        assert_eq!(fd.try_extend(["b", "b", "c", "d"]), Err(CountError::Overflow));
        // "b" twice fits, "c" does not
        assert_eq!(fd.get(&"b"), 2);
        assert!(!fd.contains(&"c"));
        assert!(!fd.contains(&"d"));
        assert_eq!(fd.sum_of_counts(), u64::MAX);
        fd.check_invariants().unwrap();
    }

    #[test]
    fn try_extend_counts_every_key() {
        let mut fd = SortedFrequencyDistribution::new();
        assert_eq!(fd.try_extend(["x", "y", "x"]), Ok(()));
        assert_eq!(fd.get(&"x"), 2);
        assert_eq!(fd.sum_of_counts(), 3);
    }

    #[test]
    #[should_panic(expected = "count overflows u64")]
    fn extend_panics_on_overflow() {
        let mut fd = SortedFrequencyDistribution::new();
        fd.set("a", u64::MAX).unwrap();
        fd.extend(["b", "b", "c"]);
    }

    #[test]
    fn set_moves_existing_key_between_buckets() {
        let mut fd = tie_fixture();
        assert_eq!(fd.set("b", 2), Ok(5));
        assert_eq!(
            fd.top_entries(Order::ByCountAscending, 4),
            vec![(&"f", 1), (&"b", 2), (&"d", 2), (&"e", 2)]
        );
        assert_eq!(fd.set("b", 7), Ok(2));
        assert_eq!(fd.ordered(Order::ByCountDescending).next(), Some((&"b", 7)));
        assert_eq!(fd.sum_of_counts(), 22);
        fd.check_invariants().unwrap();
    }
}
