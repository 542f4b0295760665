//! # Frequency Distribution Traits
//!
//! This module defines the contract shared by every frequency distribution
//! backing, and the sort order used for ordered retrieval.
//!
//! ## Architecture
//!
//! ```text
//!            ┌──────────────────────────────────────────────┐
//!            │        FrequencyDistribution<K>              │
//!            │                                              │
//!            │  increment / increment_by  → Result<u64>     │
//!            │  decrement / decrement_by  → Result<u64>     │
//!            │  set(K, u64)               → Result<u64>     │
//!            │  remove(&K)                → Option<u64>     │
//!            │  get(&K) → u64       contains(&K) → bool     │
//!            │  number_of_events()  sum_of_counts()         │
//!            │  relative_frequency  log_relative_frequency  │
//!            │  keys()  iter()  clear()                     │
//!            └──────────────────────┬───────────────────────┘
//!                                   │  K: Ord
//!                                   ▼
//!            ┌──────────────────────────────────────────────┐
//!            │           OrderedEntries<K>                  │
//!            │                                              │
//!            │  entries(Order)          → Vec<(&K, u64)>    │
//!            │  top_entries(Order, k)   → Vec<(&K, u64)>    │
//!            └──────────────────────────────────────────────┘
//! ```
//!
//! The core trait places no bound on `K`; each backing adds the bounds its
//! storage needs (`Eq + Hash` for the hash backing, `Ord + Clone` for the
//! ordered backing). Ordered retrieval always needs `K: Ord`, because equal
//! counts are broken by ascending key.
//!
//! ## Count Semantics
//!
//! | Operation       | Absent key          | Zero amount  | Result reaches 0 |
//! |-----------------|---------------------|--------------|------------------|
//! | `increment_by`  | inserted            | `ZeroAmount` | n/a              |
//! | `decrement_by`  | `MissingKey`        | `ZeroAmount` | key removed      |
//! | `set`           | inserted (if n > 0) | removes key  | key removed      |
//! | `get`           | `0`                 | n/a          | n/a              |
//!
//! Rejected mutations leave the distribution untouched.
//!
//! ## Example
//!
//! ```
//! use countkit::dist::HashFrequencyDistribution;
//! use countkit::traits::{FrequencyDistribution, Order, OrderedEntries};
//!
//! let mut fd = HashFrequencyDistribution::new();
//! for word in ["to", "be", "or", "not", "to", "be"] {
//!     fd.increment(word).unwrap();
//! }
//!
//! assert_eq!(fd.number_of_events(), 4);
//! assert_eq!(fd.sum_of_counts(), 6);
//! assert_eq!(
//!     fd.top_entries(Order::ByCountDescending, 2),
//!     vec![(&"be", 2), (&"to", 2)]
//! );
//! ```

use std::cmp::Ordering;

use crate::error::CountError;

/// Sort order for ordered entry retrieval.
///
/// Count orders break ties by ascending key in both directions, so the
/// result is fully deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Order {
    /// Keys from smallest to largest.
    ByKeyAscending,
    /// Keys from largest to smallest.
    ByKeyDescending,
    /// Counts from smallest to largest, equal counts by ascending key.
    ByCountAscending,
    /// Counts from largest to smallest, equal counts by ascending key.
    ByCountDescending,
}

impl Order {
    /// All four orders.
    pub const ALL: [Order; 4] = [
        Order::ByKeyAscending,
        Order::ByKeyDescending,
        Order::ByCountAscending,
        Order::ByCountDescending,
    ];

    /// Compares two `(key, count)` entries; `Less` means `a` comes first.
    ///
    /// # Example
    ///
    /// ```
    /// use std::cmp::Ordering;
    /// use countkit::traits::Order;
    ///
    /// let order = Order::ByCountDescending;
    /// assert_eq!(order.compare((&"a", 5), (&"b", 2)), Ordering::Less);
    /// // equal counts: ascending key
    /// assert_eq!(order.compare((&"b", 5), (&"a", 5)), Ordering::Greater);
    /// ```
    #[inline]
    pub fn compare<K: Ord + ?Sized>(self, a: (&K, u64), b: (&K, u64)) -> Ordering {
        match self {
            Order::ByKeyAscending => a.0.cmp(b.0),
            Order::ByKeyDescending => b.0.cmp(a.0),
            Order::ByCountAscending => a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)),
            Order::ByCountDescending => b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)),
        }
    }

    /// Returns `true` for the two count orders.
    #[inline]
    pub fn is_by_count(self) -> bool {
        matches!(self, Order::ByCountAscending | Order::ByCountDescending)
    }
}

/// Mapping from keys to strictly positive counts with O(1) aggregates.
///
/// Implementors keep `sum_of_counts` and `number_of_events` up to date on
/// every mutation and never store a zero count.
///
/// Not safe for concurrent mutation: every mutator takes `&mut self`.
/// Callers that share a distribution across threads must lock externally,
/// or use `ConcurrentFrequencyDistribution` (feature `concurrency`).
pub trait FrequencyDistribution<K> {
    /// Adds one to `key`'s count. Returns the new count.
    fn increment(&mut self, key: K) -> Result<u64, CountError> {
        self.increment_by(key, 1)
    }

    /// Adds `amount` to `key`'s count, inserting the key if absent.
    ///
    /// Fails with [`CountError::ZeroAmount`] when `amount == 0` and with
    /// [`CountError::Overflow`] when the sum would exceed `u64::MAX`.
    fn increment_by(&mut self, key: K, amount: u64) -> Result<u64, CountError>;

    /// Subtracts one from `key`'s count. Returns the new count.
    fn decrement(&mut self, key: &K) -> Result<u64, CountError> {
        self.decrement_by(key, 1)
    }

    /// Subtracts `amount` from `key`'s count. Returns the new count.
    ///
    /// A result of zero removes the key. Fails with
    /// [`CountError::MissingKey`] for an absent key,
    /// [`CountError::Underflow`] when `amount` exceeds the count and
    /// [`CountError::ZeroAmount`] when `amount == 0`.
    fn decrement_by(&mut self, key: &K, amount: u64) -> Result<u64, CountError>;

    /// Overwrites `key`'s count with `count`, returning the previous count
    /// (0 if absent). `count == 0` removes the key.
    fn set(&mut self, key: K, count: u64) -> Result<u64, CountError>;

    /// Removes `key`, returning its count if it was present.
    fn remove(&mut self, key: &K) -> Option<u64>;

    /// Returns `key`'s count, or 0 if absent.
    fn get(&self, key: &K) -> u64;

    /// Returns `true` if `key` holds a positive count.
    fn contains(&self, key: &K) -> bool {
        self.get(key) > 0
    }

    /// Number of distinct keys with a positive count.
    fn number_of_events(&self) -> usize;

    /// Sum of all counts.
    fn sum_of_counts(&self) -> u64;

    /// Returns `true` if no key holds a count.
    fn is_empty(&self) -> bool {
        self.number_of_events() == 0
    }

    /// `get(key) / sum_of_counts()`, or `0.0` when the sum is zero.
    fn relative_frequency(&self, key: &K) -> f64 {
        let sum = self.sum_of_counts();
        if sum == 0 {
            0.0
        } else {
            self.get(key) as f64 / sum as f64
        }
    }

    /// Natural log of [`relative_frequency`](Self::relative_frequency).
    ///
    /// `f64::NEG_INFINITY` for absent keys and for an empty distribution.
    fn log_relative_frequency(&self, key: &K) -> f64 {
        self.relative_frequency(key).ln()
    }

    /// Lazy iterator over the keys holding a positive count.
    fn keys<'a>(&'a self) -> impl Iterator<Item = &'a K>
    where
        K: 'a;

    /// Lazy iterator over `(key, count)` pairs, each current key once.
    ///
    /// Order is backing-specific. Each call starts over from current state.
    fn iter<'a>(&'a self) -> impl Iterator<Item = (&'a K, u64)>
    where
        K: 'a;

    /// Removes every key and zeroes both aggregates.
    fn clear(&mut self);
}

/// Ordered `(key, count)` retrieval.
pub trait OrderedEntries<K: Ord>: FrequencyDistribution<K> {
    /// Every entry, sorted by `order`.
    fn entries<'a>(&'a self, order: Order) -> Vec<(&'a K, u64)>
    where
        K: 'a;

    /// The first `min(k, number_of_events())` entries under `order`.
    fn top_entries<'a>(&'a self, order: Order, k: usize) -> Vec<(&'a K, u64)>
    where
        K: 'a;
}
