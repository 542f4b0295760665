//! Bounded top-k selection over `(key, count)` entries.
//!
//! Keeps the best `limit` entries seen so far under an [`Order`], using a
//! max-heap whose root is the entry that ranks *last*. A new entry only
//! enters the heap if it ranks before the current root, which it then
//! replaces.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │  TopK { order: ByCountDescending, limit: 3 }                  │
//! │                                                               │
//! │  heap: BinaryHeap<Ranked<K>>   (root = worst retained entry)  │
//! │                                                               │
//! │            ("d", 2)   ← root: ranks last of the three         │
//! │           /        \                                          │
//! │     ("a", 5)     ("b", 5)                                     │
//! │                                                               │
//! │  push(("c", 5)):  ("c", 5) ranks before ("d", 2)              │
//! │                   → replace root, sift down                   │
//! │  push(("f", 1)):  ranks after root → dropped                  │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations
//!
//! | Operation         | Description                         | Complexity |
//! |-------------------|-------------------------------------|------------|
//! | `push`            | Offer one entry                     | O(log k)   |
//! | `peek_last`       | Worst retained entry                | O(1)       |
//! | `into_sorted_vec` | Retained entries in `order`         | O(k log k) |
//!
//! Selecting k of n entries costs O(n log k) and O(k) memory, versus
//! O(n log n) for sorting everything.
//!
//! ## Example Usage
//!
//! ```
//! use countkit::ds::TopK;
//! use countkit::traits::Order;
//!
//! let mut top = TopK::new(Order::ByCountDescending, 2);
//! top.extend([("x", 1), ("y", 7), ("z", 4)]);
//!
//! assert_eq!(top.into_sorted_vec(), vec![("y", 7), ("z", 4)]);
//! ```
//!
//! ## Thread Safety
//!
//! `TopK` is not thread-safe; it is meant to live for a single query.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::traits::Order;

/// Upper bound on the heap slots reserved up front; larger limits grow on push.
const MAX_PREALLOC: usize = 1024;

#[derive(Debug, Clone)]
struct Ranked<K> {
    key: K,
    count: u64,
    order: Order,
}

impl<K: Ord> PartialEq for Ranked<K> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<K: Ord> Eq for Ranked<K> {}

impl<K: Ord> PartialOrd for Ranked<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord> Ord for Ranked<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.order
            .compare((&self.key, self.count), (&other.key, other.count))
    }
}

/// Retains the first `limit` entries under an [`Order`].
///
/// `K` is usually a reference into the distribution being ranked, so the
/// selector never clones keys.
///
/// # Example
///
/// ```
/// use countkit::ds::TopK;
/// use countkit::traits::Order;
///
/// let counts = [("a", 5), ("b", 5), ("c", 5), ("d", 2)];
/// let mut top = TopK::new(Order::ByCountAscending, 2);
/// for &(key, count) in &counts {
///     top.push(key, count);
/// }
/// assert_eq!(top.len(), 2);
/// assert_eq!(top.peek_last(), Some((&"a", 5)));
/// assert_eq!(top.into_sorted_vec(), vec![("d", 2), ("a", 5)]);
/// ```
#[derive(Debug, Clone)]
pub struct TopK<K> {
    heap: BinaryHeap<Ranked<K>>,
    order: Order,
    limit: usize,
}

impl<K: Ord> TopK<K> {
    /// Creates an empty selector keeping at most `limit` entries.
    ///
    /// Reserves at most 1024 slots up front, so `limit` may exceed the
    /// number of entries that will ever be offered.
    pub fn new(order: Order, limit: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(limit.min(MAX_PREALLOC)),
            order,
            limit,
        }
    }

    /// Order entries are ranked by.
    pub fn order(&self) -> Order {
        self.order
    }

    /// Maximum number of retained entries.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns `true` if nothing is retained.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Offers an entry; returns `true` if it was retained.
    pub fn push(&mut self, key: K, count: u64) -> bool {
        if self.limit == 0 {
            return false;
        }
        let candidate = Ranked {
            key,
            count,
            order: self.order,
        };
        if self.heap.len() < self.limit {
            self.heap.push(candidate);
            return true;
        }
        // The root guard sifts down when dropped.
        match self.heap.peek_mut() {
            Some(mut last) if candidate < *last => {
                *last = candidate;
                true
            },
            _ => false,
        }
    }

    /// The retained entry that ranks last, i.e. the next to be displaced.
    pub fn peek_last(&self) -> Option<(&K, u64)> {
        self.heap.peek().map(|entry| (&entry.key, entry.count))
    }

    /// Consumes the selector, returning retained entries in `order`.
    pub fn into_sorted_vec(self) -> Vec<(K, u64)> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|entry| (entry.key, entry.count))
            .collect()
    }
}

impl<K: Ord> Extend<(K, u64)> for TopK<K> {
    fn extend<I: IntoIterator<Item = (K, u64)>>(&mut self, iter: I) {
        for (key, count) in iter {
            self.push(key, count);
        }
    }
}
