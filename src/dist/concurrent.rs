//! Lock-wrapped hash distribution for shared access.
//!
//! ## Architecture
//! - A single `parking_lot::RwLock` guards a [`HashFrequencyDistribution`].
//! - Every method takes the lock exactly once, so each call is atomic with
//!   respect to the others. Sequences of calls are not.
//! - [`snapshot`](ConcurrentFrequencyDistribution::snapshot) clones the
//!   state under a read lock; the clone is owned by the caller and can be
//!   queried (ordered retrieval, iteration) without holding any lock.
//!
//! ## Example Usage
//! ```rust
//! use std::sync::Arc;
//! use std::thread;
//!
//! use countkit::dist::ConcurrentFrequencyDistribution;
//! use countkit::traits::{Order, OrderedEntries};
//!
//! let fd = Arc::new(ConcurrentFrequencyDistribution::new());
//! let handles: Vec<_> = (0..4)
//!     .map(|_| {
//!         let fd = Arc::clone(&fd);
//!         thread::spawn(move || {
//!             for word in ["x", "y", "x"] {
//!                 fd.increment(word).unwrap();
//!             }
//!         })
//!     })
//!     .collect();
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//!
//! let snapshot = fd.snapshot();
//! assert_eq!(snapshot.entries(Order::ByCountDescending), vec![(&"x", 8), (&"y", 4)]);
//! ```

use std::hash::Hash;

use parking_lot::RwLock;

use crate::dist::HashFrequencyDistribution;
use crate::error::CountError;
use crate::traits::{FrequencyDistribution, Order, OrderedEntries};

/// Thread-safe frequency distribution with a global `RwLock`.
#[derive(Debug)]
pub struct ConcurrentFrequencyDistribution<K> {
    inner: RwLock<HashFrequencyDistribution<K>>,
}

impl<K> ConcurrentFrequencyDistribution<K>
where
    K: Eq + Hash,
{
    /// Creates an empty distribution.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashFrequencyDistribution::new()),
        }
    }

    /// Creates an empty distribution with room for `capacity` events.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: RwLock::new(HashFrequencyDistribution::with_capacity(capacity)),
        }
    }

    /// Wraps an existing distribution.
    pub fn from_distribution(fd: HashFrequencyDistribution<K>) -> Self {
        Self {
            inner: RwLock::new(fd),
        }
    }

    /// See [`FrequencyDistribution::increment`].
    pub fn increment(&self, key: K) -> Result<u64, CountError> {
        self.inner.write().increment(key)
    }

    /// See [`FrequencyDistribution::increment_by`].
    pub fn increment_by(&self, key: K, amount: u64) -> Result<u64, CountError> {
        self.inner.write().increment_by(key, amount)
    }

    /// See [`FrequencyDistribution::decrement`].
    pub fn decrement(&self, key: &K) -> Result<u64, CountError> {
        self.inner.write().decrement(key)
    }

    /// See [`FrequencyDistribution::decrement_by`].
    pub fn decrement_by(&self, key: &K, amount: u64) -> Result<u64, CountError> {
        self.inner.write().decrement_by(key, amount)
    }

    /// See [`FrequencyDistribution::set`].
    pub fn set(&self, key: K, count: u64) -> Result<u64, CountError> {
        self.inner.write().set(key, count)
    }

    /// See [`FrequencyDistribution::remove`].
    pub fn remove(&self, key: &K) -> Option<u64> {
        self.inner.write().remove(key)
    }

    /// See [`FrequencyDistribution::get`].
    pub fn get(&self, key: &K) -> u64 {
        self.inner.read().get(key)
    }

    /// See [`FrequencyDistribution::contains`].
    pub fn contains(&self, key: &K) -> bool {
        self.inner.read().contains(key)
    }

    /// See [`FrequencyDistribution::number_of_events`].
    pub fn number_of_events(&self) -> usize {
        self.inner.read().number_of_events()
    }

    /// See [`FrequencyDistribution::sum_of_counts`].
    pub fn sum_of_counts(&self) -> u64 {
        self.inner.read().sum_of_counts()
    }

    /// See [`FrequencyDistribution::is_empty`].
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Count and sum are read under one lock.
    pub fn relative_frequency(&self, key: &K) -> f64 {
        self.inner.read().relative_frequency(key)
    }

    /// Count and sum are read under one lock.
    pub fn log_relative_frequency(&self, key: &K) -> f64 {
        self.inner.read().log_relative_frequency(key)
    }

    /// See [`FrequencyDistribution::clear`].
    pub fn clear(&self) {
        self.inner.write().clear();
    }

    /// Runs `f` against the distribution under a read lock.
    ///
    /// Keep `f` short: writers wait until it returns.
    pub fn with_read<R>(&self, f: impl FnOnce(&HashFrequencyDistribution<K>) -> R) -> R {
        f(&self.inner.read())
    }

    /// Clones the current state into an owned distribution.
    pub fn snapshot(&self) -> HashFrequencyDistribution<K>
    where
        K: Clone,
    {
        self.inner.read().clone()
    }

    /// Ordered entries with owned keys, taken under one read lock.
    pub fn entries(&self, order: Order) -> Vec<(K, u64)>
    where
        K: Ord + Clone,
    {
        own(self.inner.read().entries(order))
    }

    /// The first `k` entries under `order`, with owned keys.
    pub fn top_entries(&self, order: Order, k: usize) -> Vec<(K, u64)>
    where
        K: Ord + Clone,
    {
        own(self.inner.read().top_entries(order, k))
    }

    /// Consumes the wrapper, returning the distribution.
    pub fn into_inner(self) -> HashFrequencyDistribution<K> {
        self.inner.into_inner()
    }
}

impl<K> Default for ConcurrentFrequencyDistribution<K>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

fn own<K: Clone>(entries: Vec<(&K, u64)>) -> Vec<(K, u64)> {
    entries
        .into_iter()
        .map(|(key, count)| (key.clone(), count))
        .collect()
}
