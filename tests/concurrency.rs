// ==============================================
// CONCURRENT DISTRIBUTION TESTS (integration)
// ==============================================
//
// Multi-threaded checks for ConcurrentFrequencyDistribution. These need real
// threads and cannot live inline.

#![cfg(feature = "concurrency")]

use std::sync::{Arc, Barrier};
use std::thread;

use countkit::dist::ConcurrentFrequencyDistribution;
use countkit::error::CountError;
use countkit::traits::{FrequencyDistribution, Order, OrderedEntries};

const THREADS: usize = 8;

// ==============================================
// Lost updates
// ==============================================

mod lost_updates {
    use super::*;

    #[test]
    fn concurrent_increments_are_all_counted() {
        let per_thread = 1_000u64;
        let fd: Arc<ConcurrentFrequencyDistribution<u64>> =
            Arc::new(ConcurrentFrequencyDistribution::new());
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let fd = Arc::clone(&fd);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    for i in 0..per_thread {
                        // Shared key plus one key per thread
                        fd.increment(0).unwrap();
                        fd.increment_by(1 + t as u64, i % 3 + 1).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let per_thread_sum: u64 = (0..per_thread).map(|i| i % 3 + 1).sum();
        assert_eq!(fd.get(&0), THREADS as u64 * per_thread);
        assert_eq!(fd.number_of_events(), THREADS + 1);
        assert_eq!(
            fd.sum_of_counts(),
            THREADS as u64 * (per_thread + per_thread_sum)
        );
        fd.with_read(|inner| inner.check_invariants()).unwrap();
    }

    #[test]
    fn racing_decrements_never_underflow() {
        let fd = Arc::new(ConcurrentFrequencyDistribution::new());
        fd.set("token", 100).unwrap();
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let fd = Arc::clone(&fd);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    let mut taken = 0u64;
                    let mut rejected = 0u64;
                    for _ in 0..50 {
                        match fd.decrement(&"token") {
                            Ok(_) => taken += 1,
                            Err(CountError::MissingKey) => rejected += 1,
                            Err(other) => panic!("unexpected error: {other}"),
                        }
                    }
                    (taken, rejected)
                })
            })
            .collect();

        let mut taken = 0;
        for handle in handles {
            let (t, _) = handle.join().unwrap();
            taken += t;
        }

        // Exactly 100 decrements win, the rest see the key gone
        assert_eq!(taken, 100);
        assert!(!fd.contains(&"token"));
        assert!(fd.is_empty());
    }
}

// ==============================================
// Snapshots
// ==============================================

mod snapshots {
    use super::*;

    #[test]
    fn snapshots_are_internally_consistent_under_writes() {
        let fd = Arc::new(ConcurrentFrequencyDistribution::new());
        let barrier = Arc::new(Barrier::new(3));

        let writers: Vec<_> = (0..2u64)
            .map(|w| {
                let fd = Arc::clone(&fd);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    for i in 0..2_000u64 {
                        fd.increment((i + w) % 32).unwrap();
                    }
                })
            })
            .collect();

        barrier.wait();
        for _ in 0..200 {
            let snapshot = fd.snapshot();
            snapshot.check_invariants().unwrap();
            let total: u64 = snapshot.iter().map(|(_, count)| count).sum();
            assert_eq!(total, snapshot.sum_of_counts());

            let ranked = snapshot.entries(Order::ByCountDescending);
            for pair in ranked.windows(2) {
                assert!(pair[0].1 >= pair[1].1);
            }
        }

        for writer in writers {
            writer.join().unwrap();
        }
        assert_eq!(fd.sum_of_counts(), 4_000);
        assert_eq!(fd.number_of_events(), 32);
    }

    #[test]
    fn owned_top_entries_outlive_the_lock() {
        let fd = ConcurrentFrequencyDistribution::new();
        for word in ["the", "cat", "the", "hat", "the", "cat"] {
            fd.increment(word.to_string()).unwrap();
        }
        let top = fd.top_entries(Order::ByCountDescending, 2);
        fd.clear();
        assert_eq!(top, vec![("the".to_string(), 3), ("cat".to_string(), 2)]);
        assert!(fd.is_empty());
    }
}
