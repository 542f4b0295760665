//! DHAT heap profiler for countkit.
//!
//! Run with: cargo run --bin dhat_profile --release --features dhat-heap
//! View results: Open dhat-heap.json in <https://nnethercote.github.io/dh_view/dh_view.html>

#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::collections::HashMap;

use countkit::dist::{HashFrequencyDistribution, SortedFrequencyDistribution};
use countkit::traits::{FrequencyDistribution, Order, OrderedEntries};

const OPERATIONS: usize = 200_000;
const UNIVERSE: u64 = 16_384;

/// Simple XorShift64 RNG for deterministic workloads.
struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    fn next_f64(&mut self) -> f64 {
        const SCALE: f64 = 1.0 / (u64::MAX as f64);
        (self.next_u64() as f64) * SCALE
    }
}

/// 90% of events come from 10% of the universe.
fn hotset_events(operations: usize, universe: u64, seed: u64) -> Vec<u64> {
    let mut rng = XorShift64::new(seed);
    let hot_size = universe / 10;
    (0..operations)
        .map(|_| {
            if rng.next_f64() < 0.9 {
                rng.next_u64() % hot_size
            } else {
                hot_size + (rng.next_u64() % (universe - hot_size))
            }
        })
        .collect()
}

/// Record, query, then drain half the events one decrement at a time.
fn exercise<D>(fd: &mut D, events: &[u64])
where
    D: FrequencyDistribution<u64> + OrderedEntries<u64>,
{
    for &event in events {
        let _ = fd.increment(event);
    }
    let top = fd.top_entries(Order::ByCountDescending, 100);
    println!("  Top event: {:?}", top.first());
    for event in events.iter().take(events.len() / 2) {
        let _ = fd.decrement(event);
    }
    println!(
        "  Distinct: {}, total: {}",
        fd.number_of_events(),
        fd.sum_of_counts()
    );
}

fn profile_std_hashmap(events: &[u64]) {
    println!("=== Profiling std HashMap baseline ===");
    let mut counts: HashMap<u64, u64> = HashMap::new();
    for &event in events {
        *counts.entry(event).or_insert(0) += 1;
    }
    println!("  Distinct: {}", counts.len());
}

fn profile_hashed(events: &[u64]) {
    println!("=== Profiling HashFrequencyDistribution ===");
    let mut fd = HashFrequencyDistribution::new();
    exercise(&mut fd, events);
    println!("  Approx bytes: {}", fd.approx_bytes());
}

fn profile_sorted(events: &[u64]) {
    println!("=== Profiling SortedFrequencyDistribution ===");
    let mut fd = SortedFrequencyDistribution::new();
    exercise(&mut fd, events);
    println!("  Approx bytes: {}", fd.approx_bytes());
}

fn main() {
    let _profiler = dhat::Profiler::new_heap();

    println!("countkit DHAT Heap Profiling");
    println!("============================\n");

    let events = hotset_events(OPERATIONS, UNIVERSE, 42);
    profile_std_hashmap(&events);
    profile_hashed(&events);
    profile_sorted(&events);

    println!("\n============================");
    println!("Profiling complete!");
    println!(
        "View results: Open dhat-heap.json in <https://nnethercote.github.io/dh_view/dh_view.html>"
    );
}
