#![no_main]

use libfuzzer_sys::fuzz_target;
use countkit::dist::{HashFrequencyDistribution, SortedFrequencyDistribution};
use countkit::error::CountError;
use countkit::traits::{FrequencyDistribution, Order, OrderedEntries};

// Fuzz arbitrary operation sequences on both backings in lockstep
//
// Tests random sequences of increment_by, decrement_by, set, remove, clear.
// Both backings must agree on every result and keep their invariants.
fuzz_target!(|data: &[u8]| {
    let mut hashed: HashFrequencyDistribution<u8> = HashFrequencyDistribution::new();
    let mut sorted: SortedFrequencyDistribution<u8> = SortedFrequencyDistribution::new();

    for chunk in data.chunks_exact(3) {
        let op = chunk[0] % 6;
        let key = chunk[1] % 32;
        let amount = u64::from(chunk[2]);

        match op {
            0 => {
                // increment_by
                let before = hashed.get(&key);
                let result = hashed.increment_by(key, amount);
                assert_eq!(result, sorted.increment_by(key, amount));
                if amount == 0 {
                    assert_eq!(result, Err(CountError::ZeroAmount));
                } else {
                    assert_eq!(result, Ok(before + amount));
                }
            }
            1 => {
                // decrement_by
                let before = hashed.get(&key);
                let sum_before = hashed.sum_of_counts();
                let result = hashed.decrement_by(&key, amount);
                assert_eq!(result, sorted.decrement_by(&key, amount));
                match result {
                    Ok(after) => {
                        assert_eq!(after, before - amount);
                        assert_eq!(hashed.contains(&key), after > 0);
                    }
                    Err(_) => {
                        // Failures leave state untouched
                        assert_eq!(hashed.get(&key), before);
                        assert_eq!(hashed.sum_of_counts(), sum_before);
                    }
                }
            }
            2 => {
                // set
                let count = amount % 8;
                let result = hashed.set(key, count);
                assert_eq!(result, sorted.set(key, count));
                assert_eq!(hashed.get(&key), count);
            }
            3 => {
                // remove
                let removed = hashed.remove(&key);
                assert_eq!(removed, sorted.remove(&key));
                assert!(!hashed.contains(&key));
            }
            4 => {
                // ordered reads
                let order = Order::ALL[usize::from(chunk[2]) % Order::ALL.len()];
                let k = usize::from(key);
                assert_eq!(hashed.entries(order), sorted.entries(order));
                assert_eq!(hashed.top_entries(order, k), sorted.top_entries(order, k));
            }
            5 => {
                // clear
                if chunk[2] % 16 == 0 {
                    hashed.clear();
                    sorted.clear();
                    assert!(hashed.is_empty());
                }
            }
            _ => unreachable!(),
        }

        assert_eq!(hashed.number_of_events(), sorted.number_of_events());
        assert_eq!(hashed.sum_of_counts(), sorted.sum_of_counts());
        hashed.check_invariants().unwrap();
        sorted.check_invariants().unwrap();
    }
});
