//! Example demonstrating the unified DistributionBuilder API.
//!
//! Run with: cargo run --example basic_builder

use countkit::builder::{Backing, DistributionBuilder};
use countkit::error::CountError;
use countkit::traits::{FrequencyDistribution, Order, OrderedEntries};

fn main() {
    println!("=== DistributionBuilder Examples ===\n");

    let rolls = [3u8, 6, 6, 1, 3, 6, 2, 5, 6, 3];

    for backing in [Backing::Hashed, Backing::Sorted] {
        println!("{:?} backing", backing);
        let mut dice = DistributionBuilder::new().capacity(6).build::<u8>(backing);
        dice.extend(rolls);

        println!("   sum = {}", dice.sum_of_counts());
        println!("   top 2 = {:?}", dice.top_entries(Order::ByCountDescending, 2));
        println!("   ln p(6) = {:.3}", dice.log_relative_frequency(&6));
        println!();
    }

    // Errors never change state
    println!("Error handling");
    let mut dice = DistributionBuilder::new().build::<u8>(Backing::Sorted);
    dice.increment_by(4, 2).unwrap();
    match dice.decrement_by(&4, 5) {
        Err(CountError::Underflow { current, requested }) => {
            println!("   refused: wanted {} of {}", requested, current)
        },
        other => println!("   unexpected: {:?}", other),
    }
    println!("   count still {}", dice.get(&4));
}

// Expected output:
// === DistributionBuilder Examples ===
//
// Hashed backing
//    sum = 10
//    top 2 = [(6, 4), (3, 3)]
//    ln p(6) = -0.916
//
// Sorted backing
//    sum = 10
//    top 2 = [(6, 4), (3, 3)]
//    ln p(6) = -0.916
//
// Error handling
//    refused: wanted 5 of 2
//    count still 2
