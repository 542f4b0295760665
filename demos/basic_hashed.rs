use countkit::dist::HashFrequencyDistribution;
use countkit::traits::{FrequencyDistribution, Order, OrderedEntries};

fn main() {
    let text = "to be or not to be that is the question";
    let mut words: HashFrequencyDistribution<&str> = text.split_whitespace().collect();

    println!("distinct={} total={}", words.number_of_events(), words.sum_of_counts());
    println!("top 3: {:?}", words.top_entries(Order::ByCountDescending, 3));
    println!("p(be)={:.3}", words.relative_frequency(&"be"));

    words.decrement(&"question").unwrap();
    println!("contains question? {}", words.contains(&"question"));
    println!("decrement again: {:?}", words.decrement(&"question"));
}

// Expected output:
// distinct=8 total=10
// top 3: [("be", 2), ("to", 2), ("is", 1)]
// p(be)=0.200
// contains question? false
// decrement again: Err(MissingKey)
//
// Explanation: "be" and "to" tie at 2 and are ordered by key; the remaining
// words tie at 1, so the third slot goes to the smallest key, "is".
