use countkit::dist::SortedFrequencyDistribution;
use countkit::traits::{FrequencyDistribution, Order, OrderedEntries};

fn main() {
    let mut status: SortedFrequencyDistribution<u16> = SortedFrequencyDistribution::new();

    for code in [200, 200, 404, 200, 500, 404, 200, 301] {
        status.increment(code).unwrap();
    }

    println!("by code: {:?}", status.entries(Order::ByKeyAscending));
    println!("rarest 2: {:?}", status.top_entries(Order::ByCountAscending, 2));

    // Lazy walk, nothing past the first entry is visited
    let busiest = status.ordered(Order::ByCountDescending).next();
    println!("busiest: {:?}", busiest);

    status.set(200, 0).unwrap();
    println!("after reset: max count = {:?}", status.max_count());
}

// Expected output:
// by code: [(200, 4), (301, 1), (404, 2), (500, 1)]
// rarest 2: [(301, 1), (500, 1)]
// busiest: Some((200, 4))
// after reset: max count = Some(2)
//
// Explanation: the sorted backing keeps both key and count order, so ordered
// reads walk the maintained indexes instead of sorting.
