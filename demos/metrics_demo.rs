//! Cache Metrics Demonstration
//!
//! Runs a small workload against an LRU cache and prints the counters it
//! collected, in the deterministic order the metrics map guarantees.

use recency_cache::config::LruCacheConfig;
use recency_cache::metrics::CacheMetrics;
use recency_cache::LruCache;

fn main() {
    println!("Cache Metrics Demonstration");
    println!("===========================\n");

    let capacity = 3;
    println!("Capacity: {capacity} items");
    println!("Workload: insert 3, read some, miss twice, insert 2 more\n");

    let mut cache: LruCache<&'static str, i32> =
        LruCache::init(LruCacheConfig { capacity }, None);

    cache.insert("apple", 1);
    cache.insert("banana", 2);
    cache.insert("cherry", 3);

    // apple becomes most recently used, then banana
    let _ = cache.get(&"apple");
    let _ = cache.get(&"apple");
    let _ = cache.get(&"banana");

    let _ = cache.get(&"durian");
    let _ = cache.get(&"fig");

    // cherry and then apple fall off the end
    cache.insert("date", 4);
    cache.insert("elderberry", 5);

    println!("Contents (most recent first):");
    print!("{}", cache.dump());

    println!("\n{} metrics:", cache.algorithm_name());
    for (name, value) in cache.metrics() {
        println!("  {name:<14} {value:>8.3}");
    }
}
