//! Memory Release Tests
//!
//! The cache owns its entries and must free them as soon as they leave:
//! on eviction, on erase, on clear and when the cache itself is dropped.
//! An instrumented global allocator measures the net bytes held.
//!
//! Everything lives in a single test so no other test thread allocates
//! while a region is being measured.

use recency_cache::LruCache;
use stats_alloc::{Region, StatsAlloc, INSTRUMENTED_SYSTEM};
use std::alloc::System;

#[global_allocator]
static GLOBAL: &StatsAlloc<System> = &INSTRUMENTED_SYSTEM;

const VALUE_BYTES: usize = 4096;

fn net_bytes(region: &Region<'_, System>) -> isize {
    let change = region.change();
    change.bytes_allocated as isize - change.bytes_deallocated as isize
}

fn payload(seed: usize) -> Vec<u8> {
    vec![(seed % 251) as u8; VALUE_BYTES]
}

#[test]
fn test_memory_is_released_eagerly() {
    // Eviction: churning many large values through a tiny cache must not
    // accumulate memory beyond what the live entries hold.
    let mut cache: LruCache<usize, Vec<u8>> = LruCache::new(2);
    cache.insert(0, payload(0));
    cache.insert(1, payload(1));
    let region = Region::new(GLOBAL);
    for i in 2..200 {
        cache.insert(i, payload(i));
    }
    let churn = net_bytes(&region);
    assert!(
        churn.unsigned_abs() < VALUE_BYTES,
        "eviction leaked {churn} bytes"
    );
    assert_eq!(cache.len(), 2);

    // The first overflow of a full cache links one entry past capacity
    // before evicting; storage for it is already there.
    let mut full: LruCache<u64, u64> = LruCache::new(10_000);
    for i in 0..10_000 {
        full.insert(i, i);
    }
    let region = Region::new(GLOBAL);
    full.insert(10_000, 10_000);
    assert_eq!(region.change().reallocations, 0);
    assert_eq!(full.len(), 10_000);
    drop(full);

    // Erase frees the value immediately.
    let region = Region::new(GLOBAL);
    assert_eq!(cache.erase(&199), 1);
    assert!(net_bytes(&region) <= -(VALUE_BYTES as isize));

    // Clear frees every remaining value.
    cache.insert(500, payload(500));
    let region = Region::new(GLOBAL);
    cache.clear();
    assert!(net_bytes(&region) <= -(2 * VALUE_BYTES as isize));

    // Dropping the cache returns everything it ever allocated.
    let region = Region::new(GLOBAL);
    let mut cache: LruCache<String, Vec<u8>> = LruCache::new(8);
    for i in 0..32 {
        cache.insert(format!("key{i}"), payload(i));
    }
    drop(cache);
    assert_eq!(net_bytes(&region), 0);
}
