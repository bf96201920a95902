//! Cache Metrics
//!
//! Counters describing how an [`LruCache`](crate::LruCache) has been used,
//! reported through the [`CacheMetrics`] trait as a `BTreeMap` so that the
//! output always comes out in the same order.
//!
//! Only keyed lookups (`get`, `at`, `get_mut`, `find`) count as requests.
//! Membership tests and iteration are observation, not access, and are not
//! recorded.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

/// Counters tracked by the LRU cache.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LruCacheMetrics {
    /// Total number of keyed lookups
    pub requests: u64,

    /// Lookups that found their key
    pub cache_hits: u64,

    /// New keys added to the cache
    pub insertions: u64,

    /// Inserts that overwrote the value of an existing key
    pub updates: u64,

    /// Entries dropped to get back under capacity
    pub evictions: u64,

    /// Entries removed explicitly with `erase` or `remove`
    pub removals: u64,
}

impl LruCacheMetrics {
    /// Creates a zeroed set of counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a lookup that found its key.
    pub fn record_hit(&mut self) {
        self.requests += 1;
        self.cache_hits += 1;
    }

    /// Records a lookup that did not find its key.
    pub fn record_miss(&mut self) {
        self.requests += 1;
    }

    /// Records a new key entering the cache.
    pub fn record_insertion(&mut self) {
        self.insertions += 1;
    }

    /// Records an insert that replaced an existing value.
    pub fn record_update(&mut self) {
        self.updates += 1;
    }

    /// Records an entry removed because the cache was over capacity.
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Records an entry removed on request.
    pub fn record_removal(&mut self) {
        self.removals += 1;
    }

    /// Number of lookups that missed.
    pub fn cache_misses(&self) -> u64 {
        self.requests - self.cache_hits
    }

    /// Fraction of lookups that hit, between 0.0 and 1.0.
    ///
    /// Returns 0.0 if nothing has been looked up yet.
    pub fn hit_rate(&self) -> f64 {
        if self.requests > 0 {
            self.cache_hits as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Fraction of lookups that missed, between 0.0 and 1.0.
    ///
    /// Returns 0.0 if nothing has been looked up yet.
    pub fn miss_rate(&self) -> f64 {
        if self.requests > 0 {
            self.cache_misses() as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Converts the counters to a map with deterministic key ordering.
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = BTreeMap::new();

        metrics.insert("requests".to_string(), self.requests as f64);
        metrics.insert("cache_hits".to_string(), self.cache_hits as f64);
        metrics.insert("cache_misses".to_string(), self.cache_misses() as f64);
        metrics.insert("insertions".to_string(), self.insertions as f64);
        metrics.insert("updates".to_string(), self.updates as f64);
        metrics.insert("evictions".to_string(), self.evictions as f64);
        metrics.insert("removals".to_string(), self.removals as f64);

        metrics.insert("hit_rate".to_string(), self.hit_rate());
        metrics.insert("miss_rate".to_string(), self.miss_rate());

        if self.insertions > 0 {
            metrics.insert(
                "eviction_rate".to_string(),
                self.evictions as f64 / self.insertions as f64,
            );
        }

        metrics
    }
}

/// Uniform metrics reporting for cache implementations.
pub trait CacheMetrics {
    /// Returns all metrics as key-value pairs in deterministic order.
    fn metrics(&self) -> BTreeMap<String, f64>;

    /// Algorithm name for identification, e.g. `"LRU"`.
    fn algorithm_name(&self) -> &'static str;
}

impl CacheMetrics for LruCacheMetrics {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        "LRU"
    }
}
