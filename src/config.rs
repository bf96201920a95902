//! Cache Configuration
//!
//! Configuration for [`LruCache`](crate::LruCache) is a plain struct with public
//! fields, so it can be written out in one expression and copied around freely.
//!
//! # Sizing
//!
//! `capacity` is the maximum number of entries. Every entry costs exactly one
//! unit regardless of the size of its key or value. A capacity of `0` is valid:
//! such a cache accepts inserts but never retains anything.
//!
//! The cache reserves room for `capacity` entries up front, so pick a realistic
//! bound rather than `usize::MAX`.
//!
//! # Examples
//!
//! ```
//! use recency_cache::config::LruCacheConfig;
//! use recency_cache::LruCache;
//!
//! let config = LruCacheConfig { capacity: 1000 };
//! let cache: LruCache<String, i32> = LruCache::init(config, None);
//! assert_eq!(cache.cap(), 1000);
//! ```

use core::fmt;

/// Configuration for an LRU (Least Recently Used) cache.
///
/// # Examples
///
/// ```
/// use recency_cache::config::LruCacheConfig;
/// use recency_cache::LruCache;
///
/// let config = LruCacheConfig::new(500);
/// let cache: LruCache<&str, i32> = LruCache::init(config, None);
/// assert!(cache.is_empty());
/// ```
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct LruCacheConfig {
    /// Maximum number of key-value pairs the cache can hold.
    pub capacity: usize,
}

impl LruCacheConfig {
    /// Creates a configuration holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }
}

impl fmt::Debug for LruCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCacheConfig")
            .field("capacity", &self.capacity)
            .finish()
    }
}
