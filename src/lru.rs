//! Least Recently Used (LRU) Cache Implementation
//!
//! The cache couples two structures:
//!
//! - a **recency list** holding the entries themselves in a slab, ordered from
//!   most recently used (front) to least recently used (back), and
//! - an **index** (`HashTable<Handle>`) that finds an entry by key in expected
//!   O(1) time. It stores only handles and compares keys through the node, so
//!   every key lives in exactly one place.
//!
//! Every keyed access goes through the index and then moves the entry to the
//! front of the list. When an insert pushes the cache over capacity, entries
//! are taken off the back of the list and out of the index until it fits.
//!
//! # Performance Characteristics
//!
//! - `get`, `at`, `insert`, `erase`, `contains`: expected O(1)
//! - `clear`, shrinking `set_capacity`, iteration, `dump`: O(n)
//! - Entries live in one slab; no per-entry allocation
//! - Room for `capacity + 1` entries is reserved up front, since an insert
//!   links the new entry before evicting the old one
//!
//! # Recency Rules
//!
//! | Operation | Promotes? |
//! |-----------|-----------|
//! | `get`, `at`, `get_mut`, `find` | yes, on hit |
//! | `insert` | yes, the inserted or updated key |
//! | `contains`, `count`, `peek_mru`, `peek_lru` | no |
//! | `iter`, `dump` | no |
//!
//! # Thread Safety
//!
//! This implementation is not thread-safe, and lookups mutate recency state,
//! so even readers need exclusive access. Wrap the cache in a `Mutex` to share
//! it between threads.

extern crate alloc;

use crate::config::LruCacheConfig;
use crate::error::{Error, Result};
use crate::list::{self, Handle, List};
use crate::metrics::{CacheMetrics, LruCacheMetrics};
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use core::borrow::Borrow;
use core::fmt::{self, Display, Write};
use core::hash::{BuildHasher, Hash};
use core::iter::FusedIterator;
use core::mem;
use hashbrown::{DefaultHashBuilder, HashTable};
use tracing::{debug, trace};

/// A cached pair, with the key's hash kept so the index can rehash without
/// touching the key.
struct Node<K, V> {
    key: K,
    value: V,
    hash: u64,
}

/// An implementation of a Least Recently Used (LRU) cache.
///
/// The cache holds at most [`cap`](LruCache::cap) entries. Inserting a new key
/// into a full cache evicts the entry that was used least recently.
///
/// # Examples
///
/// ```
/// use recency_cache::LruCache;
///
/// let mut cache = LruCache::new(2);
///
/// cache.insert("apple", 1);
/// cache.insert("banana", 2);
///
/// // Accessing an entry makes it the most recently used.
/// assert_eq!(cache.get(&"apple"), Ok(1));
///
/// // Going over capacity evicts the least recently used entry.
/// cache.insert("cherry", 3);
/// assert!(!cache.contains(&"banana"));
/// assert!(cache.contains(&"apple"));
/// assert!(cache.contains(&"cherry"));
/// ```
pub struct LruCache<K, V, S = DefaultHashBuilder> {
    config: LruCacheConfig,
    list: List<Node<K, V>>,
    map: HashTable<Handle>,
    hash_builder: S,
    metrics: LruCacheMetrics,
}

impl<K: Hash + Eq, V> LruCache<K, V> {
    /// Creates an empty cache that holds at most `cap` entries.
    ///
    /// A capacity of zero is allowed; such a cache never retains anything.
    pub fn new(cap: usize) -> LruCache<K, V, DefaultHashBuilder> {
        LruCache::with_hasher(cap, DefaultHashBuilder::default())
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> LruCache<K, V, S> {
    /// Creates an empty cache with the given capacity and hash builder.
    pub fn with_hasher(cap: usize, hash_builder: S) -> Self {
        Self::from_parts(LruCacheConfig::new(cap), hash_builder)
    }

    /// Creates a cache from a configuration.
    ///
    /// Passing `None` for `hash_builder` uses `S::default()`.
    ///
    /// ```
    /// use recency_cache::config::LruCacheConfig;
    /// use recency_cache::LruCache;
    ///
    /// let cache: LruCache<u64, String> = LruCache::init(LruCacheConfig { capacity: 16 }, None);
    /// assert_eq!(cache.cap(), 16);
    /// ```
    pub fn init(config: LruCacheConfig, hash_builder: Option<S>) -> Self
    where
        S: Default,
    {
        Self::from_parts(config, hash_builder.unwrap_or_default())
    }

    fn from_parts(config: LruCacheConfig, hash_builder: S) -> Self {
        let slots = config.capacity.saturating_add(1);
        LruCache {
            config,
            list: List::with_capacity(slots),
            map: HashTable::with_capacity(slots),
            hash_builder,
            metrics: LruCacheMetrics::new(),
        }
    }

    /// Returns the maximum number of entries the cache will hold.
    #[inline]
    pub fn cap(&self) -> usize {
        self.config.capacity
    }

    /// Returns the current configuration.
    #[inline]
    pub fn config(&self) -> LruCacheConfig {
        self.config
    }

    /// Returns the number of entries in the cache.
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the cache holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Returns the largest number of entries this cache could ever address.
    ///
    /// This is a theoretical ceiling derived from the entry layout, not a
    /// promise that that much memory is available.
    pub fn max_size(&self) -> usize {
        List::<Node<K, V>>::max_len()
    }

    /// Changes the capacity, evicting least recently used entries until the
    /// cache fits.
    ///
    /// ```
    /// use recency_cache::LruCache;
    ///
    /// let mut cache = LruCache::new(3);
    /// cache.insert(1, "one");
    /// cache.insert(2, "two");
    /// cache.insert(3, "three");
    ///
    /// cache.set_capacity(1);
    /// assert_eq!(cache.len(), 1);
    /// assert!(cache.contains(&3));
    /// ```
    pub fn set_capacity(&mut self, cap: usize) {
        let old = self.config.capacity;
        self.config.capacity = cap;
        let before = self.len();
        if cap > old {
            let additional = cap.saturating_add(1).saturating_sub(before);
            self.list.reserve(additional);
            let list = &self.list;
            self.map
                .reserve(additional, |&h| list.get_value(h).map_or(0, |n| n.hash));
        }
        self.evict_overflow();
        debug!(
            old_capacity = old,
            new_capacity = cap,
            evicted = before - self.len(),
            "cache capacity changed"
        );
    }

    /// Returns `true` if `key` is in the cache.
    ///
    /// This is a pure membership test: it does not change recency order.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find_handle(key).is_some()
    }

    /// Returns `1` if `key` is in the cache and `0` otherwise.
    ///
    /// Like [`contains`](LruCache::contains), this does not change recency order.
    pub fn count<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        usize::from(self.contains(key))
    }

    fn find_handle<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find_hashed(self.hash_builder.hash_one(key), key)
    }

    fn find_hashed<Q>(&self, hash: u64, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        self.map
            .find(hash, |&h| {
                self.list
                    .get_value(h)
                    .is_some_and(|node| key.eq(node.key.borrow()))
            })
            .copied()
    }

    /// Looks up the handle for `key`, promotes it, and records the outcome.
    fn touch<Q>(&mut self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match self.find_handle(key) {
            Some(handle) => {
                self.list.move_to_front(handle);
                self.metrics.record_hit();
                Some(handle)
            }
            None => {
                self.metrics.record_miss();
                None
            }
        }
    }

    /// Returns a reference to the value for `key` and marks it most recently used.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the key is absent. The cache is left
    /// untouched in that case.
    pub fn at<Q>(&mut self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let handle = self.touch(key).ok_or(Error::KeyNotFound)?;
        self.list
            .get_value(handle)
            .map(|node| &node.value)
            .ok_or(Error::KeyNotFound)
    }

    /// Returns a copy of the value for `key` and marks it most recently used.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the key is absent.
    pub fn get<Q>(&mut self, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Clone,
    {
        self.at(key).cloned()
    }

    /// Returns a mutable reference to the value for `key` and marks it most
    /// recently used.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the key is absent.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let handle = self.touch(key).ok_or(Error::KeyNotFound)?;
        self.list
            .get_value_mut(handle)
            .map(|node| &mut node.value)
            .ok_or(Error::KeyNotFound)
    }

    /// Looks up `key`, marking it most recently used, and returns the stored
    /// key and value. Returns `None` if the key is absent.
    pub fn find<Q>(&mut self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let handle = self.touch(key)?;
        self.list
            .get_value(handle)
            .map(|node| (&node.key, &node.value))
    }

    /// Returns the most recently used entry without touching recency order.
    pub fn peek_mru(&self) -> Option<(&K, &V)> {
        self.list
            .head()
            .and_then(|handle| self.list.get_value(handle))
            .map(|node| (&node.key, &node.value))
    }

    /// Returns the least recently used entry, the next one to be evicted,
    /// without touching recency order.
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        self.list
            .tail()
            .and_then(|handle| self.list.get_value(handle))
            .map(|node| (&node.key, &node.value))
    }

    /// Removes `key` from the cache, returning its value if it was present.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.hash_builder.hash_one(key);
        let indexed = self
            .map
            .find_entry(hash, |&h| {
                self.list
                    .get_value(h)
                    .is_some_and(|node| key.eq(node.key.borrow()))
            })
            .ok()?;
        let (handle, _) = indexed.remove();
        let node = self.list.remove(handle)?;
        self.metrics.record_removal();
        Some(node.value)
    }

    /// Removes `key` from the cache. Returns `1` if it was present, `0` otherwise.
    ///
    /// Erasing an absent key changes nothing, so repeated calls are harmless.
    pub fn erase<Q>(&mut self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        usize::from(self.remove(key).is_some())
    }

    /// Removes every entry. Capacity and metrics are kept.
    pub fn clear(&mut self) {
        let dropped = self.len();
        self.map.clear();
        self.list.clear();
        debug!(dropped, "cache cleared");
    }

    /// Iterates over the entries from most to least recently used.
    ///
    /// Iteration is observation only: nothing is promoted.
    ///
    /// ```
    /// use recency_cache::LruCache;
    ///
    /// let mut cache = LruCache::new(3);
    /// cache.insert("a", 1);
    /// cache.insert("b", 2);
    /// cache.insert("c", 3);
    ///
    /// let keys: Vec<_> = cache.iter().map(|(k, _)| *k).collect();
    /// assert_eq!(keys, ["c", "b", "a"]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.list.iter(),
        }
    }

    /// Drops least recently used entries until `len() <= cap()`.
    ///
    /// Returns the last entry evicted, if any.
    fn evict_overflow(&mut self) -> Option<(K, V)> {
        let mut evicted = None;
        while self.map.len() > self.config.capacity {
            match self.evict_lru() {
                Some(entry) => evicted = Some(entry),
                None => break,
            }
        }
        evicted
    }

    fn evict_lru(&mut self) -> Option<(K, V)> {
        let handle = self.list.tail()?;
        let node = self.list.remove(handle)?;
        if let Ok(indexed) = self.map.find_entry(node.hash, |&h| h == handle) {
            indexed.remove();
        }
        self.metrics.record_eviction();
        trace!(len = self.map.len(), "evicted least recently used entry");
        Some((node.key, node.value))
    }

    /// Resets all usage counters to zero.
    pub fn reset_metrics(&mut self) {
        self.metrics = LruCacheMetrics::new();
    }

    /// Returns the raw usage counters.
    pub fn lru_metrics(&self) -> &LruCacheMetrics {
        &self.metrics
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> LruCache<K, V, S> {
    /// Inserts or updates `key`, making it the most recently used entry.
    ///
    /// - If `key` is already present its value is replaced and the previous
    ///   pair is returned. Nothing is evicted.
    /// - Otherwise the pair is added and, if that takes the cache over
    ///   capacity, least recently used entries are evicted. The last evicted
    ///   pair is returned. With a capacity of zero this is the pair that was
    ///   just inserted.
    ///
    /// ```
    /// use recency_cache::LruCache;
    ///
    /// let mut cache = LruCache::new(1);
    /// assert_eq!(cache.insert("a", 1), None);
    /// assert_eq!(cache.insert("a", 2), Some(("a", 1)));
    /// assert_eq!(cache.insert("b", 3), Some(("a", 2)));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<(K, V)> {
        let hash = self.hash_builder.hash_one(&key);
        if let Some(handle) = self.find_hashed(hash, &key) {
            self.list.move_to_front(handle);
            self.metrics.record_update();
            let node = self.list.get_value_mut(handle)?;
            let old = mem::replace(&mut node.value, value);
            return Some((key, old));
        }

        // Grow both structures before linking so a failed allocation leaves
        // the cache as it was.
        let list = &self.list;
        self.map
            .reserve(1, |&h| list.get_value(h).map_or(0, |n| n.hash));
        self.list.reserve(1);
        let handle = self.list.add(Node { key, value, hash });
        let list = &self.list;
        self.map
            .insert_unique(hash, handle, |&h| list.get_value(h).map_or(0, |n| n.hash));
        self.metrics.record_insertion();

        self.evict_overflow()
    }
}

impl<K, V, S> LruCache<K, V, S>
where
    K: Hash + Eq + Display,
    V: Display,
    S: BuildHasher,
{
    /// Renders the cache for diagnostics, one `K:<key> V: <value>` line per
    /// entry from most to least recently used.
    ///
    /// ```
    /// use recency_cache::LruCache;
    ///
    /// let mut cache = LruCache::new(2);
    /// cache.insert("x", 1);
    /// cache.insert("y", 2);
    /// assert_eq!(cache.dump(), "K:y V: 2\nK:x V: 1\n");
    /// ```
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for (key, value) in self.iter() {
            // Writing into a String cannot fail.
            let _ = writeln!(out, "K:{key} V: {value}");
        }
        out
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> CacheMetrics for LruCache<K, V, S> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        let mut metrics = self.metrics.metrics();
        metrics.insert("len".to_string(), self.len() as f64);
        metrics.insert("capacity".to_string(), self.cap() as f64);
        metrics
    }

    fn algorithm_name(&self) -> &'static str {
        self.metrics.algorithm_name()
    }
}

impl<K, V, S> fmt::Debug for LruCache<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("capacity", &self.config.capacity)
            .field("len", &self.list.len())
            .finish()
    }
}

impl<'a, K: Hash + Eq, V, S: BuildHasher> IntoIterator for &'a LruCache<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<K, V, S> IntoIterator for LruCache<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    /// Consumes the cache, yielding entries from most to least recently used.
    fn into_iter(self) -> IntoIter<K, V> {
        IntoIter { list: self.list }
    }
}

/// Iterator over `(&K, &V)` pairs from most to least recently used.
///
/// Created by [`LruCache::iter`]. Walking it backwards with `.rev()` goes from
/// least to most recently used.
pub struct Iter<'a, K, V> {
    inner: list::Iter<'a, Node<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<(&'a K, &'a V)> {
        self.inner.next().map(|node| (&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<(&'a K, &'a V)> {
        self.inner
            .next_back()
            .map(|node| (&node.key, &node.value))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

impl<K, V> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("remaining", &self.inner.len())
            .finish()
    }
}

/// Owning iterator over `(K, V)` pairs from most to least recently used.
///
/// Created by calling `into_iter` on an [`LruCache`].
pub struct IntoIter<K, V> {
    list: List<Node<K, V>>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        self.list.remove_first().map(|node| (node.key, node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len(), Some(self.list.len()))
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<(K, V)> {
        self.list.remove_last().map(|node| (node.key, node.value))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K, V> fmt::Debug for IntoIter<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntoIter")
            .field("remaining", &self.list.len())
            .finish()
    }
}
