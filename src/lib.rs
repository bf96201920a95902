#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Code Reference
//!
//! ## How It Works
//!
//! ```text
//!    index: HashTable<Handle>
//!    ┌─────┬─────┬─────┐
//!    │  a  │  b  │  c  │
//!    └──┬──┴──┬──┴──┬──┘
//!       │     │     │
//!       ▼     ▼     ▼
//!  head ──▶ [c] ◀──▶ [a] ◀──▶ [b] ◀── tail
//!           MRU                LRU
//! ```
//!
//! The index locates an entry; the recency list records the order of use.
//! Every keyed access moves the entry to the head, and eviction always takes
//! the tail. The list keeps its nodes in a `slab` and links them by slab key,
//! and the index stores only those keys, hashing through the key held in the
//! node. Each key is therefore stored once and the crate is free of `unsafe`.
//!
//! ## Access vs. Observation
//!
//! - [`LruCache::get`], [`LruCache::at`], [`LruCache::get_mut`],
//!   [`LruCache::find`] and [`LruCache::insert`] count as uses and promote
//!   the entry.
//! - [`LruCache::contains`], [`LruCache::count`], [`LruCache::iter`] and
//!   [`LruCache::dump`] only observe and leave the order alone.
//!
//! ## Features
//!
//! - `std`: implement `std::error::Error` for [`Error`].
//! - `nightly`: forward `hashbrown/nightly`.
//!
//! ## Modules
//!
//! - [`lru`]: the cache itself and its iterators
//! - [`config`]: configuration structures
//! - [`error`]: the lookup error type
//! - [`metrics`]: usage counters

#![no_std]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

/// Slab-backed doubly linked list that records recency order.
///
/// Internal infrastructure: the cache pairs it with its key index and keeps
/// both in step.
pub(crate) mod list;

/// Cache configuration structures.
pub mod config;

/// Error and result types.
pub mod error;

/// Least Recently Used (LRU) cache implementation.
pub mod lru;

/// Cache usage counters and the [`CacheMetrics`](metrics::CacheMetrics)
/// reporting trait.
pub mod metrics;

pub use config::LruCacheConfig;
pub use error::{Error, Result};
pub use lru::{IntoIter, Iter, LruCache};
pub use metrics::{CacheMetrics, LruCacheMetrics};
