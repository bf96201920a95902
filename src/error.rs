//! Error types for cache lookups

use core::fmt;

/// Result type alias for fallible cache operations
pub type Result<T> = core::result::Result<T, Error>;

/// Errors reported by [`LruCache`](crate::LruCache)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Error {
    /// The requested key is not in the cache
    KeyNotFound,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::KeyNotFound => write!(f, "key not found"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
