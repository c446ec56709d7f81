//! Error types for the ringcache library.
//!
//! ## Key Components
//!
//! - [`CacheError`]: Returned by engine operations that validate capacity or
//!   run the eviction hook (`resize`, fallible builds).
//! - [`ManagerError`]: Returned by [`ManagedCache`](crate::manager::ManagedCache)
//!   operations; wraps the backing store's error type.
//!
//! Lookups encode "key absent" as `None` rather than an error: a miss is
//! expected control flow for a cache. The one exception is the manager's
//! `remove`, which reports [`ManagerError::NotFound`] when the key exists in
//! neither the cache nor the store.
//!
//! ## Example Usage
//!
//! ```
//! use ringcache::builder::CacheBuilder;
//!
//! // Fallible constructor for user-configurable parameters
//! let cache = CacheBuilder::new(100).try_build::<u64, String>();
//! assert!(cache.is_ok());
//!
//! // Zero capacity is caught without panicking
//! let bad = CacheBuilder::new(0).try_build::<u64, String>();
//! assert!(bad.is_err());
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// CacheError
// ---------------------------------------------------------------------------

/// Error from engine operations that resize the ring or evict entries.
///
/// `E` is the eviction hook's error type; for the default
/// [`NoHook`](crate::traits::NoHook) it is [`std::convert::Infallible`], so
/// only [`CacheError::ZeroCapacity`] can occur.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheError<E> {
    /// A capacity of zero was requested; the slot ring requires at least
    /// one slot.
    ZeroCapacity,
    /// The eviction hook refused an eviction. The entry that was about to
    /// be evicted is still cached.
    Evict(E),
}

impl<E: fmt::Display> fmt::Display for CacheError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::ZeroCapacity => f.write_str("capacity must be at least 1"),
            CacheError::Evict(err) => write!(f, "eviction hook failed: {err}"),
        }
    }
}

impl<E> std::error::Error for CacheError<E>
where
    E: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CacheError::ZeroCapacity => None,
            CacheError::Evict(err) => Some(err),
        }
    }
}

// ---------------------------------------------------------------------------
// ManagerError
// ---------------------------------------------------------------------------

/// Error from managed-cache operations.
///
/// `E` is the backing store's error type. Store failures surface unchanged,
/// whether they came from a direct store call or from a write-back flush
/// triggered by an eviction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManagerError<E> {
    /// `remove` found the key in neither the cache nor the store.
    NotFound,
    /// A capacity of zero was requested on `resize`.
    ZeroCapacity,
    /// The backing store reported a failure.
    Store(E),
}

impl<E: fmt::Display> fmt::Display for ManagerError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManagerError::NotFound => f.write_str("key not found in cache or store"),
            ManagerError::ZeroCapacity => f.write_str("capacity must be at least 1"),
            ManagerError::Store(err) => write!(f, "backing store failed: {err}"),
        }
    }
}

impl<E> std::error::Error for ManagerError<E>
where
    E: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ManagerError::Store(err) => Some(err),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
