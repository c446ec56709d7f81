//! # Cache Trait Hierarchy
//!
//! This module defines the trait hierarchy for the cache subsystem: a core
//! mapping contract shared by recency-ordered caches, an extension for
//! arbitrary key removal, and the eviction-hook capability interface used to
//! observe capacity-pressure removals.
//!
//! ## Architecture
//!
//! ```text
//!                ┌─────────────────────────────────────────┐
//!                │            CoreCache<K, V>              │
//!                │                                         │
//!                │  insert(&mut, K, V) → Result<Option<V>> │
//!                │  get(&mut, &K) → Option<&V>             │
//!                │  peek(&, &K) → Option<&V>               │
//!                │  contains(&, &K) → bool                 │
//!                │  len(&) / is_empty(&) / capacity(&)     │
//!                │  clear(&mut)                            │
//!                └──────────────────┬──────────────────────┘
//!                                   │
//!                                   ▼
//!                ┌─────────────────────────────────────────┐
//!                │          MutableCache<K, V>             │
//!                │                                         │
//!                │  remove(&K) → Option<V>                 │
//!                └─────────────────────────────────────────┘
//!
//!   Orthogonal capability (fixed at construction):
//!                ┌─────────────────────────────────────────┐
//!                │          EvictionHook<K, V>             │
//!                │                                         │
//!                │  on_evict(&mut, &K, &V) → Result<()>    │
//!                └─────────────────────────────────────────┘
//! ```
//!
//! ## Contract Notes
//!
//! | Operation  | Affects recency order | Can fail            |
//! |------------|-----------------------|---------------------|
//! | `insert`   | yes (entry → MRU)     | hook failure        |
//! | `get`      | yes (entry → MRU)     | no (`None` on miss) |
//! | `peek`     | no                    | no                  |
//! | `contains` | no                    | no                  |
//! | `remove`   | frees the slot        | no                  |
//! | `clear`    | resets everything     | no                  |
//!
//! The hook is an explicit capability rather than a probed attribute: caches
//! are parameterized by an `EvictionHook` implementation and [`NoHook`] is
//! the zero-cost default whose error type is uninhabited.

use std::convert::Infallible;

/// Core mapping operations shared by the recency-ordered caches.
///
/// # Example
///
/// ```
/// use ringcache::policy::lru::LruCache;
/// use ringcache::traits::CoreCache;
///
/// fn warm_cache<C: CoreCache<u64, String>>(cache: &mut C, data: &[(u64, String)]) {
///     for (key, value) in data {
///         let _ = cache.insert(*key, value.clone());
///     }
/// }
///
/// let mut cache = LruCache::new(100);
/// warm_cache(&mut cache, &[(1, "one".to_string()), (2, "two".to_string())]);
/// assert_eq!(cache.len(), 2);
/// ```
pub trait CoreCache<K, V> {
    /// Error produced when an insert forces an eviction and the hook fails.
    type EvictError;

    /// Inserts a key-value pair, returning the previous value if the key
    /// already existed. The entry becomes most recently used.
    ///
    /// A full cache evicts its least recently used entry first; the hook
    /// observes that eviction and may fail, in which case the cache is
    /// unchanged.
    fn insert(&mut self, key: K, value: V) -> Result<Option<V>, Self::EvictError>;

    /// Looks up a value and promotes its entry to most recently used.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Looks up a value without affecting recency order.
    fn peek(&self, key: &K) -> Option<&V>;

    /// Checks membership without affecting recency order.
    fn contains(&self, key: &K) -> bool;

    /// Current number of entries.
    fn len(&self) -> usize;

    /// Returns `true` if the cache holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries.
    fn capacity(&self) -> usize;

    /// Drops every entry. Does not invoke the eviction hook: a bulk clear
    /// is not a sequence of evictions, and callers persist beforehand if
    /// they need to.
    fn clear(&mut self);
}

/// Caches that support arbitrary key-based removal.
///
/// # Example
///
/// ```
/// use ringcache::policy::lru::LruCache;
/// use ringcache::traits::{CoreCache, MutableCache};
///
/// let mut cache = LruCache::new(10);
/// cache.put(1, "value");
///
/// assert_eq!(cache.remove(&1), Some("value"));
/// assert_eq!(cache.remove(&1), None); // already removed
/// ```
pub trait MutableCache<K, V>: CoreCache<K, V> {
    /// Removes a key-value pair, returning the value if the key existed.
    /// Never invokes the eviction hook; an explicit delete is not an
    /// eviction.
    fn remove(&mut self, key: &K) -> Option<V>;
}

/// Observer for entries removed under capacity pressure.
///
/// The hook fires synchronously, exactly once per evicted entry, strictly
/// before that entry's slot is reused or unlinked — and only for removals
/// caused by `insert` or `resize`, never for `remove` or `clear`. If the
/// hook returns an error, the triggering operation fails and the entry
/// stays cached.
///
/// Closures are adapted through [`HookFn`]:
///
/// ```
/// use std::cell::RefCell;
/// use std::convert::Infallible;
/// use std::rc::Rc;
/// use ringcache::policy::lru::LruCache;
/// use ringcache::traits::HookFn;
///
/// let evicted = Rc::new(RefCell::new(Vec::new()));
/// let log = Rc::clone(&evicted);
/// let hook = HookFn(move |key: &u64, value: &&'static str| -> Result<(), Infallible> {
///     log.borrow_mut().push((*key, *value));
///     Ok(())
/// });
///
/// let mut cache = LruCache::with_hook(1, hook);
/// cache.insert(1, "a").unwrap();
/// cache.insert(2, "b").unwrap(); // evicts key 1 through the hook
/// assert_eq!(*evicted.borrow(), vec![(1, "a")]);
/// ```
pub trait EvictionHook<K, V> {
    /// Failure type surfaced through the triggering `insert`/`resize`.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Called with the entry about to be evicted.
    fn on_evict(&mut self, key: &K, value: &V) -> Result<(), Self::Error>;
}

/// The default hook: observes nothing and cannot fail.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHook;

impl<K, V> EvictionHook<K, V> for NoHook {
    type Error = Infallible;

    #[inline]
    fn on_evict(&mut self, _key: &K, _value: &V) -> Result<(), Infallible> {
        Ok(())
    }
}

/// Adapter that lets a `FnMut(&K, &V) -> Result<(), E>` closure act as an
/// eviction hook. A newtype rather than a blanket impl so that concrete
/// hook types and closures coexist under coherence.
#[derive(Debug, Clone, Copy)]
pub struct HookFn<F>(pub F);

impl<K, V, F, E> EvictionHook<K, V> for HookFn<F>
where
    F: FnMut(&K, &V) -> Result<(), E>,
    E: std::error::Error + Send + Sync + 'static,
{
    type Error = E;

    #[inline]
    fn on_evict(&mut self, key: &K, value: &V) -> Result<(), E> {
        (self.0)(key, value)
    }
}
