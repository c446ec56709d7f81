//! # Least Recently Used (LRU) Cache Engine
//!
//! Capacity-bounded key→value mapping with strict recency ordering, built on
//! a preallocated [`SlotRing`] instead of per-operation heap allocation.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────┐
//!   │                       LruCache<K, V, H>                          │
//!   │                                                                  │
//!   │   ┌────────────────────────────────────────────────────────────┐ │
//!   │   │  FxHashMap<K, usize> (index into the slot ring)            │ │
//!   │   │                                                            │ │
//!   │   │  ┌─────────┬──────────────────────────────────────────┐    │ │
//!   │   │  │   Key   │  slot index                              │    │ │
//!   │   │  ├─────────┼──────────────────────────────────────────┤    │ │
//!   │   │  │  "a"    │  ────────────────────────────────┐       │    │ │
//!   │   │  │  "b"    │  ──────────────────────────┐     │       │    │ │
//!   │   │  └─────────┴────────────────────────────┼─────┼───────┘    │ │
//!   │   └──────────────────────────────────────── ┼─────┼────────────┘ │
//!   │                                             │     │              │
//!   │   ┌─────────────────────────────────────────┼─────┼────────────┐ │
//!   │   │  SlotRing<K, V> (recency order)         ▼     ▼            │ │
//!   │   │                                                            │ │
//!   │   │  head ──► [b] ◄──► [a] ◄──► [·] ◄──► [·] ◄── (circular)    │ │
//!   │   │           MRU               └─ empty run at the tail ─┘    │ │
//!   │   └────────────────────────────────────────────────────────────┘ │
//!   │                                                                  │
//!   │   H: EvictionHook — observes capacity-pressure removals          │
//!   └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations Flow
//!
//! ```text
//!   INSERT new key (cache full)
//!   ═══════════════════════════════════════════════════════════════════
//!   Before:  head ──► [A] ◄──► [B] ◄──► [C] ◄── tail    (capacity = 3)
//!
//!   insert(D):
//!     1. tail slot [C] is occupied → hook.on_evict(C)   (may refuse)
//!     2. drop C's index entry, reuse the slot for D
//!     3. head ← tail slot (already adjacent; pure head update)
//!
//!   After:   head ──► [D] ◄──► [A] ◄──► [B] ◄── tail
//!   ═══════════════════════════════════════════════════════════════════
//!
//!   INSERT new key (cache not full): the tail slot is empty by the ring
//!   invariant, so the same two steps apply with no eviction.
//!
//!   DELETE: empty the slot, then park it at the tail so empty slots stay
//!   clustered directly before head.
//! ```
//!
//! ## Method Summary
//!
//! | Method           | Complexity       | Recency effect            |
//! |------------------|------------------|---------------------------|
//! | `insert(k, v)`   | O(1), may evict  | entry → MRU               |
//! | `get(&k)`        | O(1)             | entry → MRU               |
//! | `peek(&k)`       | O(1)             | none                      |
//! | `contains(&k)`   | O(1)             | none                      |
//! | `touch(&k)`      | O(1)             | entry → MRU               |
//! | `remove(&k)`     | O(1)             | slot freed to tail        |
//! | `resize(n)`      | O(k) for k slots | evicts LRU-first on shrink|
//! | `clear()`        | O(capacity)      | everything dropped        |
//! | `iter()`         | O(len)           | none                      |
//! | `peek_lru()`     | O(capacity − len)| none                      |
//!
//! The engine is single-threaded by contract; wrap it in external mutual
//! exclusion if it must be shared.
//!
//! ## Example
//!
//! ```
//! use ringcache::policy::lru::LruCache;
//!
//! let mut cache: LruCache<u32, &str> = LruCache::new(2);
//! cache.put(1, "alpha");
//! cache.put(2, "beta");
//!
//! assert_eq!(cache.get(&1), Some(&"alpha")); // 1 becomes MRU
//! cache.put(3, "gamma");                     // evicts 2, the LRU
//! assert!(!cache.contains(&2));
//!
//! let keys: Vec<u32> = cache.keys().copied().collect();
//! assert_eq!(keys, vec![3, 1]);
//! ```

use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::slot_ring::{OccupiedIter, SlotRing};
use crate::error::CacheError;
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::LruMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::LruMetricsSnapshot;
use crate::traits::{CoreCache, EvictionHook, MutableCache, NoHook};

/// Fixed-capacity LRU cache over a preallocated slot ring.
///
/// Keys are cloned into the lookup index, so `K` is expected to be cheap to
/// clone (integers, small strings, interned ids). Values are stored once,
/// in the ring.
///
/// `H` is the eviction hook, fixed at construction; the default [`NoHook`]
/// makes eviction infallible and lets [`put`](LruCache::put) hide the
/// `Result`.
pub struct LruCache<K, V, H = NoHook> {
    ring: SlotRing<K, V>,
    index: FxHashMap<K, usize>,
    hook: H,
    #[cfg(feature = "metrics")]
    metrics: LruMetrics,
}

impl<K, V> LruCache<K, V, NoHook>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache with the given capacity and no eviction hook.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero; a zero-slot ring is invalid. Use
    /// [`CacheBuilder::try_build`](crate::builder::CacheBuilder::try_build)
    /// to validate untrusted capacities without panicking.
    pub fn new(capacity: usize) -> Self {
        Self::with_hook(capacity, NoHook)
    }

    /// Inserts a key-value pair, returning the previous value if the key
    /// existed. Infallible counterpart of [`insert`](LruCache::insert) for
    /// hook-free caches.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        match self.insert(key, value) {
            Ok(previous) => previous,
            Err(never) => match never {},
        }
    }
}

impl<K, V, H> LruCache<K, V, H>
where
    K: Eq + Hash + Clone,
    H: EvictionHook<K, V>,
{
    /// Creates a cache with the given capacity and eviction hook.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_hook(capacity: usize, hook: H) -> Self {
        assert!(capacity >= 1, "LruCache requires capacity >= 1");
        LruCache {
            ring: SlotRing::new(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            hook,
            #[cfg(feature = "metrics")]
            metrics: LruMetrics::default(),
        }
    }

    /// Inserts a key-value pair; the entry becomes most recently used.
    ///
    /// Returns the previous value when overwriting an existing key. For a
    /// new key in a full cache, the least recently used entry is evicted
    /// through the hook first; if the hook fails, the cache is unchanged
    /// and the error is returned.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>, H::Error> {
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_call();

        if let Some(&idx) = self.index.get(&key) {
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_update();

            let previous = self
                .ring
                .value_mut(idx)
                .map(|slot_value| std::mem::replace(slot_value, value));
            debug_assert!(previous.is_some(), "indexed slot must be occupied");
            self.ring.promote(idx);
            self.debug_validate();
            return Ok(previous);
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_insert_new();

        // The tail slot is the reuse candidate in both cases: the LRU entry
        // when full, the next empty slot otherwise (ring invariant).
        let tail = self.ring.tail_index();
        if let Some((evicted_key, evicted_value)) = self.ring.entry(tail) {
            #[cfg(feature = "metrics")]
            self.metrics.record_evict_call();
            self.hook.on_evict(evicted_key, evicted_value)?;
        }
        if let Some((evicted_key, _)) = self.ring.take(tail) {
            self.index.remove(&evicted_key);
            #[cfg(feature = "metrics")]
            self.metrics.record_evicted_entry();
        }

        self.ring.fill(tail, key.clone(), value);
        self.index.insert(key, tail);
        // The tail directly precedes head, so promotion is a pure head
        // update with no relinking.
        self.ring.promote(tail);
        self.debug_validate();
        Ok(None)
    }

    /// Looks up a value and promotes its entry to most recently used.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let idx = match self.index.get(key) {
            Some(&idx) => idx,
            None => {
                #[cfg(feature = "metrics")]
                self.metrics.record_get_miss();
                return None;
            }
        };
        #[cfg(feature = "metrics")]
        self.metrics.record_get_hit();

        self.ring.promote(idx);
        self.ring.entry(idx).map(|(_, value)| value)
    }

    /// Looks up a value without affecting recency order.
    pub fn peek(&self, key: &K) -> Option<&V> {
        #[cfg(feature = "metrics")]
        self.metrics.record_peek_call();

        let &idx = self.index.get(key)?;
        #[cfg(feature = "metrics")]
        self.metrics.record_peek_found();
        self.ring.entry(idx).map(|(_, value)| value)
    }

    /// Checks membership without affecting recency order.
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Marks an entry as recently used without retrieving the value.
    ///
    /// Returns `true` if the key was found.
    pub fn touch(&mut self, key: &K) -> bool {
        #[cfg(feature = "metrics")]
        self.metrics.record_touch_call();

        if let Some(&idx) = self.index.get(key) {
            #[cfg(feature = "metrics")]
            self.metrics.record_touch_found();
            self.ring.promote(idx);
            true
        } else {
            false
        }
    }

    /// Removes a key-value pair, returning the value if the key existed.
    ///
    /// The freed slot is parked at the tail so it is reused before any
    /// occupied slot. Never invokes the eviction hook.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let idx = self.index.remove(key)?;
        let entry = self.ring.take(idx);
        debug_assert!(entry.is_some(), "indexed slot must be occupied");
        self.ring.demote(idx);
        self.debug_validate();
        entry.map(|(_, value)| value)
    }

    /// Changes the capacity to `new_capacity`.
    ///
    /// Growing links fresh empty slots at the tail. Shrinking removes tail
    /// slots one by one: empty slots first (by the ring invariant they sit
    /// at the tail), then occupied entries least-recently-used first, each
    /// surfaced through the eviction hook before its slot is discarded.
    /// Shrinking below the current entry count simply evicts the excess.
    ///
    /// A hook failure stops the shrink at that entry; slots already removed
    /// stay removed and the cache remains consistent at its intermediate
    /// capacity.
    pub fn resize(&mut self, new_capacity: usize) -> Result<(), CacheError<H::Error>> {
        if new_capacity == 0 {
            return Err(CacheError::ZeroCapacity);
        }
        let current = self.ring.capacity();
        if new_capacity >= current {
            self.ring.grow(new_capacity - current);
        } else {
            for _ in 0..(current - new_capacity) {
                let tail = self.ring.tail_index();
                if let Some((evicted_key, evicted_value)) = self.ring.entry(tail) {
                    #[cfg(feature = "metrics")]
                    self.metrics.record_evict_call();
                    self.hook
                        .on_evict(evicted_key, evicted_value)
                        .map_err(CacheError::Evict)?;
                }
                if let Some((evicted_key, _)) = self.ring.take(tail) {
                    self.index.remove(&evicted_key);
                    #[cfg(feature = "metrics")]
                    self.metrics.record_evicted_entry();
                }
                self.ring.shrink_tail();
            }
        }
        self.debug_validate();
        Ok(())
    }

    /// Drops every entry; capacity and slot links are untouched.
    ///
    /// Does not invoke the eviction hook: a bulk clear is not a sequence of
    /// evictions, and callers needing persistence sync beforehand.
    pub fn clear(&mut self) {
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();

        self.ring.clear_entries();
        self.index.clear();
        self.debug_validate();
    }

    /// Current number of entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    /// Iterates entries from most to least recently used.
    ///
    /// The iterator borrows the cache, so the borrow checker rules out
    /// mutation while an iteration is in progress.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.ring.iter_occupied(self.index.len()),
        }
    }

    /// Iterates keys from most to least recently used.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    /// Iterates values from most to least recently used.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }

    /// The least recently used entry, without affecting order.
    ///
    /// Walks backward past the empty run at the tail, so the cost is
    /// O(capacity − len); O(1) for a full cache.
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        if self.index.is_empty() {
            return None;
        }
        let mut idx = self.ring.tail_index();
        let mut steps = self.ring.capacity();
        while steps > 0 {
            if let Some(entry) = self.ring.entry(idx) {
                return Some(entry);
            }
            idx = self.ring.prev_index(idx);
            steps -= 1;
        }
        None
    }

    fn debug_validate(&self) {
        #[cfg(debug_assertions)]
        self.ring.debug_validate(self.index.len());
    }
}

#[cfg(feature = "metrics")]
impl<K, V, H> LruCache<K, V, H>
where
    K: Eq + Hash + Clone,
    H: EvictionHook<K, V>,
{
    /// Snapshot of the per-operation counters plus current gauges.
    pub fn metrics_snapshot(&self) -> LruMetricsSnapshot {
        self.metrics.snapshot(self.index.len(), self.ring.capacity())
    }
}

#[cfg(feature = "metrics")]
impl<K, V, H> crate::metrics::traits::MetricsSnapshotProvider<LruMetricsSnapshot>
    for LruCache<K, V, H>
where
    K: Eq + Hash + Clone,
    H: EvictionHook<K, V>,
{
    fn snapshot(&self) -> LruMetricsSnapshot {
        self.metrics_snapshot()
    }
}

impl<K, V, H> CoreCache<K, V> for LruCache<K, V, H>
where
    K: Eq + Hash + Clone,
    H: EvictionHook<K, V>,
{
    type EvictError = H::Error;

    fn insert(&mut self, key: K, value: V) -> Result<Option<V>, H::Error> {
        LruCache::insert(self, key, value)
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        LruCache::get(self, key)
    }

    fn peek(&self, key: &K) -> Option<&V> {
        LruCache::peek(self, key)
    }

    fn contains(&self, key: &K) -> bool {
        LruCache::contains(self, key)
    }

    fn len(&self) -> usize {
        LruCache::len(self)
    }

    fn capacity(&self) -> usize {
        LruCache::capacity(self)
    }

    fn clear(&mut self) {
        LruCache::clear(self)
    }
}

impl<K, V, H> MutableCache<K, V> for LruCache<K, V, H>
where
    K: Eq + Hash + Clone,
    H: EvictionHook<K, V>,
{
    fn remove(&mut self, key: &K) -> Option<V> {
        LruCache::remove(self, key)
    }
}

impl<K, V, H> fmt::Debug for LruCache<K, V, H>
where
    K: Eq + Hash + Clone,
    H: EvictionHook<K, V>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish_non_exhaustive()
    }
}

impl<K, V> Default for LruCache<K, V, NoHook>
where
    K: Eq + Hash + Clone,
{
    /// Creates an LRU cache with a default capacity of 16.
    fn default() -> Self {
        Self::new(16)
    }
}

impl<K, V> Extend<(K, V)> for LruCache<K, V, NoHook>
where
    K: Eq + Hash + Clone,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

/// Iterator over cache entries, most recently used first.
pub struct Iter<'a, K, V> {
    inner: OccupiedIter<'a, K, V>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}
