//! # Managed Cache: write-through / write-back store layering
//!
//! [`ManagedCache`] presents the same mapping vocabulary as the LRU engine
//! while keeping an external [`Store`] consistent — immediately under
//! write-through, eventually under write-back.
//!
//! ## Architecture
//!
//! ```text
//!   ┌───────────────────────────────────────────────────────────────────┐
//!   │                     ManagedCache<K, V, S>                         │
//!   │                                                                   │
//!   │   ┌─────────────────────────┐     ┌───────────────────────────┐   │
//!   │   │  LruCache<K, V, hook>   │     │  Rc<RefCell<S>> (shared,  │   │
//!   │   │  (fast, bounded)        │     │  not owned: the store     │   │
//!   │   └───────────┬─────────────┘     │  outlives the manager)    │   │
//!   │               │ eviction          └─────────────▲─────────────┘   │
//!   │               ▼                                 │                 │
//!   │   ┌─────────────────────────┐   flush dirty     │                 │
//!   │   │  WriteBackHook          │ ──────────────────┘                 │
//!   │   │  + dirty set (FxHashSet)│   (write-back only)                 │
//!   │   └─────────────────────────┘                                     │
//!   └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Consistency Semantics
//!
//! | Operation  | Write-through                  | Write-back                       |
//! |------------|--------------------------------|----------------------------------|
//! | `insert`   | cache + store, synchronously   | cache + dirty mark               |
//! | `get` miss | fetch from store, fill cache   | same (reads never mark dirty)    |
//! | `remove`   | store (authoritative) + cache  | both sides, found-in-either      |
//! | eviction   | entry dropped (store has it)   | dirty entry flushed via the hook |
//! | `sync`     | no-op (already consistent)     | flush dirty set, maybe batched   |
//! | `flush`    | drop cached entries            | `sync` then drop cached entries  |
//! | crash loss | nothing                        | unflushed dirty values           |
//!
//! Write-back staleness tracking assumes the manager is the store's only
//! writer; write-through makes no such assumption.
//!
//! ## Partial sync failure
//!
//! A per-key `sync` stops on the first store error: keys flushed before the
//! failure have left the dirty set, the failed key and all unattempted keys
//! stay dirty, so a later `sync` retries exactly the unflushed remainder. A
//! failed bulk flush leaves the whole dirty set intact.
//!
//! ## Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use ringcache::manager::{ManagedCache, WritePolicy};
//! use ringcache::store::{HashMapStore, Store};
//!
//! let store = Rc::new(RefCell::new(HashMapStore::new()));
//! let mut cached = ManagedCache::new(Rc::clone(&store), 3, WritePolicy::WriteBack);
//!
//! cached.insert(1u32, "one".to_string()).unwrap();
//! assert!(store.borrow().get(&1).unwrap().is_none()); // not yet durable
//!
//! cached.sync().unwrap();
//! assert_eq!(store.borrow().get(&1).unwrap(), Some("one".to_string()));
//! ```

use std::cell::RefCell;
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

use rustc_hash::FxHashSet;

use crate::error::{CacheError, ManagerError};
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::ManagerMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::ManagerMetricsSnapshot;
use crate::policy::lru::LruCache;
use crate::store::traits::Store;
use crate::traits::{EvictionHook, NoHook};

/// Persistence policy for a [`ManagedCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePolicy {
    /// Every mutation is mirrored to the store synchronously.
    WriteThrough,
    /// Mutations are buffered; the store is updated on eviction or `sync`.
    WriteBack,
}

/// Eviction hook that flushes dirty entries to the store.
///
/// Registered on the manager's internal engine in write-back mode. An
/// evicted entry that is not dirty is simply dropped — the store already
/// holds its value.
pub struct WriteBackHook<K, V, S> {
    store: Rc<RefCell<S>>,
    dirty: Rc<RefCell<FxHashSet<K>>>,
    _values: PhantomData<fn() -> V>,
}

impl<K, V, S> EvictionHook<K, V> for WriteBackHook<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: Store<K, V>,
{
    type Error = S::Error;

    fn on_evict(&mut self, key: &K, value: &V) -> Result<(), S::Error> {
        if self.dirty.borrow().contains(key) {
            // Write first: on failure the entry stays cached and dirty.
            self.store.borrow_mut().set(key.clone(), value.clone())?;
            self.dirty.borrow_mut().remove(key);
        }
        Ok(())
    }
}

enum Mode<K, V, S> {
    Through(LruCache<K, V, NoHook>),
    Back {
        cache: LruCache<K, V, WriteBackHook<K, V, S>>,
        dirty: Rc<RefCell<FxHashSet<K>>>,
    },
}

/// LRU cache layered over an external backing store.
///
/// The store handle is shared (`Rc<RefCell<S>>`): the manager never owns
/// the store, and other parties may hold handles to it. The whole stack is
/// single-threaded by contract.
pub struct ManagedCache<K, V, S> {
    store: Rc<RefCell<S>>,
    mode: Mode<K, V, S>,
    #[cfg(feature = "metrics")]
    metrics: ManagerMetrics,
}

impl<K, V, S> ManagedCache<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: Store<K, V>,
{
    /// Creates a manager over `store` with the given cache capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. Use
    /// [`CacheBuilder::try_manage`](crate::builder::CacheBuilder::try_manage)
    /// to validate untrusted capacities without panicking.
    pub fn new(store: Rc<RefCell<S>>, capacity: usize, policy: WritePolicy) -> Self {
        let mode = match policy {
            WritePolicy::WriteThrough => Mode::Through(LruCache::new(capacity)),
            WritePolicy::WriteBack => {
                let dirty = Rc::new(RefCell::new(FxHashSet::default()));
                let hook = WriteBackHook {
                    store: Rc::clone(&store),
                    dirty: Rc::clone(&dirty),
                    _values: PhantomData,
                };
                Mode::Back {
                    cache: LruCache::with_hook(capacity, hook),
                    dirty,
                }
            }
        };
        ManagedCache {
            store,
            mode,
            #[cfg(feature = "metrics")]
            metrics: ManagerMetrics::default(),
        }
    }

    /// The manager's persistence policy.
    pub fn policy(&self) -> WritePolicy {
        match self.mode {
            Mode::Through(_) => WritePolicy::WriteThrough,
            Mode::Back { .. } => WritePolicy::WriteBack,
        }
    }

    /// Capacity of the internal cache.
    pub fn capacity(&self) -> usize {
        match &self.mode {
            Mode::Through(cache) => cache.capacity(),
            Mode::Back { cache, .. } => cache.capacity(),
        }
    }

    /// Number of entries currently cached (not the logical length).
    pub fn cache_len(&self) -> usize {
        match &self.mode {
            Mode::Through(cache) => cache.len(),
            Mode::Back { cache, .. } => cache.len(),
        }
    }

    /// Whether `key` has an unflushed write. Always `false` under
    /// write-through.
    pub fn is_dirty(&self, key: &K) -> bool {
        match &self.mode {
            Mode::Through(_) => false,
            Mode::Back { dirty, .. } => dirty.borrow().contains(key),
        }
    }

    /// Number of unflushed keys. Always zero under write-through.
    pub fn dirty_len(&self) -> usize {
        match &self.mode {
            Mode::Through(_) => 0,
            Mode::Back { dirty, .. } => dirty.borrow().len(),
        }
    }

    /// Looks up `key`, consulting the cache first and falling back to the
    /// store.
    ///
    /// A store hit is inserted into the cache (promoting it to most
    /// recently used, possibly evicting another entry through the
    /// write-back hook). Reads never mark a key dirty.
    pub fn get(&mut self, key: &K) -> Result<Option<&V>, ManagerError<S::Error>> {
        if self.cache_contains(key) {
            #[cfg(feature = "metrics")]
            self.metrics.record_cache_hit();
            return Ok(self.cache_get(key));
        }
        #[cfg(feature = "metrics")]
        self.metrics.record_cache_miss();

        let fetched = self
            .store
            .borrow()
            .get(key)
            .map_err(ManagerError::Store)?;
        let Some(value) = fetched else {
            return Ok(None);
        };
        self.cache_fill(key.clone(), value)?;
        Ok(self.cache_peek(key))
    }

    /// Writes `key → value`.
    ///
    /// Write-through mirrors the write to the store synchronously;
    /// write-back marks the key dirty instead, making it durable only via
    /// eviction or [`sync`](Self::sync).
    pub fn insert(&mut self, key: K, value: V) -> Result<(), ManagerError<S::Error>> {
        match &mut self.mode {
            Mode::Through(cache) => {
                match cache.insert(key.clone(), value.clone()) {
                    Ok(_) => {}
                    Err(never) => match never {},
                }
                self.store
                    .borrow_mut()
                    .set(key, value)
                    .map_err(ManagerError::Store)?;
                #[cfg(feature = "metrics")]
                self.metrics.record_store_write();
            }
            Mode::Back { cache, dirty } => {
                cache
                    .insert(key.clone(), value)
                    .map_err(ManagerError::Store)?;
                dirty.borrow_mut().insert(key);
            }
        }
        Ok(())
    }

    /// Deletes `key` from the layered mapping.
    ///
    /// Write-through treats the store as authoritative: a store miss is
    /// [`ManagerError::NotFound`] and the cache removal is best-effort.
    /// Write-back removes from cache, dirty set, and store independently
    /// and fails only if the key was found in none of them.
    pub fn remove(&mut self, key: &K) -> Result<(), ManagerError<S::Error>> {
        match &mut self.mode {
            Mode::Through(cache) => {
                let removed = self
                    .store
                    .borrow_mut()
                    .remove(key)
                    .map_err(ManagerError::Store)?;
                if removed.is_none() {
                    return Err(ManagerError::NotFound);
                }
                cache.remove(key);
                Ok(())
            }
            Mode::Back { cache, dirty } => {
                let mut found = cache.remove(key).is_some();
                if found {
                    dirty.borrow_mut().remove(key);
                }
                let removed = self
                    .store
                    .borrow_mut()
                    .remove(key)
                    .map_err(ManagerError::Store)?;
                found |= removed.is_some();
                if found {
                    Ok(())
                } else {
                    Err(ManagerError::NotFound)
                }
            }
        }
    }

    /// Whether `key` is present in the cache or the store. Does not affect
    /// recency order.
    pub fn contains(&self, key: &K) -> Result<bool, ManagerError<S::Error>> {
        if self.cache_contains(key) {
            return Ok(true);
        }
        self.store
            .borrow()
            .contains(key)
            .map_err(ManagerError::Store)
    }

    /// Logical number of entries: store entries plus dirty keys the store
    /// has not seen yet.
    pub fn len(&self) -> Result<usize, ManagerError<S::Error>> {
        let store = self.store.borrow();
        let mut total = store.len().map_err(ManagerError::Store)?;
        if let Mode::Back { dirty, .. } = &self.mode {
            for key in dirty.borrow().iter() {
                if !store.contains(key).map_err(ManagerError::Store)? {
                    total += 1;
                }
            }
        }
        Ok(total)
    }

    /// Returns `true` if the logical mapping holds no entries.
    pub fn is_empty(&self) -> Result<bool, ManagerError<S::Error>> {
        Ok(self.len()? == 0)
    }

    /// Flushes every dirty key's current cached value to the store, then
    /// clears the dirty set. A no-op under write-through.
    ///
    /// Uses the store's bulk write when the store's own cost model prefers
    /// it for the batch size. Per-key flushing stops on the first store
    /// error, leaving the failed key and the unattempted remainder dirty.
    pub fn sync(&mut self) -> Result<(), ManagerError<S::Error>> {
        #[cfg(feature = "metrics")]
        self.metrics.record_sync_call();

        let Mode::Back { cache, dirty } = &mut self.mode else {
            return Ok(());
        };
        let pending: Vec<K> = dirty.borrow().iter().cloned().collect();
        if pending.is_empty() {
            return Ok(());
        }

        let mut store = self.store.borrow_mut();
        if store.prefers_bulk_set(pending.len()) {
            // peek: flushing must not disturb recency order.
            let batch: Vec<(K, V)> = pending
                .iter()
                .filter_map(|key| cache.peek(key).map(|value| (key.clone(), value.clone())))
                .collect();
            #[cfg(feature = "metrics")]
            let flushed = batch.len();
            store.set_bulk(batch).map_err(ManagerError::Store)?;
            dirty.borrow_mut().clear();
            #[cfg(feature = "metrics")]
            self.metrics.record_bulk_sync(flushed);
        } else {
            for key in pending {
                let Some(value) = cache.peek(&key).cloned() else {
                    // A dirty key is always cached; tolerate a broken
                    // invariant by dropping the stale mark.
                    debug_assert!(false, "dirty key missing from cache");
                    dirty.borrow_mut().remove(&key);
                    continue;
                };
                store
                    .set(key.clone(), value)
                    .map_err(ManagerError::Store)?;
                dirty.borrow_mut().remove(&key);
                #[cfg(feature = "metrics")]
                self.metrics.record_synced_key();
            }
        }
        Ok(())
    }

    /// [`sync`](Self::sync), then drops every cached entry.
    ///
    /// The store is untouched beyond the flush; the next `get` repopulates
    /// from it.
    pub fn flush(&mut self) -> Result<(), ManagerError<S::Error>> {
        self.sync()?;
        #[cfg(feature = "metrics")]
        self.metrics.record_flush();
        match &mut self.mode {
            Mode::Through(cache) => cache.clear(),
            Mode::Back { cache, .. } => cache.clear(),
        }
        Ok(())
    }

    /// Empties cache, dirty set, and store.
    pub fn clear(&mut self) -> Result<(), ManagerError<S::Error>> {
        match &mut self.mode {
            Mode::Through(cache) => cache.clear(),
            Mode::Back { cache, dirty } => {
                cache.clear();
                dirty.borrow_mut().clear();
            }
        }
        self.store.borrow_mut().clear().map_err(ManagerError::Store)
    }

    /// Resizes the internal cache. Write-back evictions caused by a shrink
    /// flush through the hook before their slots disappear.
    pub fn resize(&mut self, new_capacity: usize) -> Result<(), ManagerError<S::Error>> {
        match &mut self.mode {
            Mode::Through(cache) => cache.resize(new_capacity).map_err(|err| match err {
                CacheError::ZeroCapacity => ManagerError::ZeroCapacity,
                CacheError::Evict(never) => match never {},
            }),
            Mode::Back { cache, .. } => cache.resize(new_capacity).map_err(|err| match err {
                CacheError::ZeroCapacity => ManagerError::ZeroCapacity,
                CacheError::Evict(store_err) => ManagerError::Store(store_err),
            }),
        }
    }

    /// Keys of the logical mapping: store keys, with dirty keys replacing
    /// their (possibly stale) store entries. Order is store-defined, dirty
    /// keys last.
    pub fn keys(&self) -> Result<Vec<K>, ManagerError<S::Error>> {
        let store = self.store.borrow();
        let mut out = store.keys().map_err(ManagerError::Store)?;
        if let Mode::Back { dirty, .. } = &self.mode {
            let dirty = dirty.borrow();
            out.retain(|key| !dirty.contains(key));
            out.extend(dirty.iter().cloned());
        }
        Ok(out)
    }

    /// Entries of the logical mapping: store entries not shadowed by a
    /// dirty key, plus each dirty key's current cached value.
    pub fn items(&self) -> Result<Vec<(K, V)>, ManagerError<S::Error>> {
        let store = self.store.borrow();
        let mut out = Vec::new();
        match &self.mode {
            Mode::Through(_) => {
                for key in store.keys().map_err(ManagerError::Store)? {
                    if let Some(value) = store.get(&key).map_err(ManagerError::Store)? {
                        out.push((key, value));
                    }
                }
            }
            Mode::Back { cache, dirty } => {
                let dirty = dirty.borrow();
                for key in store.keys().map_err(ManagerError::Store)? {
                    if dirty.contains(&key) {
                        continue;
                    }
                    if let Some(value) = store.get(&key).map_err(ManagerError::Store)? {
                        out.push((key, value));
                    }
                }
                for key in dirty.iter() {
                    if let Some(value) = cache.peek(key) {
                        out.push((key.clone(), value.clone()));
                    }
                }
            }
        }
        Ok(out)
    }

    /// Values of the logical mapping, in [`items`](Self::items) order.
    pub fn values(&self) -> Result<Vec<V>, ManagerError<S::Error>> {
        Ok(self.items()?.into_iter().map(|(_, value)| value).collect())
    }

    /// RAII guard that syncs when it leaves scope.
    ///
    /// Call [`SyncGuard::commit`] on the success path to observe sync
    /// errors; if the guard is dropped instead (early return, `?`, panic
    /// unwinding), it syncs best-effort without masking the original
    /// failure — `Drop` cannot raise.
    pub fn sync_guard(&mut self) -> SyncGuard<'_, K, V, S> {
        SyncGuard {
            manager: self,
            committed: false,
        }
    }

    fn cache_contains(&self, key: &K) -> bool {
        match &self.mode {
            Mode::Through(cache) => cache.contains(key),
            Mode::Back { cache, .. } => cache.contains(key),
        }
    }

    fn cache_get(&mut self, key: &K) -> Option<&V> {
        match &mut self.mode {
            Mode::Through(cache) => cache.get(key),
            Mode::Back { cache, .. } => cache.get(key),
        }
    }

    fn cache_peek(&self, key: &K) -> Option<&V> {
        match &self.mode {
            Mode::Through(cache) => cache.peek(key),
            Mode::Back { cache, .. } => cache.peek(key),
        }
    }

    /// Inserts a value fetched from the store; never marks dirty.
    fn cache_fill(&mut self, key: K, value: V) -> Result<(), ManagerError<S::Error>> {
        match &mut self.mode {
            Mode::Through(cache) => match cache.insert(key, value) {
                Ok(_) => Ok(()),
                Err(never) => match never {},
            },
            Mode::Back { cache, .. } => cache
                .insert(key, value)
                .map(|_| ())
                .map_err(ManagerError::Store),
        }
    }
}

#[cfg(feature = "metrics")]
impl<K, V, S> ManagedCache<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: Store<K, V>,
{
    /// Snapshot of the manager's counters plus current gauges.
    pub fn metrics_snapshot(&self) -> ManagerMetricsSnapshot {
        self.metrics.snapshot(self.cache_len(), self.dirty_len())
    }
}

#[cfg(feature = "metrics")]
impl<K, V, S> crate::metrics::traits::MetricsSnapshotProvider<ManagerMetricsSnapshot>
    for ManagedCache<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: Store<K, V>,
{
    fn snapshot(&self) -> ManagerMetricsSnapshot {
        self.metrics_snapshot()
    }
}

impl<K, V, S> fmt::Debug for ManagedCache<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: Store<K, V>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagedCache")
            .field("policy", &self.policy())
            .field("cache_len", &self.cache_len())
            .field("capacity", &self.capacity())
            .field("dirty", &self.dirty_len())
            .finish_non_exhaustive()
    }
}

/// Scope guard returned by [`ManagedCache::sync_guard`].
pub struct SyncGuard<'a, K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: Store<K, V>,
{
    manager: &'a mut ManagedCache<K, V, S>,
    committed: bool,
}

impl<K, V, S> SyncGuard<'_, K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: Store<K, V>,
{
    /// Syncs now and defuses the drop-time sync, surfacing any store
    /// error.
    pub fn commit(mut self) -> Result<(), ManagerError<S::Error>> {
        self.committed = true;
        self.manager.sync()
    }
}

impl<'a, K, V, S> Deref for SyncGuard<'a, K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: Store<K, V>,
{
    type Target = ManagedCache<K, V, S>;

    fn deref(&self) -> &Self::Target {
        &*self.manager
    }
}

impl<'a, K, V, S> DerefMut for SyncGuard<'a, K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: Store<K, V>,
{
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.manager
    }
}

impl<K, V, S> Drop for SyncGuard<'_, K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: Store<K, V>,
{
    fn drop(&mut self) {
        if !self.committed {
            // Best-effort: Drop cannot raise, and the caller's original
            // error must not be masked.
            let _ = self.manager.sync();
        }
    }
}
