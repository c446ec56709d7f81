//! Builder for engines and managed caches.
//!
//! A thin front door that validates capacity once and hides the generic
//! plumbing (hook parameter, store handle wiring).
//!
//! ## Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use ringcache::builder::CacheBuilder;
//! use ringcache::manager::WritePolicy;
//! use ringcache::store::HashMapStore;
//!
//! let mut cache = CacheBuilder::new(100).build::<u64, String>();
//! cache.put(1, "hello".to_string());
//! assert_eq!(cache.get(&1), Some(&"hello".to_string()));
//!
//! let store = Rc::new(RefCell::new(HashMapStore::new()));
//! let mut managed =
//!     CacheBuilder::new(100).manage::<u64, String, _>(store, WritePolicy::WriteBack);
//! managed.insert(1, "hello".to_string()).unwrap();
//! ```

use std::cell::RefCell;
use std::hash::Hash;
use std::rc::Rc;

use crate::error::{CacheError, ManagerError};
use crate::manager::{ManagedCache, WritePolicy};
use crate::policy::lru::LruCache;
use crate::store::traits::Store;
use crate::traits::EvictionHook;

/// Configures and constructs caches.
#[derive(Debug, Clone, Copy)]
pub struct CacheBuilder {
    capacity: usize,
}

impl CacheBuilder {
    /// Starts a builder for caches of the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Builds a hook-free engine.
    ///
    /// # Panics
    ///
    /// Panics if the configured capacity is zero; use
    /// [`try_build`](Self::try_build) for untrusted input.
    pub fn build<K, V>(self) -> LruCache<K, V>
    where
        K: Eq + Hash + Clone,
    {
        LruCache::new(self.capacity)
    }

    /// Builds a hook-free engine, rejecting zero capacity.
    pub fn try_build<K, V>(self) -> Result<LruCache<K, V>, CacheError<std::convert::Infallible>>
    where
        K: Eq + Hash + Clone,
    {
        if self.capacity == 0 {
            return Err(CacheError::ZeroCapacity);
        }
        Ok(LruCache::new(self.capacity))
    }

    /// Builds an engine with an eviction hook.
    ///
    /// # Panics
    ///
    /// Panics if the configured capacity is zero.
    pub fn build_with_hook<K, V, H>(self, hook: H) -> LruCache<K, V, H>
    where
        K: Eq + Hash + Clone,
        H: EvictionHook<K, V>,
    {
        LruCache::with_hook(self.capacity, hook)
    }

    /// Builds an engine with an eviction hook, rejecting zero capacity.
    pub fn try_build_with_hook<K, V, H>(
        self,
        hook: H,
    ) -> Result<LruCache<K, V, H>, CacheError<H::Error>>
    where
        K: Eq + Hash + Clone,
        H: EvictionHook<K, V>,
    {
        if self.capacity == 0 {
            return Err(CacheError::ZeroCapacity);
        }
        Ok(LruCache::with_hook(self.capacity, hook))
    }

    /// Builds a managed cache layered over `store`.
    ///
    /// # Panics
    ///
    /// Panics if the configured capacity is zero.
    pub fn manage<K, V, S>(
        self,
        store: Rc<RefCell<S>>,
        policy: WritePolicy,
    ) -> ManagedCache<K, V, S>
    where
        K: Eq + Hash + Clone,
        V: Clone,
        S: Store<K, V>,
    {
        ManagedCache::new(store, self.capacity, policy)
    }

    /// Builds a managed cache layered over `store`, rejecting zero
    /// capacity.
    pub fn try_manage<K, V, S>(
        self,
        store: Rc<RefCell<S>>,
        policy: WritePolicy,
    ) -> Result<ManagedCache<K, V, S>, ManagerError<S::Error>>
    where
        K: Eq + Hash + Clone,
        V: Clone,
        S: Store<K, V>,
    {
        if self.capacity == 0 {
            return Err(ManagerError::ZeroCapacity);
        }
        Ok(ManagedCache::new(store, self.capacity, policy))
    }
}
