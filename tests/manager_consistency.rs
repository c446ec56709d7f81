// ==============================================
// MANAGED CACHE CONSISTENCY TESTS (integration)
// ==============================================
//
// Cross-layer properties of the write-through and write-back managers:
// store/cache agreement, dirty-set bookkeeping, bulk flushing, and failure
// propagation through a faulting store.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use ringcache::error::ManagerError;
use ringcache::manager::{ManagedCache, WritePolicy};
use ringcache::store::hashmap::HashMapStore;
use ringcache::store::traits::Store;

// ==============================================
// Store doubles
// ==============================================

#[derive(Debug, Clone, PartialEq, Eq)]
struct StoreDown;

impl fmt::Display for StoreDown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("store down")
    }
}

impl std::error::Error for StoreDown {}

/// Store that fails `set` for one designated key and counts writes.
#[derive(Debug, Default)]
struct FlakyStore {
    inner: HashMapStore<u32, i32>,
    fail_set_for: Option<u32>,
    writes: u32,
}

impl Store<u32, i32> for FlakyStore {
    type Error = StoreDown;

    fn get(&self, key: &u32) -> Result<Option<i32>, StoreDown> {
        Ok(self.inner.get(key).unwrap_or(None))
    }

    fn set(&mut self, key: u32, value: i32) -> Result<(), StoreDown> {
        if self.fail_set_for == Some(key) {
            return Err(StoreDown);
        }
        self.writes += 1;
        let _ = self.inner.set(key, value);
        Ok(())
    }

    fn remove(&mut self, key: &u32) -> Result<Option<i32>, StoreDown> {
        Ok(self.inner.remove(key).unwrap_or(None))
    }

    fn contains(&self, key: &u32) -> Result<bool, StoreDown> {
        Ok(self.inner.contains(key).unwrap_or(false))
    }

    fn len(&self) -> Result<usize, StoreDown> {
        Ok(self.inner.len().unwrap_or(0))
    }

    fn keys(&self) -> Result<Vec<u32>, StoreDown> {
        Ok(self.inner.keys().unwrap_or_default())
    }

    fn clear(&mut self) -> Result<(), StoreDown> {
        let _ = self.inner.clear();
        Ok(())
    }
}

/// Store with a native batch path that it prefers for batches of two or
/// more entries.
#[derive(Debug, Default)]
struct BatchStore {
    inner: HashMapStore<u32, i32>,
    set_calls: u32,
    bulk_calls: u32,
    fail_bulk: bool,
}

impl Store<u32, i32> for BatchStore {
    type Error = StoreDown;

    fn get(&self, key: &u32) -> Result<Option<i32>, StoreDown> {
        Ok(self.inner.get(key).unwrap_or(None))
    }

    fn set(&mut self, key: u32, value: i32) -> Result<(), StoreDown> {
        self.set_calls += 1;
        let _ = self.inner.set(key, value);
        Ok(())
    }

    fn remove(&mut self, key: &u32) -> Result<Option<i32>, StoreDown> {
        Ok(self.inner.remove(key).unwrap_or(None))
    }

    fn contains(&self, key: &u32) -> Result<bool, StoreDown> {
        Ok(self.inner.contains(key).unwrap_or(false))
    }

    fn len(&self) -> Result<usize, StoreDown> {
        Ok(self.inner.len().unwrap_or(0))
    }

    fn keys(&self) -> Result<Vec<u32>, StoreDown> {
        Ok(self.inner.keys().unwrap_or_default())
    }

    fn clear(&mut self) -> Result<(), StoreDown> {
        let _ = self.inner.clear();
        Ok(())
    }

    fn prefers_bulk_set(&self, batch: usize) -> bool {
        batch >= 2
    }

    fn set_bulk(&mut self, entries: Vec<(u32, i32)>) -> Result<(), StoreDown> {
        if self.fail_bulk {
            return Err(StoreDown);
        }
        self.bulk_calls += 1;
        for (key, value) in entries {
            let _ = self.inner.set(key, value);
        }
        Ok(())
    }
}

// ==============================================
// Write-through consistency
// ==============================================

mod write_through {
    use super::*;

    #[test]
    fn store_agrees_with_every_mutation() {
        let store = Rc::new(RefCell::new(HashMapStore::new()));
        let mut managed: ManagedCache<u32, i32, _> =
            ManagedCache::new(Rc::clone(&store), 3, WritePolicy::WriteThrough);

        // Mixed sequence: the store must track each set/remove exactly.
        for round in 0..30u32 {
            let key = round % 7;
            managed.insert(key, round as i32).unwrap();
            assert_eq!(store.borrow().get(&key).unwrap(), Some(round as i32));
            if round % 5 == 0 {
                let victim = (round + 1) % 7;
                match managed.remove(&victim) {
                    Ok(()) => assert_eq!(store.borrow().get(&victim).unwrap(), None),
                    Err(ManagerError::NotFound) => {
                        assert!(!store.borrow().contains(&victim).unwrap())
                    }
                    Err(other) => panic!("unexpected error: {other:?}"),
                }
            }
        }
    }

    #[test]
    fn eviction_never_touches_the_store() {
        let store = Rc::new(RefCell::new(FlakyStore::default()));
        let mut managed: ManagedCache<u32, i32, _> =
            ManagedCache::new(Rc::clone(&store), 1, WritePolicy::WriteThrough);
        managed.insert(1, 10).unwrap();
        managed.insert(2, 20).unwrap(); // evicts 1 from the cache
        // Exactly the two direct writes; the eviction added none.
        assert_eq!(store.borrow().writes, 2);
        assert!(store.borrow().contains(&1).unwrap());
    }

    #[test]
    fn store_set_failure_propagates_from_insert() {
        let store = Rc::new(RefCell::new(FlakyStore {
            fail_set_for: Some(2),
            ..FlakyStore::default()
        }));
        let mut managed: ManagedCache<u32, i32, _> =
            ManagedCache::new(Rc::clone(&store), 3, WritePolicy::WriteThrough);
        managed.insert(1, 10).unwrap();
        assert_eq!(managed.insert(2, 20), Err(ManagerError::Store(StoreDown)));
    }
}

// ==============================================
// Write-back consistency
// ==============================================

mod write_back {
    use super::*;

    #[test]
    fn spec_scenario_capacity_three() {
        let store = Rc::new(RefCell::new(HashMapStore::new()));
        let mut managed: ManagedCache<char, i32, _> =
            ManagedCache::new(Rc::clone(&store), 3, WritePolicy::WriteBack);

        managed.insert('a', 1).unwrap();
        managed.insert('b', 2).unwrap();
        assert!(store.borrow().is_empty().unwrap());
        assert!(managed.is_dirty(&'a'));
        assert!(managed.is_dirty(&'b'));
        assert_eq!(managed.dirty_len(), 2);

        managed.sync().unwrap();
        assert_eq!(store.borrow().get(&'a').unwrap(), Some(1));
        assert_eq!(store.borrow().get(&'b').unwrap(), Some(2));
        assert_eq!(managed.dirty_len(), 0);
    }

    #[test]
    fn store_and_cache_agree_on_every_key_after_sync() {
        let store = Rc::new(RefCell::new(HashMapStore::new()));
        let mut managed: ManagedCache<u32, i32, _> =
            ManagedCache::new(Rc::clone(&store), 8, WritePolicy::WriteBack);
        for round in 0..20u32 {
            managed.insert(round % 6, round as i32).unwrap();
        }
        managed.sync().unwrap();
        for key in 0..6u32 {
            let cached = managed.get(&key).unwrap().copied();
            assert_eq!(store.borrow().get(&key).unwrap(), cached);
        }
    }

    #[test]
    fn values_are_never_flushed_early() {
        let store = Rc::new(RefCell::new(FlakyStore::default()));
        let mut managed: ManagedCache<u32, i32, _> =
            ManagedCache::new(Rc::clone(&store), 4, WritePolicy::WriteBack);
        managed.insert(1, 10).unwrap();
        managed.insert(2, 20).unwrap();
        managed.get(&1).unwrap();
        assert!(managed.contains(&2).unwrap());
        // No eviction and no sync yet: zero store writes.
        assert_eq!(store.borrow().writes, 0);
    }

    #[test]
    fn bulk_flush_is_used_when_the_store_prefers_it() {
        let store = Rc::new(RefCell::new(BatchStore::default()));
        let mut managed: ManagedCache<u32, i32, _> =
            ManagedCache::new(Rc::clone(&store), 4, WritePolicy::WriteBack);
        for key in 1..=3u32 {
            managed.insert(key, key as i32).unwrap();
        }
        managed.sync().unwrap();
        assert_eq!(store.borrow().bulk_calls, 1);
        assert_eq!(store.borrow().set_calls, 0);
        assert_eq!(managed.dirty_len(), 0);
        assert_eq!(store.borrow().len().unwrap(), 3);
    }

    #[test]
    fn single_key_sync_skips_the_bulk_path() {
        let store = Rc::new(RefCell::new(BatchStore::default()));
        let mut managed: ManagedCache<u32, i32, _> =
            ManagedCache::new(Rc::clone(&store), 4, WritePolicy::WriteBack);
        managed.insert(1, 10).unwrap();
        managed.sync().unwrap();
        // Batch of one: the store's cost model says per-key.
        assert_eq!(store.borrow().bulk_calls, 0);
        assert_eq!(store.borrow().set_calls, 1);
    }

    #[test]
    fn failed_bulk_flush_leaves_the_dirty_set_intact() {
        let store = Rc::new(RefCell::new(BatchStore {
            fail_bulk: true,
            ..BatchStore::default()
        }));
        let mut managed: ManagedCache<u32, i32, _> =
            ManagedCache::new(Rc::clone(&store), 4, WritePolicy::WriteBack);
        for key in 1..=3u32 {
            managed.insert(key, key as i32).unwrap();
        }
        assert_eq!(managed.sync(), Err(ManagerError::Store(StoreDown)));
        assert_eq!(managed.dirty_len(), 3);
    }

    #[test]
    fn partial_sync_failure_keeps_unflushed_keys_dirty() {
        let store = Rc::new(RefCell::new(FlakyStore {
            fail_set_for: Some(2),
            ..FlakyStore::default()
        }));
        let mut managed: ManagedCache<u32, i32, _> =
            ManagedCache::new(Rc::clone(&store), 4, WritePolicy::WriteBack);
        for key in 1..=3u32 {
            managed.insert(key, key as i32).unwrap();
        }
        assert_eq!(managed.sync(), Err(ManagerError::Store(StoreDown)));

        // The failed key stays dirty, along with any keys the sync never
        // reached (set iteration order decides how many that is). Keys
        // flushed before the failure are clean. Retrying after the store
        // recovers drains the rest.
        assert!(managed.is_dirty(&2));
        let flushed = store.borrow().writes as usize;
        assert_eq!(managed.dirty_len(), 3 - flushed);
        store.borrow_mut().fail_set_for = None;
        managed.sync().unwrap();
        assert_eq!(managed.dirty_len(), 0);
        for key in 1..=3u32 {
            assert_eq!(store.borrow().get(&key).unwrap(), Some(key as i32));
        }
    }

    #[test]
    fn eviction_flush_failure_surfaces_from_insert() {
        let store = Rc::new(RefCell::new(FlakyStore {
            fail_set_for: Some(1),
            ..FlakyStore::default()
        }));
        let mut managed: ManagedCache<u32, i32, _> =
            ManagedCache::new(Rc::clone(&store), 2, WritePolicy::WriteBack);
        managed.insert(1, 10).unwrap();
        managed.insert(2, 20).unwrap();
        // Inserting 3 must evict dirty key 1, whose flush fails.
        assert_eq!(managed.insert(3, 30), Err(ManagerError::Store(StoreDown)));
        // Key 1 is still cached and still dirty; key 3 never landed.
        assert!(managed.is_dirty(&1));
        assert!(!managed.contains(&3).unwrap());
        assert_eq!(managed.cache_len(), 2);
    }

    #[test]
    fn get_fetch_failure_propagates() {
        #[derive(Debug, Default)]
        struct ReadFailStore;
        impl Store<u32, i32> for ReadFailStore {
            type Error = StoreDown;
            fn get(&self, _key: &u32) -> Result<Option<i32>, StoreDown> {
                Err(StoreDown)
            }
            fn set(&mut self, _key: u32, _value: i32) -> Result<(), StoreDown> {
                Ok(())
            }
            fn remove(&mut self, _key: &u32) -> Result<Option<i32>, StoreDown> {
                Ok(None)
            }
            fn contains(&self, _key: &u32) -> Result<bool, StoreDown> {
                Ok(false)
            }
            fn len(&self) -> Result<usize, StoreDown> {
                Ok(0)
            }
            fn keys(&self) -> Result<Vec<u32>, StoreDown> {
                Ok(Vec::new())
            }
            fn clear(&mut self) -> Result<(), StoreDown> {
                Ok(())
            }
        }

        let store = Rc::new(RefCell::new(ReadFailStore));
        let mut managed: ManagedCache<u32, i32, _> =
            ManagedCache::new(Rc::clone(&store), 2, WritePolicy::WriteBack);
        assert_eq!(managed.get(&1), Err(ManagerError::Store(StoreDown)));
    }
}

// ==============================================
// Shared-store usage
// ==============================================

mod shared_store {
    use super::*;

    #[test]
    fn store_outlives_the_manager() {
        let store = Rc::new(RefCell::new(HashMapStore::new()));
        {
            let mut managed: ManagedCache<u32, i32, _> =
                ManagedCache::new(Rc::clone(&store), 2, WritePolicy::WriteThrough);
            managed.insert(1, 10).unwrap();
        }
        // The manager is gone; the store keeps the data.
        assert_eq!(store.borrow().get(&1).unwrap(), Some(10));
    }

    #[test]
    fn external_writes_are_visible_through_get() {
        let store = Rc::new(RefCell::new(HashMapStore::new()));
        let mut managed: ManagedCache<u32, i32, _> =
            ManagedCache::new(Rc::clone(&store), 2, WritePolicy::WriteThrough);
        // Another consumer writes directly to the store.
        store.borrow_mut().set(7, 70).unwrap();
        assert_eq!(managed.get(&7).unwrap(), Some(&70));
    }
}
