// ==============================================
// RANDOMIZED MODEL TESTS (integration)
// ==============================================
//
// Drives the engine and the managers with long random operation sequences
// and checks every observable against a deliberately naive reference
// model. Seeds are fixed so failures replay deterministically.

use std::cell::RefCell;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use ringcache::error::ManagerError;
use ringcache::manager::{ManagedCache, WritePolicy};
use ringcache::policy::lru::LruCache;
use ringcache::store::hashmap::HashMapStore;
use ringcache::store::traits::Store;

/// O(n)-everything reference LRU: a vector ordered LRU-front, MRU-back.
struct ModelLru {
    entries: Vec<(u32, i32)>,
    size: usize,
}

impl ModelLru {
    fn new(size: usize) -> Self {
        Self {
            entries: Vec::new(),
            size,
        }
    }

    fn contains(&self, key: u32) -> bool {
        self.entries.iter().any(|(k, _)| *k == key)
    }

    fn get(&mut self, key: u32) -> Option<i32> {
        let pos = self.entries.iter().position(|(k, _)| *k == key)?;
        let entry = self.entries.remove(pos);
        let value = entry.1;
        self.entries.push(entry);
        Some(value)
    }

    fn peek(&self, key: u32) -> Option<i32> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
    }

    fn put(&mut self, key: u32, value: i32) {
        if let Some(pos) = self.entries.iter().position(|(k, _)| *k == key) {
            self.entries.remove(pos);
        } else if self.entries.len() == self.size {
            self.entries.remove(0);
        }
        self.entries.push((key, value));
    }

    fn remove(&mut self, key: u32) -> Option<i32> {
        let pos = self.entries.iter().position(|(k, _)| *k == key)?;
        Some(self.entries.remove(pos).1)
    }

    fn resize(&mut self, size: usize) {
        while self.entries.len() > size {
            self.entries.remove(0);
        }
        self.size = size;
    }

    /// Keys MRU-first, matching `LruCache::keys`.
    fn mru_keys(&self) -> Vec<u32> {
        self.entries.iter().rev().map(|(k, _)| *k).collect()
    }
}

fn check_engine_against_model(cache: &LruCache<u32, i32>, model: &ModelLru) {
    assert_eq!(cache.len(), model.entries.len());
    assert_eq!(cache.keys().copied().collect::<Vec<_>>(), model.mru_keys());
}

#[test]
fn engine_matches_model_under_random_ops() {
    for seed in 0..4u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut cache = LruCache::new(128);
        let mut model = ModelLru::new(128);

        for _ in 0..2000 {
            let key = rng.gen_range(0..512u32);
            let value = rng.gen_range(0..512i32);
            match rng.gen_range(0..6u8) {
                0..=2 => {
                    cache.put(key, value);
                    model.put(key, value);
                }
                3 => {
                    assert_eq!(cache.get(&key).copied(), model.get(key));
                }
                4 => {
                    assert_eq!(cache.peek(&key).copied(), model.peek(key));
                }
                _ => {
                    assert_eq!(cache.remove(&key), model.remove(key));
                }
            }
            check_engine_against_model(&cache, &model);
        }
    }
}

#[test]
fn engine_matches_model_across_resizes() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut cache = LruCache::new(64);
    let mut model = ModelLru::new(64);

    for round in 0..1500 {
        let key = rng.gen_range(0..256u32);
        cache.put(key, round);
        model.put(key, round);
        if round % 97 == 0 {
            let size = rng.gen_range(1..96usize);
            cache.resize(size).unwrap();
            model.resize(size);
        }
        check_engine_against_model(&cache, &model);
    }
}

#[test]
fn write_through_manager_matches_plain_map() {
    let mut rng = StdRng::seed_from_u64(7);
    let store = Rc::new(RefCell::new(HashMapStore::new()));
    let mut managed: ManagedCache<u32, i32, _> =
        ManagedCache::new(Rc::clone(&store), 16, WritePolicy::WriteThrough);
    let mut model: std::collections::BTreeMap<u32, i32> = Default::default();

    for _ in 0..2000 {
        let key = rng.gen_range(0..64u32);
        let value = rng.gen_range(0..512i32);
        match rng.gen_range(0..4u8) {
            0 | 1 => {
                managed.insert(key, value).unwrap();
                model.insert(key, value);
            }
            2 => {
                assert_eq!(managed.get(&key).unwrap().copied(), model.get(&key).copied());
            }
            _ => match (managed.remove(&key), model.remove(&key)) {
                (Ok(()), Some(_)) => {}
                (Err(ManagerError::NotFound), None) => {}
                (got, want) => panic!("remove mismatch: {got:?} vs {want:?}"),
            },
        }
        // The store is the authoritative mapping under write-through.
        assert_eq!(store.borrow().len().unwrap(), model.len());
        for (key, value) in &model {
            assert_eq!(store.borrow().get(key).unwrap(), Some(*value));
        }
    }
}

#[test]
fn write_back_manager_converges_to_plain_map_on_sync() {
    let mut rng = StdRng::seed_from_u64(21);
    let store = Rc::new(RefCell::new(HashMapStore::new()));
    let mut managed: ManagedCache<u32, i32, _> =
        ManagedCache::new(Rc::clone(&store), 16, WritePolicy::WriteBack);
    let mut model: std::collections::BTreeMap<u32, i32> = Default::default();

    for round in 0..2000 {
        let key = rng.gen_range(0..64u32);
        let value = rng.gen_range(0..512i32);
        match rng.gen_range(0..5u8) {
            0..=1 => {
                managed.insert(key, value).unwrap();
                model.insert(key, value);
            }
            2 => {
                assert_eq!(managed.get(&key).unwrap().copied(), model.get(&key).copied());
            }
            3 => match (managed.remove(&key), model.remove(&key)) {
                (Ok(()), Some(_)) => {}
                (Err(ManagerError::NotFound), None) => {}
                (got, want) => panic!("remove mismatch: {got:?} vs {want:?}"),
            },
            _ => {
                if round % 3 == 0 {
                    managed.sync().unwrap();
                    assert_eq!(managed.dirty_len(), 0);
                }
            }
        }
        // The merged view tracks the model at all times.
        let mut keys = managed.keys().unwrap();
        keys.sort_unstable();
        assert_eq!(keys, model.keys().copied().collect::<Vec<_>>());
    }

    managed.sync().unwrap();
    assert_eq!(store.borrow().len().unwrap(), model.len());
    for (key, value) in &model {
        assert_eq!(store.borrow().get(key).unwrap(), Some(*value));
    }
}
