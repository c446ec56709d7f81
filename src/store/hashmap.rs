//! HashMap-backed reference store.
//!
//! ## Architecture
//! - Entries live in an `FxHashMap<K, V>`; the store owns the master copy
//!   of every value.
//! - Unbounded: the backing store models the slow, durable half of the
//!   system, so capacity pressure is the cache's concern, not the store's.
//! - Operations are infallible (`Error = Infallible`); fault-injecting
//!   store doubles live in the manager's tests.
//!
//! ## When to Use
//! - Tests, demos, and as the in-process default behind a
//!   [`ManagedCache`](crate::manager::ManagedCache).
//! - As the reference semantics when implementing [`Store`] over a real
//!   external system.

use std::convert::Infallible;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::store::traits::Store;

/// In-memory store over an `FxHashMap`.
#[derive(Debug, Default, Clone)]
pub struct HashMapStore<K, V> {
    map: FxHashMap<K, V>,
}

impl<K, V> HashMapStore<K, V>
where
    K: Eq + Hash,
{
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            map: FxHashMap::default(),
        }
    }

    /// Creates a store seeded with `entries`.
    pub fn from_entries(entries: impl IntoIterator<Item = (K, V)>) -> Self {
        Self {
            map: entries.into_iter().collect(),
        }
    }
}

impl<K, V> Store<K, V> for HashMapStore<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    type Error = Infallible;

    fn get(&self, key: &K) -> Result<Option<V>, Infallible> {
        Ok(self.map.get(key).cloned())
    }

    fn set(&mut self, key: K, value: V) -> Result<(), Infallible> {
        self.map.insert(key, value);
        Ok(())
    }

    fn remove(&mut self, key: &K) -> Result<Option<V>, Infallible> {
        Ok(self.map.remove(key))
    }

    fn contains(&self, key: &K) -> Result<bool, Infallible> {
        Ok(self.map.contains_key(key))
    }

    fn len(&self) -> Result<usize, Infallible> {
        Ok(self.map.len())
    }

    fn keys(&self) -> Result<Vec<K>, Infallible> {
        Ok(self.map.keys().cloned().collect())
    }

    fn clear(&mut self) -> Result<(), Infallible> {
        self.map.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove_round_trip() {
        let mut store: HashMapStore<u32, String> = HashMapStore::new();
        store.set(1, "one".to_string()).unwrap();
        assert_eq!(store.get(&1).unwrap(), Some("one".to_string()));
        assert!(store.contains(&1).unwrap());
        assert_eq!(store.len().unwrap(), 1);

        assert_eq!(store.remove(&1).unwrap(), Some("one".to_string()));
        assert_eq!(store.get(&1).unwrap(), None);
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn set_overwrites() {
        let mut store: HashMapStore<u32, i32> = HashMapStore::new();
        store.set(1, 10).unwrap();
        store.set(1, 11).unwrap();
        assert_eq!(store.get(&1).unwrap(), Some(11));
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn from_entries_seeds_the_map() {
        let store = HashMapStore::from_entries([(1u32, "a"), (2, "b")]);
        assert_eq!(store.len().unwrap(), 2);
        let mut keys = store.keys().unwrap();
        keys.sort_unstable();
        assert_eq!(keys, vec![1, 2]);
    }

    #[test]
    fn default_bulk_set_loops_over_set() {
        let mut store: HashMapStore<u32, i32> = HashMapStore::new();
        store.set_bulk(vec![(1, 10), (2, 20)]).unwrap();
        assert_eq!(store.get(&2).unwrap(), Some(20));
        assert!(!store.prefers_bulk_set(100));
    }

    #[test]
    fn clear_empties_the_store() {
        let mut store = HashMapStore::from_entries([(1u32, 1), (2, 2)]);
        store.clear().unwrap();
        assert!(store.is_empty().unwrap());
    }
}
