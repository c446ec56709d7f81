use std::cell::RefCell;
use std::rc::Rc;

use ringcache::manager::{ManagedCache, WritePolicy};
use ringcache::store::{HashMapStore, Store};

fn main() {
    let store = Rc::new(RefCell::new(HashMapStore::new()));
    let mut cached: ManagedCache<u32, String, _> =
        ManagedCache::new(Rc::clone(&store), 2, WritePolicy::WriteBack);

    cached.insert(1, "one".to_string()).unwrap();
    cached.insert(2, "two".to_string()).unwrap();
    println!("store size before sync: {}", store.borrow().len().unwrap());
    println!("dirty keys: {}", cached.dirty_len());

    // Capacity pressure flushes the dirty LRU entry on its way out.
    cached.insert(3, "three".to_string()).unwrap();
    println!("store has 1 after eviction? {}", store.borrow().contains(&1).unwrap());

    cached.sync().unwrap();
    println!("store size after sync: {}", store.borrow().len().unwrap());
    println!("dirty keys after sync: {}", cached.dirty_len());
}

// Expected output:
// store size before sync: 0
// dirty keys: 2
// store has 1 after eviction? true
// store size after sync: 3
// dirty keys after sync: 0
