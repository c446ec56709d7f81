#![no_main]

use libfuzzer_sys::fuzz_target;
use ringcache::policy::lru::LruCache;

// Fuzz arbitrary operation sequences on the LRU engine
//
// Random put/get/peek/touch/remove/resize/clear sequences; the engine's
// internal debug validation runs after every mutation, and the harness
// cross-checks the occupancy bound and iteration length.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let capacity = (data[0] as usize % 24).max(1);
    let mut cache: LruCache<u8, u8> = LruCache::new(capacity);

    let mut idx = 1;
    while idx + 1 < data.len() {
        let op = data[idx] % 8;
        let key = data[idx + 1] % 64;
        idx += 2;

        match op {
            0..=2 => {
                cache.put(key, key);
            }
            3 => {
                let _ = cache.get(&key);
            }
            4 => {
                let _ = cache.peek(&key);
            }
            5 => {
                let _ = cache.touch(&key);
            }
            6 => {
                let _ = cache.remove(&key);
            }
            _ => {
                if key == 0 {
                    cache.clear();
                } else {
                    let _ = cache.resize(key as usize);
                }
            }
        }

        assert!(cache.len() <= cache.capacity());
        assert_eq!(cache.iter().count(), cache.len());
    }
});
