//! Function-call memoization over a shared LRU engine.
//!
//! Thin glue: the argument is the cache key, the computed result the
//! value. Recency works exactly as in [`LruCache`] — a memo hit promotes
//! the argument, a miss computes, caches, and may evict the least recently
//! used result.
//!
//! ```
//! use std::cell::Cell;
//! use ringcache::memo::Memoized;
//!
//! let calls = Cell::new(0u32);
//! let mut fib = Memoized::new(64, |n: &u64| {
//!     calls.set(calls.get() + 1);
//!     // toy computation standing in for something expensive
//!     n.wrapping_mul(n.wrapping_add(1)) / 2
//! });
//!
//! assert_eq!(fib.call(10), 55);
//! assert_eq!(fib.call(10), 55); // served from cache
//! assert_eq!(calls.get(), 1);
//! ```

use std::hash::Hash;

use crate::policy::lru::LruCache;

/// A function wrapped with an LRU result cache.
pub struct Memoized<A, R, F> {
    cache: LruCache<A, R>,
    func: F,
}

impl<A, R, F> Memoized<A, R, F>
where
    A: Eq + Hash + Clone,
    R: Clone,
    F: FnMut(&A) -> R,
{
    /// Wraps `func` with a result cache of the given capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize, func: F) -> Self {
        Self {
            cache: LruCache::new(capacity),
            func,
        }
    }

    /// Returns `func(arg)`, served from the cache when possible.
    pub fn call(&mut self, arg: A) -> R {
        if let Some(result) = self.cache.get(&arg) {
            return result.clone();
        }
        let result = (self.func)(&arg);
        self.cache.put(arg, result.clone());
        result
    }

    /// The underlying result cache.
    pub fn cache(&self) -> &LruCache<A, R> {
        &self.cache
    }

    /// Mutable access to the result cache, e.g. to invalidate entries.
    pub fn cache_mut(&mut self) -> &mut LruCache<A, R> {
        &mut self.cache
    }
}
