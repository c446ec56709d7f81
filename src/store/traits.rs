//! Backing-store contract consumed by the managed cache.
//!
//! Stores focus on durable key/value ownership and lookup semantics; the
//! cache layers (engine + manager) own recency order and staleness
//! tracking. Keeping the contract a trait keeps the manager independent of
//! how values are persisted (a map in tests, a database or file-backed
//! table in production).
//!
//! Every operation is fallible through an associated error type: the store
//! is the slow, external half of the system and its failures must surface
//! unchanged through the manager. An in-memory store sets
//! `Error = Infallible`.
//!
//! Bulk writes are an optional capability expressed through default
//! methods rather than runtime probing: a store that can batch overrides
//! [`Store::set_bulk`] and reports through [`Store::prefers_bulk_set`]
//! whether batching pays off for a given batch size. The cost model lives
//! with the store, not the caller.

/// Key/value contract required of a backing store.
///
/// The manager calls `get`/`set`/`remove`/`contains`/`len` for individual
/// operations, `keys` to build merged views, `clear` for whole-cache
/// resets, and (optionally) `set_bulk` when flushing a write-back batch.
pub trait Store<K, V> {
    /// Failure type for store operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetches the value stored under `key`.
    fn get(&self, key: &K) -> Result<Option<V>, Self::Error>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: K, value: V) -> Result<(), Self::Error>;

    /// Deletes `key`, returning the stored value if it existed.
    fn remove(&mut self, key: &K) -> Result<Option<V>, Self::Error>;

    /// Checks whether `key` is present.
    fn contains(&self, key: &K) -> Result<bool, Self::Error>;

    /// Number of stored entries.
    fn len(&self) -> Result<usize, Self::Error>;

    /// Returns `true` if the store holds no entries.
    fn is_empty(&self) -> Result<bool, Self::Error> {
        Ok(self.len()? == 0)
    }

    /// Materializes the stored keys. Order is store-defined.
    fn keys(&self) -> Result<Vec<K>, Self::Error>;

    /// Deletes every entry.
    fn clear(&mut self) -> Result<(), Self::Error>;

    /// Whether [`set_bulk`](Self::set_bulk) beats per-key `set` calls for a
    /// batch of `_batch` entries. The default store has no native batch
    /// path, so the answer is `false`.
    fn prefers_bulk_set(&self, _batch: usize) -> bool {
        false
    }

    /// Stores a batch of entries. The default implementation loops over
    /// [`set`](Self::set); stores with a native batch path override it.
    /// A failed default-loop batch may leave earlier entries written.
    fn set_bulk(&mut self, entries: Vec<(K, V)>) -> Result<(), Self::Error> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }
}
