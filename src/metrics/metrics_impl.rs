use crate::metrics::cell::MetricsCell;
use crate::metrics::snapshot::{LruMetricsSnapshot, ManagerMetricsSnapshot};

/// Counters recorded by the LRU engine.
#[derive(Debug, Default)]
pub struct LruMetrics {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,
    pub insert_calls: u64,
    pub insert_updates: u64,
    pub insert_new: u64,
    pub evict_calls: u64,
    pub evicted_entries: u64,
    pub touch_calls: u64,
    pub touch_found: u64,
    pub clear_calls: u64,
    pub peek_calls: MetricsCell,
    pub peek_found: MetricsCell,
}

impl LruMetrics {
    #[inline]
    pub fn record_get_hit(&mut self) {
        self.get_calls += 1;
        self.get_hits += 1;
    }

    #[inline]
    pub fn record_get_miss(&mut self) {
        self.get_calls += 1;
        self.get_misses += 1;
    }

    #[inline]
    pub fn record_insert_call(&mut self) {
        self.insert_calls += 1;
    }

    #[inline]
    pub fn record_insert_update(&mut self) {
        self.insert_updates += 1;
    }

    #[inline]
    pub fn record_insert_new(&mut self) {
        self.insert_new += 1;
    }

    #[inline]
    pub fn record_evict_call(&mut self) {
        self.evict_calls += 1;
    }

    #[inline]
    pub fn record_evicted_entry(&mut self) {
        self.evicted_entries += 1;
    }

    #[inline]
    pub fn record_touch_call(&mut self) {
        self.touch_calls += 1;
    }

    #[inline]
    pub fn record_touch_found(&mut self) {
        self.touch_found += 1;
    }

    #[inline]
    pub fn record_clear(&mut self) {
        self.clear_calls += 1;
    }

    #[inline]
    pub fn record_peek_call(&self) {
        self.peek_calls.incr();
    }

    #[inline]
    pub fn record_peek_found(&self) {
        self.peek_found.incr();
    }

    /// Snapshot the counters together with current gauges.
    pub fn snapshot(&self, cache_len: usize, capacity: usize) -> LruMetricsSnapshot {
        LruMetricsSnapshot {
            get_calls: self.get_calls,
            get_hits: self.get_hits,
            get_misses: self.get_misses,
            insert_calls: self.insert_calls,
            insert_updates: self.insert_updates,
            insert_new: self.insert_new,
            evict_calls: self.evict_calls,
            evicted_entries: self.evicted_entries,
            touch_calls: self.touch_calls,
            touch_found: self.touch_found,
            clear_calls: self.clear_calls,
            peek_calls: self.peek_calls.get(),
            peek_found: self.peek_found.get(),
            cache_len,
            capacity,
        }
    }
}

/// Counters recorded by the managed cache.
#[derive(Debug, Default)]
pub struct ManagerMetrics {
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub store_writes: u64,
    pub sync_calls: u64,
    pub synced_keys: u64,
    pub bulk_syncs: u64,
    pub bulk_synced_keys: u64,
    pub flush_calls: u64,
}

impl ManagerMetrics {
    #[inline]
    pub fn record_cache_hit(&mut self) {
        self.cache_hits += 1;
    }

    #[inline]
    pub fn record_cache_miss(&mut self) {
        self.cache_misses += 1;
    }

    #[inline]
    pub fn record_store_write(&mut self) {
        self.store_writes += 1;
    }

    #[inline]
    pub fn record_sync_call(&mut self) {
        self.sync_calls += 1;
    }

    #[inline]
    pub fn record_synced_key(&mut self) {
        self.synced_keys += 1;
    }

    #[inline]
    pub fn record_bulk_sync(&mut self, flushed: usize) {
        self.bulk_syncs += 1;
        self.bulk_synced_keys += flushed as u64;
    }

    #[inline]
    pub fn record_flush(&mut self) {
        self.flush_calls += 1;
    }

    /// Snapshot the counters together with current gauges.
    pub fn snapshot(&self, cache_len: usize, dirty_len: usize) -> ManagerMetricsSnapshot {
        ManagerMetricsSnapshot {
            cache_hits: self.cache_hits,
            cache_misses: self.cache_misses,
            store_writes: self.store_writes,
            sync_calls: self.sync_calls,
            synced_keys: self.synced_keys,
            bulk_syncs: self.bulk_syncs,
            bulk_synced_keys: self.bulk_synced_keys,
            flush_calls: self.flush_calls,
            cache_len,
            dirty_len,
        }
    }
}
