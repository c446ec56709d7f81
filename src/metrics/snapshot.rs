#[derive(Debug, Default, Clone, Copy)]
pub struct LruMetricsSnapshot {
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
    pub peek_calls: u64,
    pub peek_found: u64,

    // gauges captured at snapshot time
    pub cache_len: usize,
    pub capacity: usize,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ManagerMetricsSnapshot {
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub store_writes: u64,

    pub sync_calls: u64,
    pub synced_keys: u64,
    pub bulk_syncs: u64,
    pub bulk_synced_keys: u64,
    pub flush_calls: u64,

    // gauges captured at snapshot time
    pub cache_len: usize,
    pub dirty_len: usize,
}
