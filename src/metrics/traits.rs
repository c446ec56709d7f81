//! Snapshot consumption, decoupled from recording.
//!
//! Recorders live inside the cache types and only write counters; this
//! trait is the read side, letting benches and tests snapshot any
//! metrics-bearing cache generically.

/// Types that can produce a point-in-time metrics snapshot.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}
