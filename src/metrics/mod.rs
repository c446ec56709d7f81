//! Per-operation counters for the engine and the manager.
//!
//! Recording is split from consumption, mirroring the cache design:
//! recorder structs ([`metrics_impl::LruMetrics`],
//! [`metrics_impl::ManagerMetrics`]) only write counters; snapshot types
//! ([`snapshot::LruMetricsSnapshot`], [`snapshot::ManagerMetricsSnapshot`])
//! are plain `Copy` values safe to hold across later mutations; the
//! [`traits::MetricsSnapshotProvider`] trait lets benches and tests take
//! snapshots generically.
//!
//! Counters recorded through `&self` paths (`peek`) use
//! [`cell::MetricsCell`]; everything here follows the crate's
//! single-threaded contract.

pub mod cell;
pub mod metrics_impl;
pub mod snapshot;
pub mod traits;

pub use snapshot::{LruMetricsSnapshot, ManagerMetricsSnapshot};
