pub use crate::builder::CacheBuilder;
pub use crate::ds::{OccupiedIter, SlotRing};
pub use crate::error::{CacheError, ManagerError};
pub use crate::manager::{ManagedCache, SyncGuard, WritePolicy};
pub use crate::memo::Memoized;
#[cfg(feature = "metrics")]
pub use crate::metrics::{LruMetricsSnapshot, ManagerMetricsSnapshot};
pub use crate::policy::lru::LruCache;
pub use crate::store::{HashMapStore, Store};
pub use crate::traits::{CoreCache, EvictionHook, HookFn, MutableCache, NoHook};
