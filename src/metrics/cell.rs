use std::cell::Cell;

/// A metrics-only counter cell for `&self` recording paths.
///
/// Plain interior mutability over a `u64`; inherits the crate's
/// single-threaded contract (no `Sync`), which is exactly why no atomics
/// are needed.
#[repr(transparent)]
#[derive(Debug, Default)]
pub struct MetricsCell(Cell<u64>);

impl MetricsCell {
    #[inline]
    pub fn new() -> Self {
        Self(Cell::new(0))
    }

    #[inline]
    pub fn get(&self) -> u64 {
        self.0.get()
    }

    #[inline]
    pub fn incr(&self) {
        self.0.set(self.0.get() + 1);
    }
}
