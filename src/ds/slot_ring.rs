//! Preallocated circular slot ring backing the LRU engine.
//!
//! Slots live in one contiguous arena (`Vec`) and are linked into a circular
//! doubly linked list by `usize` index, giving stable handles and O(1)
//! relink/splice operations without raw pointers. The arena is owned as a
//! unit, so there is no teardown choreography: dropping the ring drops every
//! slot.
//!
//! ## Architecture
//!
//! ```text
//!   slots (Vec<Slot<K, V>>)
//!   ┌───────┬──────────────────────────────────────────────┐
//!   │ index │ Slot { entry, prev, next }                   │
//!   ├───────┼──────────────────────────────────────────────┤
//!   │   0   │ { entry: Some((a, 1)), prev: 3, next: 1 }    │
//!   │   1   │ { entry: Some((b, 2)), prev: 0, next: 2 }    │
//!   │   2   │ { entry: None,         prev: 1, next: 3 }    │
//!   │   3   │ { entry: None,         prev: 2, next: 0 }    │
//!   └───────┴──────────────────────────────────────────────┘
//!
//!   head ─► [0] ◄──► [1] ◄──► [2] ◄──► [3] ◄──► (back to [0])
//!           MRU                └── empty run ──┘ (tail = head.prev)
//! ```
//!
//! The ring always links exactly `capacity` slots. Empty slots are never
//! scattered: they form one contiguous run ending immediately before `head`.
//! Every fill consumes the slot at `head.prev` (the tail) and every emptied
//! slot is parked back at that exact position via [`SlotRing::demote`], so
//! the run is preserved by construction. The occupied slots are therefore a
//! contiguous run starting at `head`, which is what makes
//! [`SlotRing::iter_occupied`] a plain bounded walk.
//!
//! ## Operations
//! - `promote(idx)`: relink before head, then make `idx` the new head (MRU)
//! - `demote(idx)`: relink before head, then advance head past it (tail)
//! - `grow(n)`: link `n` empty slots at the tail
//! - `shrink_tail()`: unlink the tail slot, returning its entry
//!
//! All of the above are O(1) (`grow` is O(1) per slot). Unlinked slots park
//! on a spare list and are relinked before the arena allocates again, so a
//! shrink/grow cycle does not reallocate.

/// One ring position: an optional key/value entry plus its ring links.
///
/// `prev`/`next` are arena indices, not owning references; the ring owns
/// every slot through the arena.
#[derive(Debug)]
struct Slot<K, V> {
    entry: Option<(K, V)>,
    prev: usize,
    next: usize,
}

/// Fixed-population circular slot arena with a designated MRU head.
///
/// The slot directly preceding `head` is the ring's tail: the least
/// recently used slot when occupied, the next reuse candidate when empty.
/// Capacity is always at least 1; the engine and builder enforce that
/// before construction.
#[derive(Debug)]
pub struct SlotRing<K, V> {
    slots: Vec<Slot<K, V>>,
    /// Unlinked slot indices available for relinking on `grow`.
    spare: Vec<usize>,
    head: usize,
    linked: usize,
}

impl<K, V> SlotRing<K, V> {
    /// Creates a ring of `capacity` linked empty slots.
    ///
    /// Callers validate `capacity >= 1`; a zero-slot ring has no tail and
    /// is structurally meaningless.
    pub fn new(capacity: usize) -> Self {
        debug_assert!(capacity >= 1, "slot ring requires capacity >= 1");
        let mut slots = Vec::with_capacity(capacity);
        for i in 0..capacity {
            slots.push(Slot {
                entry: None,
                prev: (i + capacity - 1) % capacity,
                next: (i + 1) % capacity,
            });
        }
        Self {
            slots,
            spare: Vec::new(),
            head: 0,
            linked: capacity,
        }
    }

    /// Number of linked slots (the semantic capacity).
    pub fn capacity(&self) -> usize {
        self.linked
    }

    /// Index of the most recently used slot.
    pub fn head_index(&self) -> usize {
        self.head
    }

    /// Index of the slot directly preceding head.
    pub fn tail_index(&self) -> usize {
        self.slots[self.head].prev
    }

    /// Index of the slot directly preceding `idx` in ring order.
    pub fn prev_index(&self, idx: usize) -> usize {
        self.slots[idx].prev
    }

    /// Entry stored at `idx`, if the slot is occupied.
    pub fn entry(&self, idx: usize) -> Option<(&K, &V)> {
        self.slots[idx].entry.as_ref().map(|(k, v)| (k, v))
    }

    /// Mutable value stored at `idx`, if the slot is occupied.
    pub fn value_mut(&mut self, idx: usize) -> Option<&mut V> {
        self.slots[idx].entry.as_mut().map(|(_, v)| v)
    }

    /// Removes and returns the entry at `idx`, leaving the slot empty and
    /// linked in place.
    pub fn take(&mut self, idx: usize) -> Option<(K, V)> {
        self.slots[idx].entry.take()
    }

    /// Stores an entry into the (empty) slot at `idx`.
    pub fn fill(&mut self, idx: usize, key: K, value: V) {
        debug_assert!(self.slots[idx].entry.is_none(), "fill of occupied slot");
        self.slots[idx].entry = Some((key, value));
    }

    /// Makes `idx` the most recently used slot.
    ///
    /// Relinks the slot so it directly precedes head, then moves the head
    /// designation onto it. A no-op when `idx` is already head; every other
    /// slot keeps its relative order.
    pub fn promote(&mut self, idx: usize) {
        self.relink_before_head(idx);
        self.head = idx;
    }

    /// Makes `idx` the tail (least recently used) slot.
    ///
    /// Relinks the slot so it directly precedes head, then advances head to
    /// its successor. Correct even when `idx` is head itself: the successor
    /// becomes the new head and `idx` ends up as its predecessor.
    pub fn demote(&mut self, idx: usize) {
        self.relink_before_head(idx);
        self.head = self.slots[idx].next;
    }

    /// Links `n` empty slots directly before head, extending the empty run
    /// at the tail.
    pub fn grow(&mut self, n: usize) {
        for _ in 0..n {
            let idx = match self.spare.pop() {
                Some(idx) => idx,
                None => {
                    self.slots.push(Slot {
                        entry: None,
                        prev: 0,
                        next: 0,
                    });
                    self.slots.len() - 1
                }
            };
            let tail = self.slots[self.head].prev;
            self.slots[idx].prev = tail;
            self.slots[idx].next = self.head;
            self.slots[tail].next = idx;
            let head = self.head;
            self.slots[head].prev = idx;
            self.linked += 1;
        }
    }

    /// Unlinks the tail slot and returns whatever entry it held.
    ///
    /// The unlinked slot is parked for reuse by a later [`grow`](Self::grow).
    /// Callers never shrink the last slot; a ring of size zero is invalid.
    pub fn shrink_tail(&mut self) -> Option<(K, V)> {
        debug_assert!(self.linked > 1, "shrink below capacity 1");
        let tail = self.slots[self.head].prev;
        let before = self.slots[tail].prev;
        self.slots[before].next = self.head;
        let head = self.head;
        self.slots[head].prev = before;
        self.slots[tail].prev = tail;
        self.slots[tail].next = tail;
        self.linked -= 1;
        self.spare.push(tail);
        self.slots[tail].entry.take()
    }

    /// Empties every slot in place; links and head are untouched.
    pub fn clear_entries(&mut self) {
        for slot in &mut self.slots {
            slot.entry = None;
        }
    }

    /// Iterates occupied entries from head (MRU) toward the tail (LRU).
    ///
    /// `occupied` is the caller's occupied-slot count; because occupied
    /// slots form a contiguous run starting at head, the walk visits
    /// exactly those slots.
    pub fn iter_occupied(&self, occupied: usize) -> OccupiedIter<'_, K, V> {
        OccupiedIter {
            ring: self,
            current: self.head,
            remaining: occupied,
        }
    }

    /// Relinks `idx` so it directly precedes head, leaving every other
    /// slot's relative order unchanged. Works when `idx` already precedes
    /// head and when `idx` is head itself.
    fn relink_before_head(&mut self, idx: usize) {
        let (prev, next) = {
            let slot = &self.slots[idx];
            (slot.prev, slot.next)
        };
        self.slots[prev].next = next;
        self.slots[next].prev = prev;

        let tail = self.slots[self.head].prev;
        let after_tail = self.slots[tail].next;
        self.slots[idx].prev = tail;
        self.slots[idx].next = after_tail;
        self.slots[after_tail].prev = idx;
        self.slots[tail].next = idx;
    }

    #[cfg(any(test, debug_assertions))]
    /// Walks the ring and asserts link symmetry, the linked-slot count, and
    /// the empty-run invariant (occupied slots contiguous from head).
    pub fn debug_validate(&self, occupied: usize) {
        let mut count = 0usize;
        let mut seen_empty = false;
        let mut occupied_count = 0usize;
        let mut current = self.head;
        loop {
            let slot = &self.slots[current];
            assert_eq!(
                self.slots[slot.next].prev, current,
                "next/prev link mismatch at slot {current}"
            );
            if slot.entry.is_some() {
                assert!(
                    !seen_empty,
                    "occupied slot {current} after the empty run began"
                );
                occupied_count += 1;
            } else {
                seen_empty = true;
            }
            count += 1;
            assert!(count <= self.linked, "cycle longer than linked count");
            current = slot.next;
            if current == self.head {
                break;
            }
        }
        assert_eq!(count, self.linked);
        assert_eq!(occupied_count, occupied);
    }
}

/// Iterator over occupied entries, most recently used first.
pub struct OccupiedIter<'a, K, V> {
    ring: &'a SlotRing<K, V>,
    current: usize,
    remaining: usize,
}

impl<'a, K, V> Iterator for OccupiedIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let slot = &self.ring.slots[self.current];
        self.current = slot.next;
        slot.entry.as_ref().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}
