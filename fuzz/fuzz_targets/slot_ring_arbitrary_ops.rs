#![no_main]

use libfuzzer_sys::fuzz_target;
use ringcache::ds::SlotRing;

// Fuzz arbitrary operation sequences on SlotRing
//
// Random sequences of fill/take/promote/demote/grow/shrink, restricted to
// the engine's usage contract (only occupied slots are promoted, only
// emptied slots are demoted), checked against the ring's debug validation
// after every step: link symmetry, linked-slot count, and the empty-run
// invariant.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let capacity = (data[0] as usize % 32).max(1);
    let mut ring: SlotRing<u8, u8> = SlotRing::new(capacity);
    let mut occupied = 0usize;

    let mut idx = 1;
    while idx + 1 < data.len() {
        let op = data[idx] % 6;
        let arg = data[idx + 1];
        idx += 2;

        match op {
            0 => {
                // Fill the tail slot if empty, then promote it (insert path).
                let tail = ring.tail_index();
                if ring.entry(tail).is_none() {
                    ring.fill(tail, arg, arg);
                    ring.promote(tail);
                    occupied += 1;
                }
            }
            1 => {
                // Empty the head slot and park it at the tail (delete path).
                let head = ring.head_index();
                if ring.take(head).is_some() {
                    occupied -= 1;
                    ring.demote(head);
                }
            }
            2 => {
                // Promote the LRU entry when the ring is full (get path).
                if occupied == ring.capacity() {
                    let tail = ring.tail_index();
                    ring.promote(tail);
                }
            }
            3 => {
                // Promoting the head must be idempotent.
                let head = ring.head_index();
                ring.promote(head);
            }
            4 => {
                ring.grow(arg as usize % 8);
            }
            _ => {
                // Shrink evicts whatever occupies the tail (resize path).
                if ring.capacity() > 1 && ring.shrink_tail().is_some() {
                    occupied -= 1;
                }
            }
        }

        ring.debug_validate(occupied);
    }
});
