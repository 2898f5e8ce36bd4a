//! Price level with a FIFO queue of pooled orders
//!
//! A price level contains all resting orders at one price, in strict
//! time-priority order. The queue is a doubly-linked list threaded through
//! the order pool's slots, so push, pop, erase-by-position and
//! splice-to-tail are all O(1) and never reallocate. Positions stay stable
//! across unrelated insertions and deletions at the same level.

use crate::pool::{OrderPool, SlotId};

/// FIFO queue of resting orders at one price
#[derive(Debug, Default)]
pub(crate) struct PriceLevel {
    head: Option<SlotId>,
    tail: Option<SlotId>,
    len: usize,
}

impl PriceLevel {
    /// Append a slot at the back of the queue (lowest time priority)
    pub(crate) fn push_back(&mut self, pool: &mut OrderPool, slot: SlotId) {
        pool.set_next(slot, None);
        pool.set_prev(slot, self.tail);
        match self.tail {
            Some(tail) => pool.set_next(tail, Some(slot)),
            None => self.head = Some(slot),
        }
        self.tail = Some(slot);
        self.len += 1;
    }

    /// Remove a slot from anywhere in the queue
    pub(crate) fn unlink(&mut self, pool: &mut OrderPool, slot: SlotId) {
        let prev = pool.prev(slot);
        let next = pool.next(slot);
        match prev {
            Some(prev) => pool.set_next(prev, next),
            None => self.head = next,
        }
        match next {
            Some(next) => pool.set_prev(next, prev),
            None => self.tail = prev,
        }
        pool.set_next(slot, None);
        pool.set_prev(slot, None);
        self.len -= 1;
    }

    /// Splice a slot to the back of its own queue, forfeiting time priority
    pub(crate) fn move_to_back(&mut self, pool: &mut OrderPool, slot: SlotId) {
        if self.tail == Some(slot) {
            return;
        }
        self.unlink(pool, slot);
        self.push_back(pool, slot);
    }

    /// Highest-priority slot at this price
    pub(crate) fn front(&self) -> Option<SlotId> {
        self.head
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterate slots in insertion order
    pub(crate) fn iter<'a>(&self, pool: &'a OrderPool) -> LevelIter<'a> {
        LevelIter {
            pool,
            cursor: self.head,
        }
    }
}

pub(crate) struct LevelIter<'a> {
    pool: &'a OrderPool,
    cursor: Option<SlotId>,
}

impl Iterator for LevelIter<'_> {
    type Item = SlotId;

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.cursor?;
        self.cursor = self.pool.next(slot);
        Some(slot)
    }
}
