//! Bounded pool of resting-order slots
//!
//! The pool preallocates every resting order the book will ever hold and
//! recycles slots through a free list, so the matching hot path performs no
//! allocation. Slot positions are stable for the lifetime of an order, which
//! lets the price-level queues thread their links directly through the pool.
//!
//! The free list is single-threaded (each engine instance owns its pools
//! exclusively); only the depth metrics are atomics so monitoring can read
//! them concurrently. Those reads are advisory.

use std::sync::atomic::{AtomicU32, Ordering};
use tracing::{debug, warn};
use types::order::RestingOrder;

/// Stable position of an order inside its pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SlotId(u32);

impl SlotId {
    pub(crate) fn index(&self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Default)]
struct Slot {
    order: RestingOrder,
    next: Option<SlotId>,
    prev: Option<SlotId>,
}

/// Bounded, per-half-book allocator of resting-order slots
pub struct OrderPool {
    slots: Vec<Slot>,
    free: Vec<u32>,
    available: AtomicU32,
    max_depth: AtomicU32,
}

impl OrderPool {
    /// Preallocate a pool of `capacity` resting-order slots
    pub fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, Slot::default);
        // Lowest indexes are handed out first
        let free: Vec<u32> = (0..capacity as u32).rev().collect();
        Self {
            slots,
            free,
            available: AtomicU32::new(capacity as u32),
            max_depth: AtomicU32::new(0),
        }
    }

    /// Take a free slot, or `None` when the pool is exhausted
    pub(crate) fn take(&mut self) -> Option<SlotId> {
        let Some(index) = self.free.pop() else {
            warn!(capacity = self.slots.len(), "order pool exhausted");
            return None;
        };
        self.available.store(self.free.len() as u32, Ordering::Relaxed);

        let depth = (self.slots.len() - self.free.len()) as u32;
        if depth > self.max_depth.load(Ordering::Relaxed) {
            self.max_depth.store(depth, Ordering::Relaxed);
            debug!(depth, "order pool high-water mark");
        }

        Some(SlotId(index))
    }

    /// Return a slot to the pool
    ///
    /// Offering to an already-full pool drops the offer.
    pub(crate) fn offer(&mut self, slot: SlotId) {
        if self.free.len() == self.slots.len() {
            warn!(slot = slot.0, "slot offered to a full pool, dropping");
            return;
        }
        let entry = &mut self.slots[slot.index()];
        entry.order = RestingOrder::default();
        entry.next = None;
        entry.prev = None;
        self.free.push(slot.0);
        self.available.store(self.free.len() as u32, Ordering::Relaxed);
    }

    pub(crate) fn order(&self, slot: SlotId) -> &RestingOrder {
        &self.slots[slot.index()].order
    }

    pub(crate) fn order_mut(&mut self, slot: SlotId) -> &mut RestingOrder {
        &mut self.slots[slot.index()].order
    }

    pub(crate) fn next(&self, slot: SlotId) -> Option<SlotId> {
        self.slots[slot.index()].next
    }

    pub(crate) fn prev(&self, slot: SlotId) -> Option<SlotId> {
        self.slots[slot.index()].prev
    }

    pub(crate) fn set_next(&mut self, slot: SlotId, next: Option<SlotId>) {
        self.slots[slot.index()].next = next;
    }

    pub(crate) fn set_prev(&mut self, slot: SlotId, prev: Option<SlotId>) {
        self.slots[slot.index()].prev = prev;
    }

    /// Total number of slots
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of free slots
    pub fn available(&self) -> u32 {
        self.available.load(Ordering::Relaxed)
    }

    /// Number of live slots
    pub fn depth(&self) -> u32 {
        self.capacity() as u32 - self.available()
    }

    /// Highest number of slots ever live at once
    pub fn max_depth(&self) -> u32 {
        self.max_depth.load(Ordering::Relaxed)
    }
}
