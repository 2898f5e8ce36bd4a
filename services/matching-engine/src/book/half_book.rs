//! One side of a limit order book
//!
//! Maintains price levels in comparator order (bids best-first descending,
//! asks best-first ascending) with FIFO time priority inside each level.
//! Two indexes back the lifecycle operations: order id to pool slot, and
//! `(session, client order id)` to order id for duplicate detection.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as _;
use thiserror::Error;
use tracing::error;
use types::ids::{ClientOrderId, OrderId, SessionId};
use types::numeric::Price;
use types::order::RestingOrder;
use types::requests::{NewOrderSingle, OrderCancelReplaceRequest, OrderCancelRequest};

use super::price_level::PriceLevel;
use crate::pool::{OrderPool, SlotId};

/// Which side of the book a container holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookSide {
    Bid,
    Ask,
}

/// Why a half-book operation was not accepted
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookError {
    #[error("duplicate client order id for session")]
    DuplicateClientOrderId,

    #[error("order pool exhausted")]
    PoolExhausted,

    #[error("unknown order id: {0}")]
    UnknownOrder(OrderId),

    #[error("session does not own the order")]
    SessionMismatch,

    #[error("original client order id does not match the resting order")]
    ClientOrderIdMismatch,

    #[error("order quantity cannot be reduced below the executed quantity")]
    QuantityBelowExecuted,

    #[error("order indexes are out of sync")]
    InconsistentIndex,
}

/// One side of the book: ordered price levels over pooled resting orders
pub struct HalfBook {
    side: BookSide,
    levels: BTreeMap<Price, PriceLevel>,
    by_order_id: HashMap<OrderId, SlotId>,
    by_client: HashMap<(SessionId, ClientOrderId), OrderId>,
    pool: OrderPool,
    size: usize,
}

impl HalfBook {
    pub fn new(side: BookSide, pool_size: usize) -> Self {
        Self {
            side,
            levels: BTreeMap::new(),
            by_order_id: HashMap::new(),
            by_client: HashMap::new(),
            pool: OrderPool::with_capacity(pool_size),
            size: 0,
        }
    }

    pub fn side(&self) -> BookSide {
        self.side
    }

    /// Residual pool capacity for this half-book
    pub fn available(&self) -> u32 {
        self.pool.available()
    }

    /// Pool metrics for monitoring
    pub fn pool(&self) -> &OrderPool {
        &self.pool
    }

    /// Number of resting orders on this side
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Add a new resting order at the tail of its price level
    pub fn insert(
        &mut self,
        request: &NewOrderSingle,
        order_id: OrderId,
        now: i64,
    ) -> Result<RestingOrder, BookError> {
        let key = (request.session_id, request.client_order_id.clone());
        if self.by_client.contains_key(&key) {
            return Err(BookError::DuplicateClientOrderId);
        }

        let slot = self.pool.take().ok_or(BookError::PoolExhausted)?;
        *self.pool.order_mut(slot) = RestingOrder::accept(request, order_id, now);

        self.levels
            .entry(request.order_price)
            .or_default()
            .push_back(&mut self.pool, slot);
        self.by_order_id.insert(order_id, slot);
        self.by_client.insert(key, order_id);
        self.size += 1;

        Ok(self.pool.order(slot).clone())
    }

    /// Apply a cancel/replace to a resting order
    ///
    /// Queue priority survives only a pure quantity reduction (and a pure
    /// client-order-id rotation): a price change re-queues the order at the
    /// tail of the new level, and a quantity increase moves it to the tail
    /// of its current level.
    pub fn modify(
        &mut self,
        request: &OrderCancelReplaceRequest,
        now: i64,
    ) -> Result<RestingOrder, BookError> {
        let slot = *self
            .by_order_id
            .get(&request.order_id)
            .ok_or(BookError::UnknownOrder(request.order_id))?;

        {
            let order = self.pool.order(slot);
            if order.session_id != request.session_id {
                return Err(BookError::SessionMismatch);
            }
            if order.client_order_id != request.orig_client_order_id {
                return Err(BookError::ClientOrderIdMismatch);
            }
            if request.order_quantity < order.executed_quantity {
                return Err(BookError::QuantityBelowExecuted);
            }
        }

        // Rotate the client order id index to the new key
        self.by_client
            .remove(&(request.session_id, request.orig_client_order_id.clone()));
        self.by_client.insert(
            (request.session_id, request.client_order_id.clone()),
            request.order_id,
        );

        let (old_price, old_quantity) = {
            let order = self.pool.order_mut(slot);
            let old = (order.order_price, order.order_quantity);
            order.client_order_id = request.client_order_id.clone();
            order.orig_client_order_id = request.orig_client_order_id.clone();
            order.mark(now);
            old
        };

        if request.order_price != old_price {
            // Price change forfeits queue priority
            self.unlink_slot(old_price, slot);
            {
                let order = self.pool.order_mut(slot);
                order.order_price = request.order_price;
                order.order_quantity = request.order_quantity;
                order.refresh_status();
            }
            self.levels
                .entry(request.order_price)
                .or_default()
                .push_back(&mut self.pool, slot);
        } else if request.order_quantity < old_quantity {
            // Quantity down keeps queue priority
            let order = self.pool.order_mut(slot);
            order.order_quantity = request.order_quantity;
            order.refresh_status();
        } else if request.order_quantity > old_quantity {
            // Quantity up forfeits queue priority
            {
                let order = self.pool.order_mut(slot);
                order.order_quantity = request.order_quantity;
                order.refresh_status();
            }
            if let Some(level) = self.levels.get_mut(&old_price) {
                level.move_to_back(&mut self.pool, slot);
            }
        }

        let snapshot = self.pool.order(slot).clone();
        if snapshot.leaves_quantity.is_zero() {
            // Quantity lowered to exactly the executed amount: nothing left
            // to trade, so the order leaves the book
            self.remove_slot(slot);
        }
        Ok(snapshot)
    }

    /// Remove a resting order named by a cancel request
    pub fn remove(&mut self, request: &OrderCancelRequest) -> Result<RestingOrder, BookError> {
        let slot = *self
            .by_order_id
            .get(&request.order_id)
            .ok_or(BookError::UnknownOrder(request.order_id))?;

        let order = self.pool.order(slot);
        if order.session_id != request.session_id {
            return Err(BookError::SessionMismatch);
        }
        let key = (order.session_id, order.client_order_id.clone());
        if self.by_client.get(&key) != Some(&request.order_id) {
            error!(
                order_id = %request.order_id,
                "client order id index disagrees with order id index"
            );
            return Err(BookError::InconsistentIndex);
        }

        let snapshot = order.clone();
        self.remove_slot(slot);
        Ok(snapshot)
    }

    /// Remove every resting order belonging to a session
    ///
    /// Returns the removed orders in book priority order.
    pub fn cancel_session(&mut self, session_id: SessionId) -> Vec<RestingOrder> {
        let mut slots = Vec::new();
        for price in self.prices_best_first() {
            if let Some(level) = self.levels.get(&price) {
                for slot in level.iter(&self.pool) {
                    if self.pool.order(slot).session_id == session_id {
                        slots.push(slot);
                    }
                }
            }
        }

        let mut removed = Vec::with_capacity(slots.len());
        for slot in slots {
            removed.push(self.pool.order(slot).clone());
            self.remove_slot(slot);
        }
        removed
    }

    /// Highest-priority resting order (best price, earliest time)
    pub fn front(&self) -> Option<&RestingOrder> {
        self.front_slot().map(|slot| self.pool.order(slot))
    }

    pub fn front_mut(&mut self) -> Option<&mut RestingOrder> {
        let slot = self.front_slot()?;
        Some(self.pool.order_mut(slot))
    }

    /// Remove and return the highest-priority resting order
    pub fn remove_front(&mut self) -> Option<RestingOrder> {
        let slot = self.front_slot()?;
        let snapshot = self.pool.order(slot).clone();
        self.remove_slot(slot);
        Some(snapshot)
    }

    /// Drop every resting order and return all slots to the pool
    pub fn clear(&mut self) {
        let slots: Vec<SlotId> = self.by_order_id.values().copied().collect();
        for slot in slots {
            self.pool.offer(slot);
        }
        self.levels.clear();
        self.by_order_id.clear();
        self.by_client.clear();
        self.size = 0;
    }

    /// Render the price ladder for diagnostics
    pub fn debug_string(&self) -> String {
        let mut out = String::new();
        for price in self.prices_best_first() {
            if let Some(level) = self.levels.get(&price) {
                let _ = writeln!(out, "{}", price);
                for slot in level.iter(&self.pool) {
                    let order = self.pool.order(slot);
                    let _ = writeln!(
                        out,
                        " {} {} {} {}",
                        order.order_id,
                        order.client_order_id,
                        order.order_price,
                        order.order_quantity
                    );
                }
            }
        }
        out
    }

    fn front_slot(&self) -> Option<SlotId> {
        let level = match self.side {
            BookSide::Bid => self.levels.values().next_back(),
            BookSide::Ask => self.levels.values().next(),
        }?;
        level.front()
    }

    fn prices_best_first(&self) -> Vec<Price> {
        match self.side {
            BookSide::Bid => self.levels.keys().rev().copied().collect(),
            BookSide::Ask => self.levels.keys().copied().collect(),
        }
    }

    /// Detach a slot from its price level, dropping the level if empty
    fn unlink_slot(&mut self, price: Price, slot: SlotId) {
        if let Some(level) = self.levels.get_mut(&price) {
            level.unlink(&mut self.pool, slot);
            if level.is_empty() {
                self.levels.remove(&price);
            }
        }
    }

    /// Erase a slot from the queue and both indexes, and free it
    fn remove_slot(&mut self, slot: SlotId) {
        let (order_id, price, key) = {
            let order = self.pool.order(slot);
            (
                order.order_id,
                order.order_price,
                (order.session_id, order.client_order_id.clone()),
            )
        };
        self.unlink_slot(price, slot);
        self.by_order_id.remove(&order_id);
        self.by_client.remove(&key);
        self.size -= 1;
        self.pool.offer(slot);
    }
}
