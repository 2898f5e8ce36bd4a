//! Order lifecycle types
//!
//! Enumerations shared by every order-like message, and the resting order
//! entity stored inside the book.

use crate::ids::{AccountId, ClientOrderId, InstrumentId, OrderId, RoutingId, SessionId};
use crate::numeric::{ExecutedValue, Price, Quantity};
use crate::requests::NewOrderSingle;
use serde::{Deserialize, Serialize};

/// Order side
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    #[default]
    Unknown,
    Buy,
    Sell,
    SellShort,
    BuyCover,
}

impl Side {
    /// Buy-like sides rest in the bid container
    pub fn is_buy(&self) -> bool {
        matches!(self, Side::Buy | Side::BuyCover)
    }

    /// Sell-like sides rest in the ask container
    pub fn is_sell(&self) -> bool {
        matches!(self, Side::Sell | Side::SellShort)
    }
}

/// Order status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    #[default]
    Unknown,
    PendingNew,
    PendingModify,
    PendingCancel,
    Rejected,
    New,
    PartiallyFilled,
    Filled,
    Cancelled,
    Completed,
    CancelRejected,
}

impl OrderStatus {
    /// Terminal statuses admit no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Rejected
                | OrderStatus::Filled
                | OrderStatus::Cancelled
                | OrderStatus::Completed
        )
    }
}

/// Order type
///
/// Only limit orders are honored by the matching engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderType {
    #[default]
    Unknown,
    Market,
    Limit,
    Stop,
    StopLimit,
}

/// Time-in-force policy
///
/// Day is the required behavior; the other values are accepted and stored
/// but carry no match-time differentiation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeInForce {
    #[default]
    Unknown,
    Day,
    Gtc,
    Ioc,
    Fok,
}

/// Execution type carried on execution reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExecutionType {
    #[default]
    Unknown,
    New,
    Canceled,
    Modified,
}

/// Which request a cancel reject responds to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CxlRejResponseTo {
    #[default]
    Unknown,
    OrderCancelRequest,
    OrderCancelReplaceRequest,
}

/// A resting order owned by the book
///
/// Created by an accepted add, mutated only by matching or by modify, and
/// destroyed by cancel, by being fully filled, or by a session-wide cancel.
/// Invariants: `0 <= executed_quantity <= order_quantity` and
/// `leaves_quantity = order_quantity - executed_quantity`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RestingOrder {
    pub order_id: OrderId,
    pub routing_id: RoutingId,
    pub session_id: SessionId,
    pub account_id: AccountId,
    pub instrument_id: InstrumentId,
    pub side: Side,
    pub order_type: OrderType,
    pub time_in_force: TimeInForce,
    pub order_price: Price,
    pub order_quantity: Quantity,
    pub leaves_quantity: Quantity,
    pub executed_quantity: Quantity,
    pub executed_value: ExecutedValue,
    pub last_price: Price,
    pub last_quantity: Quantity,
    pub order_status: OrderStatus,
    pub client_order_id: ClientOrderId,
    pub orig_client_order_id: ClientOrderId,
    /// Unix nanos
    pub create_time: i64,
    /// Unix nanos
    pub last_modify_time: i64,
}

impl RestingOrder {
    /// Build the resting order for an accepted new order request
    pub fn accept(request: &NewOrderSingle, order_id: OrderId, now: i64) -> Self {
        Self {
            order_id,
            routing_id: request.routing_id,
            session_id: request.session_id,
            account_id: request.account_id,
            instrument_id: request.instrument_id,
            side: request.side,
            order_type: request.order_type,
            time_in_force: request.time_in_force,
            order_price: request.order_price,
            order_quantity: request.order_quantity,
            leaves_quantity: request.order_quantity,
            executed_quantity: Quantity::ZERO,
            executed_value: 0,
            last_price: Price::ZERO,
            last_quantity: Quantity::ZERO,
            order_status: OrderStatus::New,
            client_order_id: request.client_order_id.clone(),
            orig_client_order_id: ClientOrderId::default(),
            create_time: now,
            last_modify_time: now,
        }
    }

    /// Apply one execution to this order
    ///
    /// The fill quantity must not exceed `leaves_quantity`.
    pub fn fill(&mut self, price: Price, quantity: Quantity, now: i64) {
        self.executed_quantity += quantity;
        self.executed_value += price.notional(quantity);
        self.leaves_quantity -= quantity;
        self.last_price = price;
        self.last_quantity = quantity;
        self.order_status = if self.leaves_quantity.is_positive() {
            OrderStatus::PartiallyFilled
        } else {
            OrderStatus::Filled
        };
        self.mark(now);
    }

    /// Re-derive status and leaves from the executed and order quantities
    pub fn refresh_status(&mut self) {
        if self.executed_quantity == self.order_quantity {
            self.leaves_quantity = Quantity::ZERO;
            self.order_status = OrderStatus::Filled;
        } else if self.executed_quantity.is_positive() {
            self.leaves_quantity = self.order_quantity - self.executed_quantity;
            self.order_status = OrderStatus::PartiallyFilled;
        } else {
            self.leaves_quantity = self.order_quantity;
            self.order_status = OrderStatus::New;
        }
    }

    /// Stamp the order as cancelled
    ///
    /// The remaining quantity is released: the order quantity collapses to
    /// what already executed and the last execution fields are zeroed.
    pub fn cancel(&mut self, now: i64) {
        self.last_price = Price::ZERO;
        self.last_quantity = Quantity::ZERO;
        self.leaves_quantity = Quantity::ZERO;
        self.order_quantity = self.executed_quantity;
        self.order_status = OrderStatus::Cancelled;
        self.mark(now);
    }

    pub fn is_filled(&self) -> bool {
        self.executed_quantity == self.order_quantity
    }

    /// Update the last-modify timestamp
    pub fn mark(&mut self, now: i64) {
        self.last_modify_time = now;
    }
}
