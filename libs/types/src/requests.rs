//! Inbound order lifecycle messages
//!
//! The three request shapes a gateway translates external protocol messages
//! into. The gateway validates them at ingress; the engine treats them as
//! well-formed.

use crate::ids::{AccountId, ClientOrderId, InstrumentId, OrderId, RoutingId, SessionId};
use crate::numeric::{Price, Quantity};
use crate::order::{OrderType, Side, TimeInForce};
use serde::{Deserialize, Serialize};

/// Request to submit a new order for execution
///
/// Carries no server order id; the engine synthesizes one on receipt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewOrderSingle {
    pub routing_id: RoutingId,
    pub session_id: SessionId,
    pub account_id: AccountId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub side: Side,
    pub order_type: OrderType,
    pub time_in_force: TimeInForce,
    pub order_price: Price,
    pub order_quantity: Quantity,
}

/// Request to cancel the remaining quantity of an existing order
///
/// A cancel request names the whole residual; use a cancel/replace request
/// to reduce an order partially. Side, price and quantity are carried for
/// validation against the resting order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderCancelRequest {
    pub order_id: OrderId,
    pub routing_id: RoutingId,
    pub session_id: SessionId,
    pub instrument_id: InstrumentId,
    pub side: Side,
    pub order_price: Price,
    pub order_quantity: Quantity,
    pub client_order_id: ClientOrderId,
    pub orig_client_order_id: ClientOrderId,
}

/// Request to change the price or quantity of an existing order
///
/// `orig_client_order_id` names the resting order's current client id;
/// `client_order_id` becomes its new client id on acceptance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderCancelReplaceRequest {
    pub order_id: OrderId,
    pub routing_id: RoutingId,
    pub session_id: SessionId,
    pub instrument_id: InstrumentId,
    pub side: Side,
    pub order_type: OrderType,
    pub order_price: Price,
    pub order_quantity: Quantity,
    pub client_order_id: ClientOrderId,
    pub orig_client_order_id: ClientOrderId,
}
