//! Outbound report messages
//!
//! Execution reports confirm receipt of an order, relay status changes and
//! fills on working orders, and reject new orders. Cancel rejects answer
//! cancel and cancel/replace requests that cannot be honored.

use crate::ids::{
    AccountId, ClientOrderId, ExecutionId, InstrumentId, OrderId, RoutingId, SessionId,
    TransactionId,
};
use crate::numeric::{ExecutedValue, Price, Quantity};
use crate::order::{
    CxlRejResponseTo, ExecutionType, OrderStatus, OrderType, RestingOrder, Side, TimeInForce,
};
use crate::requests::{NewOrderSingle, OrderCancelReplaceRequest, OrderCancelRequest};
use serde::{Deserialize, Serialize};

/// Snapshot of a single order's state at one point in its lifecycle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub transaction_id: TransactionId,
    pub execution_id: ExecutionId,
    pub execution_type: ExecutionType,
    pub order_id: OrderId,
    pub routing_id: RoutingId,
    pub session_id: SessionId,
    pub account_id: AccountId,
    pub instrument_id: InstrumentId,
    pub side: Side,
    pub order_type: OrderType,
    pub time_in_force: TimeInForce,
    pub order_status: OrderStatus,
    pub order_price: Price,
    pub order_quantity: Quantity,
    pub leaves_quantity: Quantity,
    pub executed_quantity: Quantity,
    pub executed_value: ExecutedValue,
    pub last_price: Price,
    pub last_quantity: Quantity,
    pub client_order_id: ClientOrderId,
    pub orig_client_order_id: ClientOrderId,
    /// Unix nanos of the state change this report describes
    pub transact_time: i64,
}

impl ExecutionReport {
    /// Snapshot a resting order
    pub fn from_order(
        transaction_id: TransactionId,
        execution_id: ExecutionId,
        execution_type: ExecutionType,
        order: &RestingOrder,
    ) -> Self {
        Self {
            transaction_id,
            execution_id,
            execution_type,
            order_id: order.order_id,
            routing_id: order.routing_id,
            session_id: order.session_id,
            account_id: order.account_id,
            instrument_id: order.instrument_id,
            side: order.side,
            order_type: order.order_type,
            time_in_force: order.time_in_force,
            order_status: order.order_status,
            order_price: order.order_price,
            order_quantity: order.order_quantity,
            leaves_quantity: order.leaves_quantity,
            executed_quantity: order.executed_quantity,
            executed_value: order.executed_value,
            last_price: order.last_price,
            last_quantity: order.last_quantity,
            client_order_id: order.client_order_id.clone(),
            orig_client_order_id: order.orig_client_order_id.clone(),
            transact_time: order.last_modify_time,
        }
    }

    /// Snapshot a new order request before it enters the book
    ///
    /// Used for the pending-new acknowledgement and for rejects of orders
    /// that never rest. A rejected order leaves nothing open.
    pub fn from_new_order(
        transaction_id: TransactionId,
        execution_id: ExecutionId,
        request: &NewOrderSingle,
        order_id: OrderId,
        order_status: OrderStatus,
        now: i64,
    ) -> Self {
        let leaves_quantity = if order_status == OrderStatus::Rejected {
            Quantity::ZERO
        } else {
            request.order_quantity
        };
        Self {
            transaction_id,
            execution_id,
            execution_type: ExecutionType::New,
            order_id,
            routing_id: request.routing_id,
            session_id: request.session_id,
            account_id: request.account_id,
            instrument_id: request.instrument_id,
            side: request.side,
            order_type: request.order_type,
            time_in_force: request.time_in_force,
            order_status,
            order_price: request.order_price,
            order_quantity: request.order_quantity,
            leaves_quantity,
            executed_quantity: Quantity::ZERO,
            executed_value: 0,
            last_price: Price::ZERO,
            last_quantity: Quantity::ZERO,
            client_order_id: request.client_order_id.clone(),
            orig_client_order_id: ClientOrderId::default(),
            transact_time: now,
        }
    }
}

/// Answer to a cancel or cancel/replace request that cannot be honored
///
/// Carries the client order ids which were specified on the failing request
/// so the client can identify it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderCancelReject {
    pub transaction_id: TransactionId,
    pub order_id: OrderId,
    pub routing_id: RoutingId,
    pub session_id: SessionId,
    pub order_status: OrderStatus,
    pub cxl_rej_response_to: CxlRejResponseTo,
    pub client_order_id: ClientOrderId,
    pub orig_client_order_id: ClientOrderId,
}

impl OrderCancelReject {
    /// Reject an order cancel request
    pub fn from_cancel(transaction_id: TransactionId, request: &OrderCancelRequest) -> Self {
        Self {
            transaction_id,
            order_id: request.order_id,
            routing_id: request.routing_id,
            session_id: request.session_id,
            order_status: OrderStatus::CancelRejected,
            cxl_rej_response_to: CxlRejResponseTo::OrderCancelRequest,
            client_order_id: request.client_order_id.clone(),
            orig_client_order_id: request.orig_client_order_id.clone(),
        }
    }

    /// Reject an order cancel/replace request
    pub fn from_replace(
        transaction_id: TransactionId,
        request: &OrderCancelReplaceRequest,
    ) -> Self {
        Self {
            transaction_id,
            order_id: request.order_id,
            routing_id: request.routing_id,
            session_id: request.session_id,
            order_status: OrderStatus::CancelRejected,
            cxl_rej_response_to: CxlRejResponseTo::OrderCancelReplaceRequest,
            client_order_id: request.client_order_id.clone(),
            orig_client_order_id: request.orig_client_order_id.clone(),
        }
    }
}

/// Ingress reject for a request that never reached the engine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reject {
    pub client_order_id: ClientOrderId,
    pub orig_client_order_id: ClientOrderId,
    pub reason: String,
}

impl Reject {
    pub fn new(
        client_order_id: ClientOrderId,
        orig_client_order_id: ClientOrderId,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            client_order_id,
            orig_client_order_id,
            reason: reason.into(),
        }
    }
}
