//! Per-instrument limit order book
//!
//! The single-threaded state machine that turns order lifecycle requests
//! into executions and status events. Owns the two half-books and the
//! monotonic order, transaction and execution id counters; all request
//! handling and matching for one instrument runs on one logical thread.

use tracing::{debug, warn};
use types::ids::{ExecutionId, InstrumentId, OrderId, SessionId, TransactionId};
use types::numeric::{Price, Quantity};
use types::order::{ExecutionType, OrderStatus, RestingOrder, Side};
use types::report::{ExecutionReport, OrderCancelReject};
use types::requests::{NewOrderSingle, OrderCancelReplaceRequest, OrderCancelRequest};

use super::half_book::{BookSide, HalfBook};
use crate::events::{EventDispatcher, EventKind, OrderEvent};
use crate::matching;

/// A limit order book for one instrument
pub struct LimitOrderBook {
    instrument_id: InstrumentId,
    bids: HalfBook,
    asks: HalfBook,
    order_id_seq: u32,
    transaction_id_seq: u64,
    execution_id_seq: u32,
}

impl LimitOrderBook {
    pub fn new(instrument_id: InstrumentId, pool_size: usize) -> Self {
        Self {
            instrument_id,
            bids: HalfBook::new(BookSide::Bid, pool_size),
            asks: HalfBook::new(BookSide::Ask, pool_size),
            order_id_seq: 0,
            transaction_id_seq: 0,
            execution_id_seq: 0,
        }
    }

    pub fn instrument_id(&self) -> InstrumentId {
        self.instrument_id
    }

    pub fn bids(&self) -> &HalfBook {
        &self.bids
    }

    pub fn asks(&self) -> &HalfBook {
        &self.asks
    }

    /// Attempt to add a new order to the book
    ///
    /// Always acknowledges receipt first. The order is then either rejected
    /// (duplicate client order id, no pool capacity) or accepted and matched
    /// against the opposite side.
    pub fn add(&mut self, dispatcher: &mut EventDispatcher, request: &NewOrderSingle) {
        let order_id = self.next_order_id();
        let now = epoch_nanos();

        self.emit_request_report(
            dispatcher,
            EventKind::OrderPendingNew,
            request,
            order_id,
            OrderStatus::PendingNew,
            now,
        );

        let result = if request.side.is_buy() {
            self.bids.insert(request, order_id, now)
        } else {
            self.asks.insert(request, order_id, now)
        };

        match result {
            Ok(order) => {
                self.emit_order_report(dispatcher, EventKind::OrderNew, ExecutionType::New, &order);
                self.match_book(dispatcher, request.side);
            }
            Err(err) => {
                warn!(
                    instrument_id = %self.instrument_id,
                    client_order_id = %request.client_order_id,
                    %err,
                    "order rejected"
                );
                self.emit_request_report(
                    dispatcher,
                    EventKind::OrderRejected,
                    request,
                    order_id,
                    OrderStatus::Rejected,
                    now,
                );
            }
        }
    }

    /// Attempt to modify a resting order
    pub fn modify(&mut self, dispatcher: &mut EventDispatcher, request: &OrderCancelReplaceRequest) {
        let now = epoch_nanos();

        let result = if request.side.is_buy() {
            self.bids.modify(request, now)
        } else {
            self.asks.modify(request, now)
        };

        match result {
            Ok(order) => {
                let mut pending = order.clone();
                pending.order_status = OrderStatus::PendingModify;
                self.emit_order_report(
                    dispatcher,
                    EventKind::OrderPendingModify,
                    ExecutionType::Modified,
                    &pending,
                );
                self.emit_order_report(
                    dispatcher,
                    EventKind::OrderModified,
                    ExecutionType::Modified,
                    &order,
                );
                self.match_book(dispatcher, request.side);
            }
            Err(err) => {
                debug!(
                    instrument_id = %self.instrument_id,
                    order_id = %request.order_id,
                    %err,
                    "modify rejected"
                );
                let reject =
                    OrderCancelReject::from_replace(self.next_transaction_id(), request);
                dispatcher.dispatch(
                    EventKind::OrderCancelRejected,
                    &OrderEvent::OrderCancelReject(reject),
                );
            }
        }
    }

    /// Attempt to cancel a resting order
    pub fn cancel(&mut self, dispatcher: &mut EventDispatcher, request: &OrderCancelRequest) {
        let now = epoch_nanos();

        let result = if request.side.is_buy() {
            self.bids.remove(request)
        } else {
            self.asks.remove(request)
        };

        match result {
            Ok(mut order) => {
                order.cancel(now);
                self.emit_order_report(
                    dispatcher,
                    EventKind::OrderCancelled,
                    ExecutionType::Canceled,
                    &order,
                );
            }
            Err(err) => {
                debug!(
                    instrument_id = %self.instrument_id,
                    order_id = %request.order_id,
                    %err,
                    "cancel rejected"
                );
                let reject = OrderCancelReject::from_cancel(self.next_transaction_id(), request);
                dispatcher.dispatch(
                    EventKind::OrderCancelRejected,
                    &OrderEvent::OrderCancelReject(reject),
                );
            }
        }
    }

    /// Cancel every resting order owned by a session, on both sides
    ///
    /// Used on session disconnect. Emits one cancelled event per order.
    pub fn cancel_all_by_session(
        &mut self,
        dispatcher: &mut EventDispatcher,
        session_id: SessionId,
    ) {
        let now = epoch_nanos();
        let mut removed = self.bids.cancel_session(session_id);
        removed.append(&mut self.asks.cancel_session(session_id));

        if !removed.is_empty() {
            debug!(
                instrument_id = %self.instrument_id,
                session_id = %session_id,
                count = removed.len(),
                "cancelled resting orders for disconnected session"
            );
        }

        for mut order in removed {
            order.cancel(now);
            self.emit_order_report(
                dispatcher,
                EventKind::OrderCancelled,
                ExecutionType::Canceled,
                &order,
            );
        }
    }

    /// Match until the book is uncrossed or one side is empty
    ///
    /// Each step trades the two front orders at the resting side's price and
    /// reports the buy-side fill before the sell-side fill, with consecutive
    /// execution ids.
    pub fn match_book(&mut self, dispatcher: &mut EventDispatcher, aggressor: Side) {
        loop {
            let (bid_price, ask_price, bid_leaves, ask_leaves) =
                match (self.bids.front(), self.asks.front()) {
                    (Some(bid), Some(ask)) => (
                        bid.order_price,
                        ask.order_price,
                        bid.leaves_quantity,
                        ask.leaves_quantity,
                    ),
                    _ => return,
                };

            if !matching::crossed(bid_price, ask_price) {
                return;
            }

            let price = matching::execution_price(aggressor, bid_price, ask_price);
            let quantity = bid_leaves.min(ask_leaves);
            let now = epoch_nanos();

            self.execute_front(dispatcher, BookSide::Bid, price, quantity, now);
            self.execute_front(dispatcher, BookSide::Ask, price, quantity, now);
        }
    }

    /// True iff both order containers are empty
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    /// Number of resting orders on both sides
    pub fn count(&self) -> usize {
        self.bids.len() + self.asks.len()
    }

    /// Clear both order containers
    pub fn reset(&mut self) {
        self.bids.clear();
        self.asks.clear();
    }

    /// Execute one fill against the front of a side and report it
    fn execute_front(
        &mut self,
        dispatcher: &mut EventDispatcher,
        side: BookSide,
        price: Price,
        quantity: Quantity,
        now: i64,
    ) {
        let book = match side {
            BookSide::Bid => &mut self.bids,
            BookSide::Ask => &mut self.asks,
        };

        let snapshot = {
            let Some(order) = book.front_mut() else { return };
            order.fill(price, quantity, now);
            order.clone()
        };

        if snapshot.leaves_quantity.is_zero() {
            book.remove_front();
            self.emit_order_report(dispatcher, EventKind::OrderFilled, ExecutionType::New, &snapshot);
        } else {
            self.emit_order_report(
                dispatcher,
                EventKind::OrderPartiallyFilled,
                ExecutionType::New,
                &snapshot,
            );
        }
    }

    fn emit_request_report(
        &mut self,
        dispatcher: &mut EventDispatcher,
        kind: EventKind,
        request: &NewOrderSingle,
        order_id: OrderId,
        order_status: OrderStatus,
        now: i64,
    ) {
        let transaction_id = self.next_transaction_id();
        let execution_id = self.next_execution_id();
        let report = ExecutionReport::from_new_order(
            transaction_id,
            execution_id,
            request,
            order_id,
            order_status,
            now,
        );
        dispatcher.dispatch(kind, &OrderEvent::ExecutionReport(report));
    }

    fn emit_order_report(
        &mut self,
        dispatcher: &mut EventDispatcher,
        kind: EventKind,
        execution_type: ExecutionType,
        order: &RestingOrder,
    ) {
        let transaction_id = self.next_transaction_id();
        let execution_id = self.next_execution_id();
        let report =
            ExecutionReport::from_order(transaction_id, execution_id, execution_type, order);
        dispatcher.dispatch(kind, &OrderEvent::ExecutionReport(report));
    }

    fn next_order_id(&mut self) -> OrderId {
        self.order_id_seq += 1;
        OrderId::new(self.order_id_seq)
    }

    fn next_transaction_id(&mut self) -> TransactionId {
        self.transaction_id_seq += 1;
        TransactionId::new(self.transaction_id_seq)
    }

    fn next_execution_id(&mut self) -> ExecutionId {
        self.execution_id_seq += 1;
        ExecutionId::new(self.execution_id_seq)
    }
}

fn epoch_nanos() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as i64)
        .unwrap_or(0)
}
