//! End-to-end order book scenarios
//!
//! Drives the public book API through full lifecycles and checks the emitted
//! event stream: acknowledgement ordering, fill pricing, queue priority
//! across modifies, and reject behavior.

use rand::distributions::Alphanumeric;
use rand::Rng;
use std::cell::RefCell;
use std::rc::Rc;

use matching_engine::{EventDispatcher, EventKind, LimitOrderBook, OrderEvent};
use types::ids::{ClientOrderId, InstrumentId, OrderId, SessionId};
use types::numeric::{Price, Quantity};
use types::order::{CxlRejResponseTo, OrderStatus, OrderType, Side, TimeInForce};
use types::report::ExecutionReport;
use types::requests::{NewOrderSingle, OrderCancelReplaceRequest, OrderCancelRequest};

const ALL_KINDS: [EventKind; 12] = [
    EventKind::OrderPendingNew,
    EventKind::OrderPendingModify,
    EventKind::OrderPendingCancel,
    EventKind::OrderRejected,
    EventKind::OrderNew,
    EventKind::OrderPartiallyFilled,
    EventKind::OrderFilled,
    EventKind::OrderCancelled,
    EventKind::OrderCompleted,
    EventKind::OrderCancelRejected,
    EventKind::OrderModified,
    EventKind::CancelOnDisconnect,
];

type Recorded = Rc<RefCell<Vec<(EventKind, OrderEvent)>>>;

fn recording_dispatcher() -> (EventDispatcher, Recorded) {
    let mut dispatcher = EventDispatcher::new();
    let recorded: Recorded = Rc::new(RefCell::new(Vec::new()));
    for kind in ALL_KINDS {
        let recorded = recorded.clone();
        dispatcher.subscribe(kind, move |event| {
            recorded.borrow_mut().push((kind, event.clone()));
        });
    }
    (dispatcher, recorded)
}

fn kinds(recorded: &Recorded) -> Vec<EventKind> {
    recorded.borrow().iter().map(|(kind, _)| *kind).collect()
}

fn reports_of(recorded: &Recorded, kind: EventKind) -> Vec<ExecutionReport> {
    recorded
        .borrow()
        .iter()
        .filter(|(k, _)| *k == kind)
        .filter_map(|(_, event)| event.execution_report().cloned())
        .collect()
}

fn order_id_of_new(recorded: &Recorded, index: usize) -> OrderId {
    reports_of(recorded, EventKind::OrderNew)[index].order_id
}

fn random_client_order_id() -> ClientOrderId {
    let id: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect();
    ClientOrderId::from(id)
}

fn order(side: Side, price: i64, quantity: i32) -> NewOrderSingle {
    NewOrderSingle {
        session_id: SessionId::new(0),
        instrument_id: InstrumentId::new(1),
        client_order_id: random_client_order_id(),
        side,
        order_type: OrderType::Limit,
        time_in_force: TimeInForce::Day,
        order_price: Price::from_raw(price),
        order_quantity: Quantity::new(quantity),
        ..Default::default()
    }
}

fn buy(price: i64, quantity: i32) -> NewOrderSingle {
    order(Side::Buy, price, quantity)
}

fn sell(price: i64, quantity: i32) -> NewOrderSingle {
    order(Side::Sell, price, quantity)
}

fn replace_of(
    original: &NewOrderSingle,
    order_id: OrderId,
    price: i64,
    quantity: i32,
) -> OrderCancelReplaceRequest {
    OrderCancelReplaceRequest {
        order_id,
        session_id: original.session_id,
        instrument_id: original.instrument_id,
        side: original.side,
        order_type: OrderType::Limit,
        order_price: Price::from_raw(price),
        order_quantity: Quantity::new(quantity),
        client_order_id: random_client_order_id(),
        orig_client_order_id: original.client_order_id.clone(),
        ..Default::default()
    }
}

fn cancel_of(original: &NewOrderSingle, order_id: OrderId) -> OrderCancelRequest {
    OrderCancelRequest {
        order_id,
        session_id: original.session_id,
        instrument_id: original.instrument_id,
        side: original.side,
        order_price: original.order_price,
        order_quantity: original.order_quantity,
        client_order_id: original.client_order_id.clone(),
        ..Default::default()
    }
}

fn new_book() -> LimitOrderBook {
    LimitOrderBook::new(InstrumentId::new(1), 64)
}

#[test]
fn simple_match_fills_both_sides() {
    let (mut dispatcher, recorded) = recording_dispatcher();
    let mut book = new_book();

    book.add(&mut dispatcher, &buy(21, 10));
    book.add(&mut dispatcher, &sell(21, 10));

    assert_eq!(
        kinds(&recorded),
        vec![
            EventKind::OrderPendingNew,
            EventKind::OrderNew,
            EventKind::OrderPendingNew,
            EventKind::OrderNew,
            EventKind::OrderFilled,
            EventKind::OrderFilled,
        ]
    );

    let fills = reports_of(&recorded, EventKind::OrderFilled);
    assert_eq!(fills[0].side, Side::Buy);
    assert_eq!(fills[1].side, Side::Sell);
    for fill in &fills {
        assert_eq!(fill.order_status, OrderStatus::Filled);
        assert_eq!(fill.last_price, Price::from_raw(21));
        assert_eq!(fill.last_quantity, Quantity::new(10));
        assert_eq!(fill.leaves_quantity, Quantity::ZERO);
        assert_eq!(fill.order_quantity, Quantity::new(10));
        assert_eq!(fill.executed_value, 210);
    }

    assert!(book.is_empty());
}

#[test]
fn partial_fill_then_completion() {
    let (mut dispatcher, recorded) = recording_dispatcher();
    let mut book = new_book();

    book.add(&mut dispatcher, &buy(21, 10));
    book.add(&mut dispatcher, &sell(21, 5));
    book.add(&mut dispatcher, &sell(21, 5));

    let partials = reports_of(&recorded, EventKind::OrderPartiallyFilled);
    assert_eq!(partials.len(), 1);
    assert_eq!(partials[0].side, Side::Buy);
    assert_eq!(partials[0].leaves_quantity, Quantity::new(5));
    assert_eq!(partials[0].last_quantity, Quantity::new(5));
    assert_eq!(partials[0].order_quantity, Quantity::new(10));
    assert_eq!(partials[0].order_status, OrderStatus::PartiallyFilled);

    let fills = reports_of(&recorded, EventKind::OrderFilled);
    assert_eq!(fills.len(), 3);
    let buy_fill = fills.iter().find(|f| f.side == Side::Buy).unwrap();
    assert_eq!(buy_fill.leaves_quantity, Quantity::ZERO);
    assert_eq!(buy_fill.executed_quantity, Quantity::new(10));

    assert!(book.is_empty());
}

#[test]
fn aggressor_trades_at_resting_price() {
    // resting bid at 22, incoming sell at 21: prints at 22
    let (mut dispatcher, recorded) = recording_dispatcher();
    let mut book = new_book();
    book.add(&mut dispatcher, &buy(22, 10));
    book.add(&mut dispatcher, &sell(21, 10));

    let fills = reports_of(&recorded, EventKind::OrderFilled);
    assert_eq!(fills.len(), 2);
    assert!(fills.iter().all(|f| f.last_price == Price::from_raw(22)));

    // resting ask at 21, incoming buy at 22: prints at 21
    let (mut dispatcher, recorded) = recording_dispatcher();
    let mut book = new_book();
    book.add(&mut dispatcher, &sell(21, 10));
    book.add(&mut dispatcher, &buy(22, 10));

    let fills = reports_of(&recorded, EventKind::OrderFilled);
    assert_eq!(fills.len(), 2);
    assert!(fills.iter().all(|f| f.last_price == Price::from_raw(21)));
}

#[test]
fn sweep_prints_each_level_at_its_resting_price() {
    let (mut dispatcher, recorded) = recording_dispatcher();
    let mut book = new_book();

    book.add(&mut dispatcher, &buy(22, 5));
    book.add(&mut dispatcher, &buy(21, 5));
    book.add(&mut dispatcher, &sell(20, 12));

    let prices: Vec<Price> = reports_of(&recorded, EventKind::OrderFilled)
        .iter()
        .filter(|f| f.side == Side::Buy)
        .map(|f| f.last_price)
        .collect();
    assert_eq!(prices, vec![Price::from_raw(22), Price::from_raw(21)]);

    // the sell's remainder rests and the book is uncrossed
    assert!(book.bids().is_empty());
    let rest = book.asks().front().unwrap();
    assert_eq!(rest.leaves_quantity, Quantity::new(2));
    assert_eq!(rest.order_price, Price::from_raw(20));
}

#[test]
fn quantity_decrease_preserves_queue_priority() {
    let (mut dispatcher, recorded) = recording_dispatcher();
    let mut book = new_book();

    let first = buy(21, 10);
    let second = buy(21, 10);
    book.add(&mut dispatcher, &first);
    book.add(&mut dispatcher, &second);
    let first_id = order_id_of_new(&recorded, 0);
    let second_id = order_id_of_new(&recorded, 1);

    book.modify(&mut dispatcher, &replace_of(&first, first_id, 21, 8));
    assert_eq!(
        kinds(&recorded).last(),
        Some(&EventKind::OrderModified)
    );

    book.add(&mut dispatcher, &sell(21, 10));

    let fills = reports_of(&recorded, EventKind::OrderFilled);
    let first_fill = fills.iter().find(|f| f.order_id == first_id).unwrap();
    assert_eq!(first_fill.executed_quantity, Quantity::new(8));

    let partials = reports_of(&recorded, EventKind::OrderPartiallyFilled);
    let second_partial = partials.iter().find(|f| f.order_id == second_id).unwrap();
    assert_eq!(second_partial.last_quantity, Quantity::new(2));
    assert_eq!(second_partial.leaves_quantity, Quantity::new(8));
}

#[test]
fn quantity_increase_forfeits_queue_priority() {
    let (mut dispatcher, recorded) = recording_dispatcher();
    let mut book = new_book();

    let first = buy(21, 10);
    let second = buy(21, 10);
    book.add(&mut dispatcher, &first);
    book.add(&mut dispatcher, &second);
    let first_id = order_id_of_new(&recorded, 0);
    let second_id = order_id_of_new(&recorded, 1);

    book.modify(&mut dispatcher, &replace_of(&first, first_id, 21, 12));
    book.add(&mut dispatcher, &sell(21, 10));

    let fills = reports_of(&recorded, EventKind::OrderFilled);
    assert!(fills.iter().any(|f| f.order_id == second_id));
    assert!(fills.iter().all(|f| f.order_id != first_id));

    let resting = book.bids().front().unwrap();
    assert_eq!(resting.order_id, first_id);
    assert_eq!(resting.leaves_quantity, Quantity::new(12));
}

#[test]
fn client_id_only_modify_preserves_queue_priority() {
    let (mut dispatcher, recorded) = recording_dispatcher();
    let mut book = new_book();

    let first = buy(21, 10);
    let second = buy(21, 10);
    book.add(&mut dispatcher, &first);
    book.add(&mut dispatcher, &second);
    let first_id = order_id_of_new(&recorded, 0);

    // same price, same quantity: only the client order ids rotate
    book.modify(&mut dispatcher, &replace_of(&first, first_id, 21, 10));

    book.add(&mut dispatcher, &sell(21, 10));
    let fills = reports_of(&recorded, EventKind::OrderFilled);
    assert!(fills.iter().any(|f| f.order_id == first_id));
}

#[test]
fn price_change_queues_behind_resting_orders_at_new_level() {
    let (mut dispatcher, recorded) = recording_dispatcher();
    let mut book = new_book();

    let at_22 = buy(22, 10);
    let at_21 = buy(21, 10);
    book.add(&mut dispatcher, &at_22);
    book.add(&mut dispatcher, &at_21);
    let resident_id = order_id_of_new(&recorded, 0);
    let moved_id = order_id_of_new(&recorded, 1);

    book.modify(&mut dispatcher, &replace_of(&at_21, moved_id, 22, 10));

    book.add(&mut dispatcher, &sell(22, 10));
    let fills = reports_of(&recorded, EventKind::OrderFilled);
    assert!(fills.iter().any(|f| f.order_id == resident_id));
    assert!(fills.iter().all(|f| f.order_id != moved_id));
    assert_eq!(book.bids().front().unwrap().order_id, moved_id);
}

#[test]
fn modify_emits_pending_then_modified() {
    let (mut dispatcher, recorded) = recording_dispatcher();
    let mut book = new_book();

    let original = buy(21, 10);
    book.add(&mut dispatcher, &original);
    let order_id = order_id_of_new(&recorded, 0);

    let replace = replace_of(&original, order_id, 21, 8);
    book.modify(&mut dispatcher, &replace);

    let pendings = reports_of(&recorded, EventKind::OrderPendingModify);
    assert_eq!(pendings.len(), 1);
    assert_eq!(pendings[0].order_status, OrderStatus::PendingModify);
    assert_eq!(pendings[0].client_order_id, replace.client_order_id);

    let modified = reports_of(&recorded, EventKind::OrderModified);
    assert_eq!(modified.len(), 1);
    assert_eq!(modified[0].order_status, OrderStatus::New);
    assert_eq!(modified[0].order_quantity, Quantity::new(8));
}

#[test]
fn modify_that_crosses_matches_at_resting_price() {
    let (mut dispatcher, recorded) = recording_dispatcher();
    let mut book = new_book();

    book.add(&mut dispatcher, &sell(22, 10));
    let passive_buy = buy(20, 10);
    book.add(&mut dispatcher, &passive_buy);
    let buy_id = order_id_of_new(&recorded, 1);

    // lifting the bid to 23 crosses; the bid side is the aggressor so the
    // trade prints at the resting ask price
    book.modify(&mut dispatcher, &replace_of(&passive_buy, buy_id, 23, 10));

    let fills = reports_of(&recorded, EventKind::OrderFilled);
    assert_eq!(fills.len(), 2);
    assert!(fills.iter().all(|f| f.last_price == Price::from_raw(22)));
    assert!(book.is_empty());
}

#[test]
fn add_then_cancel_leaves_empty_book() {
    let (mut dispatcher, recorded) = recording_dispatcher();
    let mut book = new_book();

    let original = buy(21, 10);
    book.add(&mut dispatcher, &original);
    let order_id = order_id_of_new(&recorded, 0);

    book.cancel(&mut dispatcher, &cancel_of(&original, order_id));

    let (kind, event) = recorded.borrow().last().unwrap().clone();
    assert_eq!(kind, EventKind::OrderCancelled);
    let report = event.execution_report().unwrap().clone();
    assert_eq!(report.order_status, OrderStatus::Cancelled);
    assert_eq!(report.leaves_quantity, Quantity::ZERO);
    assert_eq!(report.last_quantity, Quantity::ZERO);
    assert_eq!(report.last_price, Price::ZERO);

    assert!(book.is_empty());
}

#[test]
fn partially_filled_cancel_reports_executed_quantity() {
    let (mut dispatcher, recorded) = recording_dispatcher();
    let mut book = new_book();

    let original = buy(21, 10);
    book.add(&mut dispatcher, &original);
    let order_id = order_id_of_new(&recorded, 0);
    book.add(&mut dispatcher, &sell(21, 4));

    book.cancel(&mut dispatcher, &cancel_of(&original, order_id));

    let cancelled = reports_of(&recorded, EventKind::OrderCancelled);
    assert_eq!(cancelled.len(), 1);
    assert_eq!(cancelled[0].order_quantity, Quantity::new(4));
    assert_eq!(cancelled[0].executed_quantity, Quantity::new(4));
    assert_eq!(cancelled[0].leaves_quantity, Quantity::ZERO);
}

#[test]
fn cancel_of_unknown_order_is_rejected() {
    let (mut dispatcher, recorded) = recording_dispatcher();
    let mut book = new_book();

    let request = OrderCancelRequest {
        order_id: OrderId::new(999),
        session_id: SessionId::new(0),
        instrument_id: InstrumentId::new(1),
        side: Side::Buy,
        client_order_id: ClientOrderId::from("GHOST"),
        ..Default::default()
    };
    book.cancel(&mut dispatcher, &request);

    assert_eq!(kinds(&recorded), vec![EventKind::OrderCancelRejected]);
    let recorded_ref = recorded.borrow();
    let reject = recorded_ref[0].1.cancel_reject().unwrap();
    assert_eq!(
        reject.cxl_rej_response_to,
        CxlRejResponseTo::OrderCancelRequest
    );
    assert_eq!(reject.order_id, OrderId::new(999));
    assert_eq!(reject.order_status, OrderStatus::CancelRejected);
    assert!(book.is_empty());
}

#[test]
fn duplicate_client_order_id_is_rejected() {
    let (mut dispatcher, recorded) = recording_dispatcher();
    let mut book = new_book();

    let original = buy(21, 10);
    book.add(&mut dispatcher, &original);
    book.add(&mut dispatcher, &original);

    let rejects = reports_of(&recorded, EventKind::OrderRejected);
    assert_eq!(rejects.len(), 1);
    assert_eq!(rejects[0].order_status, OrderStatus::Rejected);
    assert_eq!(rejects[0].leaves_quantity, Quantity::ZERO);
    assert_eq!(book.count(), 1);
}

#[test]
fn modify_below_executed_quantity_is_rejected() {
    let (mut dispatcher, recorded) = recording_dispatcher();
    let mut book = new_book();

    let original = buy(21, 10);
    book.add(&mut dispatcher, &original);
    let order_id = order_id_of_new(&recorded, 0);
    book.add(&mut dispatcher, &sell(21, 6));

    book.modify(&mut dispatcher, &replace_of(&original, order_id, 21, 5));

    let (kind, event) = recorded.borrow().last().unwrap().clone();
    assert_eq!(kind, EventKind::OrderCancelRejected);
    let reject = event.cancel_reject().unwrap();
    assert_eq!(
        reject.cxl_rej_response_to,
        CxlRejResponseTo::OrderCancelReplaceRequest
    );

    // the resting order is unchanged
    let resting = book.bids().front().unwrap();
    assert_eq!(resting.order_quantity, Quantity::new(10));
    assert_eq!(resting.leaves_quantity, Quantity::new(4));
}

#[test]
fn exhausted_pool_rejects_next_add() {
    let (mut dispatcher, recorded) = recording_dispatcher();
    let mut book = LimitOrderBook::new(InstrumentId::new(1), 2);

    book.add(&mut dispatcher, &buy(20, 1));
    book.add(&mut dispatcher, &buy(21, 1));
    book.add(&mut dispatcher, &buy(22, 1));

    let rejects = reports_of(&recorded, EventKind::OrderRejected);
    assert_eq!(rejects.len(), 1);
    assert_eq!(book.count(), 2);

    // the pending acknowledgement still precedes the reject
    let kinds = kinds(&recorded);
    assert_eq!(kinds[kinds.len() - 2], EventKind::OrderPendingNew);
    assert_eq!(kinds[kinds.len() - 1], EventKind::OrderRejected);
}

#[test]
fn non_day_time_in_force_is_accepted_and_rests() {
    let (mut dispatcher, recorded) = recording_dispatcher();
    let mut book = new_book();

    let mut request = buy(21, 10);
    request.time_in_force = TimeInForce::Gtc;
    book.add(&mut dispatcher, &request);

    let news = reports_of(&recorded, EventKind::OrderNew);
    assert_eq!(news.len(), 1);
    assert_eq!(news[0].time_in_force, TimeInForce::Gtc);
    assert_eq!(book.count(), 1);
}

#[test]
fn session_disconnect_cancels_both_sides() {
    let (mut dispatcher, recorded) = recording_dispatcher();
    let mut book = new_book();

    let mut own_bid = buy(21, 10);
    own_bid.session_id = SessionId::new(5);
    let mut own_ask = sell(25, 10);
    own_ask.session_id = SessionId::new(5);
    let other = buy(20, 10);

    book.add(&mut dispatcher, &own_bid);
    book.add(&mut dispatcher, &own_ask);
    book.add(&mut dispatcher, &other);

    book.cancel_all_by_session(&mut dispatcher, SessionId::new(5));

    let cancelled = reports_of(&recorded, EventKind::OrderCancelled);
    assert_eq!(cancelled.len(), 2);
    assert!(cancelled
        .iter()
        .all(|report| report.session_id == SessionId::new(5)));
    assert!(cancelled
        .iter()
        .all(|report| report.order_status == OrderStatus::Cancelled));

    assert_eq!(book.count(), 1);
    assert_eq!(
        book.bids().front().unwrap().client_order_id,
        other.client_order_id
    );
}

#[test]
fn equal_leaves_fill_both_orders_in_one_step() {
    let (mut dispatcher, recorded) = recording_dispatcher();
    let mut book = new_book();

    book.add(&mut dispatcher, &buy(21, 7));
    book.add(&mut dispatcher, &sell(21, 7));

    let fills = reports_of(&recorded, EventKind::OrderFilled);
    assert_eq!(fills.len(), 2);
    assert_eq!(fills[0].last_quantity, fills[1].last_quantity);
    assert_eq!(
        fills[1].execution_id.raw(),
        fills[0].execution_id.raw() + 1
    );
    assert!(book.is_empty());
}

#[test]
fn resting_book_stays_uncrossed() {
    let (mut dispatcher, _recorded) = recording_dispatcher();
    let mut book = new_book();

    book.add(&mut dispatcher, &buy(20, 10));
    book.add(&mut dispatcher, &sell(22, 10));

    let best_bid = book.bids().front().unwrap().order_price;
    let best_ask = book.asks().front().unwrap().order_price;
    assert!(best_bid < best_ask);
    assert_eq!(book.count(), 2);
}
