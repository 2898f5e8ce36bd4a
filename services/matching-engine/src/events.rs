//! Typed engine events and synchronous dispatch
//!
//! Every state transition of every order is announced as a typed event.
//! Listeners register per event kind and are invoked synchronously, in
//! registration order, on the emitting thread.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use types::report::{ExecutionReport, OrderCancelReject, Reject};
use types::requests::{NewOrderSingle, OrderCancelReplaceRequest, OrderCancelRequest};

/// The kind of state transition an event describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    OrderPendingNew,
    OrderPendingModify,
    OrderPendingCancel,
    OrderRejected,
    OrderNew,
    OrderPartiallyFilled,
    OrderFilled,
    OrderCancelled,
    OrderCompleted,
    OrderCancelRejected,
    OrderModified,
    CancelOnDisconnect,
}

/// Payload of an engine event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OrderEvent {
    ExecutionReport(ExecutionReport),
    NewOrderSingle(NewOrderSingle),
    OrderCancelRequest(OrderCancelRequest),
    OrderCancelReplaceRequest(OrderCancelReplaceRequest),
    OrderCancelReject(OrderCancelReject),
    Reject(Reject),
    Empty,
}

impl OrderEvent {
    /// The execution report payload, if this event carries one
    pub fn execution_report(&self) -> Option<&ExecutionReport> {
        match self {
            OrderEvent::ExecutionReport(report) => Some(report),
            _ => None,
        }
    }

    /// The cancel reject payload, if this event carries one
    pub fn cancel_reject(&self) -> Option<&OrderCancelReject> {
        match self {
            OrderEvent::OrderCancelReject(reject) => Some(reject),
            _ => None,
        }
    }
}

type Listener = Box<dyn FnMut(&OrderEvent)>;

/// Synchronous per-kind event fan-out
///
/// The engine blocks until every listener for the kind has returned.
/// Listeners must not panic: an unwinding listener tears through the
/// engine's call stack.
#[derive(Default)]
pub struct EventDispatcher {
    listeners: HashMap<EventKind, Vec<Listener>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for one event kind
    ///
    /// Listeners for a kind run in the order they were registered.
    pub fn subscribe<F>(&mut self, kind: EventKind, listener: F)
    where
        F: FnMut(&OrderEvent) + 'static,
    {
        self.listeners
            .entry(kind)
            .or_default()
            .push(Box::new(listener));
    }

    /// Deliver an event to every listener registered for its kind
    pub fn dispatch(&mut self, kind: EventKind, event: &OrderEvent) {
        if let Some(listeners) = self.listeners.get_mut(&kind) {
            for listener in listeners.iter_mut() {
                listener(event);
            }
        }
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.get(&kind).map_or(0, Vec::len)
    }
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (kind, listeners) in &self.listeners {
            map.entry(kind, &listeners.len());
        }
        map.finish()
    }
}
