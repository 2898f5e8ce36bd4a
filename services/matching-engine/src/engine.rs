//! Multi-instrument matching engine
//!
//! Owns one limit order book per configured instrument and the event
//! dispatcher the gateway subscribes to. Requests are validated at this
//! boundary before they reach a book; validation failures come back as
//! tagged errors for the gateway to translate into reject messages.
//!
//! No data is shared across instruments: each book owns its own half-books,
//! indexes and pools, and callers serialize their submissions to one engine.

use std::collections::BTreeMap;
use tracing::info;
use types::errors::ValidationError;
use types::ids::{InstrumentId, SessionId};
use types::order::OrderType;
use types::requests::{NewOrderSingle, OrderCancelReplaceRequest, OrderCancelRequest};

use crate::book::LimitOrderBook;
use crate::config::EngineConfig;
use crate::events::{EventDispatcher, EventKind, OrderEvent};

/// Matching engine over a fixed set of instruments
pub struct MatchingEngine {
    config: EngineConfig,
    books: BTreeMap<InstrumentId, LimitOrderBook>,
    dispatcher: EventDispatcher,
}

impl MatchingEngine {
    /// Create an engine with one book per configured instrument
    pub fn new(config: EngineConfig) -> Self {
        let books = config
            .instrument_ids
            .iter()
            .map(|&instrument_id| {
                (
                    instrument_id,
                    LimitOrderBook::new(instrument_id, config.pool_size),
                )
            })
            .collect();
        info!(
            instruments = config.instrument_ids.len(),
            pool_size = config.pool_size,
            "matching engine started"
        );
        Self {
            config,
            books,
            dispatcher: EventDispatcher::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Register an event listener; gateways subscribe at construction
    pub fn subscribe<F>(&mut self, kind: EventKind, listener: F)
    where
        F: FnMut(&OrderEvent) + 'static,
    {
        self.dispatcher.subscribe(kind, listener);
    }

    /// Submit a new order
    pub fn add_order(&mut self, request: &NewOrderSingle) -> Result<(), ValidationError> {
        validate_new_order(request)?;
        let book = self
            .books
            .get_mut(&request.instrument_id)
            .ok_or(ValidationError::UnknownInstrument(request.instrument_id))?;
        book.add(&mut self.dispatcher, request);
        Ok(())
    }

    /// Submit a cancel/replace for a resting order
    pub fn modify_order(
        &mut self,
        request: &OrderCancelReplaceRequest,
    ) -> Result<(), ValidationError> {
        validate_replace(request)?;
        let book = self
            .books
            .get_mut(&request.instrument_id)
            .ok_or(ValidationError::UnknownInstrument(request.instrument_id))?;
        book.modify(&mut self.dispatcher, request);
        Ok(())
    }

    /// Submit a cancel for a resting order
    pub fn cancel_order(&mut self, request: &OrderCancelRequest) -> Result<(), ValidationError> {
        validate_cancel(request)?;
        let book = self
            .books
            .get_mut(&request.instrument_id)
            .ok_or(ValidationError::UnknownInstrument(request.instrument_id))?;
        book.cancel(&mut self.dispatcher, request);
        Ok(())
    }

    /// Cancel every resting order of a session across all instruments
    ///
    /// Invoked on session disconnect.
    pub fn cancel_all_by_session(&mut self, session_id: SessionId) {
        for book in self.books.values_mut() {
            book.cancel_all_by_session(&mut self.dispatcher, session_id);
        }
    }

    pub fn book(&self, instrument_id: InstrumentId) -> Option<&LimitOrderBook> {
        self.books.get(&instrument_id)
    }

    /// True iff every book is empty
    pub fn is_empty(&self) -> bool {
        self.books.values().all(LimitOrderBook::is_empty)
    }

    /// Clear every book
    pub fn reset(&mut self) {
        for book in self.books.values_mut() {
            book.reset();
        }
    }
}

fn validate_new_order(request: &NewOrderSingle) -> Result<(), ValidationError> {
    if !request.side.is_buy() && !request.side.is_sell() {
        return Err(ValidationError::UnsupportedSide);
    }
    if request.order_type != OrderType::Limit {
        return Err(ValidationError::UnsupportedOrderType);
    }
    if !request.order_quantity.is_positive() {
        return Err(ValidationError::InvalidQuantity);
    }
    if !request.order_price.is_positive() {
        return Err(ValidationError::InvalidPrice);
    }
    if request.client_order_id.is_empty() {
        return Err(ValidationError::EmptyClientOrderId);
    }
    Ok(())
}

fn validate_replace(request: &OrderCancelReplaceRequest) -> Result<(), ValidationError> {
    if !request.side.is_buy() && !request.side.is_sell() {
        return Err(ValidationError::UnsupportedSide);
    }
    if request.order_type != OrderType::Limit {
        return Err(ValidationError::UnsupportedOrderType);
    }
    if !request.order_quantity.is_positive() {
        return Err(ValidationError::InvalidQuantity);
    }
    if !request.order_price.is_positive() {
        return Err(ValidationError::InvalidPrice);
    }
    if request.client_order_id.is_empty() {
        return Err(ValidationError::EmptyClientOrderId);
    }
    Ok(())
}

fn validate_cancel(request: &OrderCancelRequest) -> Result<(), ValidationError> {
    if !request.side.is_buy() && !request.side.is_sell() {
        return Err(ValidationError::UnsupportedSide);
    }
    if request.client_order_id.is_empty() {
        return Err(ValidationError::EmptyClientOrderId);
    }
    Ok(())
}
