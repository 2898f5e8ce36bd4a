//! Ingress validation taxonomy
//!
//! Validation runs at the gateway boundary, before a request reaches the
//! engine. Failures are returned as tagged errors that the gateway turns
//! into reject messages; nothing is thrown past the engine boundary.

use crate::ids::InstrumentId;
use thiserror::Error;

/// A request that failed validation before reaching the engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("unknown instrument: {0}")]
    UnknownInstrument(InstrumentId),

    #[error("unsupported side")]
    UnsupportedSide,

    #[error("unsupported order type")]
    UnsupportedOrderType,

    #[error("order quantity must be positive")]
    InvalidQuantity,

    #[error("order price must be positive")]
    InvalidPrice,

    #[error("client order id must not be empty")]
    EmptyClientOrderId,
}
