//! Unique identifier types for engine entities
//!
//! All identifiers are engine- or gateway-assigned unsigned integers, except
//! the client order id which is an opaque byte string chosen by the client.
//! Integer ids give a total order that is independent of any wall clock.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! integer_id {
    ($(#[$doc:meta])* $name:ident, $raw:ty) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash,
            Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name($raw);

        impl $name {
            /// Wrap a raw identifier value
            pub const fn new(raw: $raw) -> Self {
                Self(raw)
            }

            /// Get the raw identifier value
            pub const fn raw(&self) -> $raw {
                self.0
            }
        }

        impl From<$raw> for $name {
            fn from(raw: $raw) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

integer_id!(
    /// Server-assigned identifier for a resting order
    ///
    /// Assigned sequentially by the matching engine when an order is
    /// acknowledged; never reused within an engine instance.
    OrderId,
    u32
);

integer_id!(
    /// Identifier for the account an order trades for
    AccountId,
    u32
);

integer_id!(
    /// Identifier of a single execution event
    ///
    /// Strictly increasing across all execution reports emitted by one
    /// engine instance.
    ExecutionId,
    u32
);

integer_id!(
    /// Gateway routing identifier used to multiplex client connections
    RoutingId,
    u32
);

integer_id!(
    /// Identifier of the client session that submitted a request
    SessionId,
    u32
);

integer_id!(
    /// Identifier of a tradable instrument
    InstrumentId,
    u64
);

integer_id!(
    /// Strictly increasing sequence number stamped on every emitted event
    TransactionId,
    u64
);

/// Client-chosen identifier for an order
///
/// An opaque byte string, unique per session among resting orders and
/// compared by value. At most 64 bytes in normal use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientOrderId(String);

impl ClientOrderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<&str> for ClientOrderId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ClientOrderId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for ClientOrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
