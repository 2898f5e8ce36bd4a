//! Matching Engine
//!
//! Single-venue limit order book matching engine for price-time priority
//! continuous trading. Each instrument gets its own book, which turns order
//! lifecycle requests (new, modify, cancel) into executions and status
//! events delivered synchronously to registered listeners.
//!
//! **Key invariants:**
//! - Price-time priority strictly enforced; queue priority survives only a
//!   pure quantity reduction
//! - After matching the book is uncrossed: best bid below best ask, or one
//!   side empty
//! - Transaction and execution ids strictly increase within an engine,
//!   giving events a total order independent of any wall clock
//! - The hot path is allocation-free: resting orders live in preallocated
//!   per-half-book pools

pub mod book;
pub mod config;
pub mod engine;
pub mod events;
pub mod matching;
pub mod pool;

pub use book::{BookError, BookSide, HalfBook, LimitOrderBook};
pub use config::EngineConfig;
pub use engine::MatchingEngine;
pub use events::{EventDispatcher, EventKind, OrderEvent};
pub use pool::OrderPool;
