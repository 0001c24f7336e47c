//! Continuous double-auction matching engine.
//!
//! Orders for any number of assets are consumed by a single writer per book,
//! matched under price-time priority and settled against investor positions.
//! Every order taking part in a match is published on the outbound stream and
//! every match is recorded in an append-only transaction log.

pub mod config;
pub mod engine;
pub mod error;
pub mod metrics;

pub use config::{EngineConfig, OverflowPolicy, ShardMode};
pub use engine::{
    start, start_with, Asset, BookHandle, Engine, Investor, MatchReport, Order, OrderSide,
    OrderStatus, Positions, Receipt, Transaction, TransactionLog,
};
pub use error::EngineError;
