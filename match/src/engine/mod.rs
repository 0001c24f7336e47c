//! Match Engine Module
//!
//! This module contains the core components of the matching engine:
//! - `entry`: Assets, investors, orders and transactions
//! - `data`: Priority queues, per-asset queue pairs and the transaction log
//! - `matchlogic`: Matching and settlement
//! - `spot`: Per-book order processing
//! - `book`: The book actor and its intake handle
//! - `shard`: Per-asset books behind a router

pub mod book;
pub mod data;
pub mod entry;
pub mod matchlogic;
pub mod publisher;
pub mod shard;
pub mod spot;
pub mod submission;

pub use book::{Book, BookHandle, MatchCmd};
pub use data::{AssetBook, OrderQueue, Positions, QueueEntry, TransactionLog};
pub use entry::{Asset, Investor, Order, OrderSide, OrderStatus, Transaction};
pub use matchlogic::{MatchReport, Matcher};
pub use publisher::Publisher;
pub use shard::ShardRouter;
pub use spot::{BookManager, OrderProcessor};
pub use submission::{MatchResult, Receipt, Submission};

use tokio::sync::mpsc::{self, Receiver};
use tokio::task::JoinHandle;

use crate::config::{self, EngineConfig, ShardMode};
use crate::error::EngineError;

/// A running engine
pub struct Engine {
    /// Intake for orders and queries
    pub handle: BookHandle,
    /// Outbound stream: an order each time it takes part in a match
    pub matches: Receiver<Order>,
    /// Resolves to the transaction log once the inbound stream closes
    pub task: JoinHandle<TransactionLog>,
}

impl Engine {
    /// Closes the inbound stream and waits for the engine to stop
    ///
    /// Other clones of the handle keep the engine running until they are
    /// dropped too. Unread match notifications are discarded.
    pub async fn shutdown(self) -> Result<TransactionLog, EngineError> {
        drop(self.handle);
        drop(self.matches);
        Ok(self.task.await?)
    }
}

/// Starts an engine from the process-wide configuration
pub fn start() -> Engine {
    start_with(&config::current())
}

/// Starts an engine on the current tokio runtime
pub fn start_with(config: &EngineConfig) -> Engine {
    let (sender, inbound) = mpsc::channel(config.inbound_capacity.max(1));
    let (outbound, matches) = mpsc::channel(config.outbound_capacity.max(1));
    let publisher = Publisher::new(outbound, config.overflow_policy);

    let task = match config.sharding {
        ShardMode::Single => tokio::spawn(Book::new(inbound, publisher).run()),
        ShardMode::PerAsset => tokio::spawn(
            ShardRouter::new(inbound, publisher, config.shard_capacity).run(),
        ),
    };
    log::info!(
        "engine started: {:?} sharding, {:?} overflow policy",
        config.sharding,
        config.overflow_policy
    );

    Engine {
        handle: BookHandle::new(sender),
        matches,
        task,
    }
}
