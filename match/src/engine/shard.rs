//! Asset sharding
//!
//! The router owns one book per asset, spawned on the first order for that
//! asset. Books never share state; they only share the outbound publisher.
//! Commands for one asset reach its book in the order the router consumed
//! them, so per-asset ordering is the same as with a single book.

use fxhash::FxHashMap;
use tokio::sync::mpsc::{self, Receiver};
use tokio::task::JoinHandle;

use crate::engine::book::{Book, BookHandle, MatchCmd};
use crate::engine::data::TransactionLog;
use crate::engine::publisher::Publisher;
use crate::error::EngineError;

struct Shard {
    handle: BookHandle,
    task: JoinHandle<TransactionLog>,
}

pub struct ShardRouter {
    inbound: Receiver<MatchCmd>,
    publisher: Publisher,
    shard_capacity: usize,
    shards: FxHashMap<String, Shard>,
    /// Asset of every order routed so far, for queries
    order_assets: FxHashMap<String, String>,
}

impl ShardRouter {
    pub fn new(inbound: Receiver<MatchCmd>, publisher: Publisher, shard_capacity: usize) -> Self {
        Self {
            inbound,
            publisher,
            shard_capacity: shard_capacity.max(1),
            shards: FxHashMap::default(),
            order_assets: FxHashMap::default(),
        }
    }

    /// Routes commands until the inbound stream closes, then stops every
    /// shard and merges their logs.
    pub async fn run(mut self) -> TransactionLog {
        log::info!("shard router started");
        while let Some(cmd) = self.inbound.recv().await {
            self.route(cmd).await;
        }

        let mut transactions = TransactionLog::new();
        for (asset_id, shard) in self.shards.drain() {
            drop(shard.handle);
            match shard.task.await {
                Ok(log) => transactions.merge(log),
                Err(e) => log::error!("book for asset {} failed: {}", asset_id, e),
            }
        }
        log::info!(
            "shard router stopped after {} transactions",
            transactions.len()
        );
        transactions
    }

    async fn route(&mut self, cmd: MatchCmd) {
        match cmd {
            MatchCmd::PlaceOrder(submission) => {
                let order_id = submission.order.id.clone();
                if let Err(reason) = submission.order.validate() {
                    log::warn!("order {} rejected: {}", order_id, reason);
                    submission.fail(EngineError::Rejected { order_id, reason });
                    return;
                }
                if self.order_assets.contains_key(&order_id) {
                    submission.fail(EngineError::DuplicateOrder(order_id));
                    return;
                }
                let asset_id = submission.order.asset_id().to_string();
                self.order_assets.insert(order_id, asset_id.clone());

                let shard = self.shard(&asset_id);
                if let Err(MatchCmd::PlaceOrder(submission)) =
                    shard.forward(MatchCmd::PlaceOrder(submission)).await
                {
                    submission.fail(EngineError::Closed);
                }
            }
            MatchCmd::QueryOrder { order_id, reply } => {
                let shard = self
                    .order_assets
                    .get(&order_id)
                    .and_then(|asset_id| self.shards.get(asset_id));
                match shard {
                    Some(shard) => {
                        let _ = shard
                            .handle
                            .forward(MatchCmd::QueryOrder { order_id, reply })
                            .await;
                    }
                    None => {
                        let _ = reply.send(None);
                    }
                }
            }
            MatchCmd::Transactions { reply } => {
                // shard logs are appended whole; each keeps its settlement order
                let mut transactions = Vec::new();
                for (asset_id, shard) in &self.shards {
                    match shard.handle.transactions().await {
                        Ok(shard_transactions) => transactions.extend(shard_transactions),
                        Err(e) => log::error!("book for asset {} unavailable: {}", asset_id, e),
                    }
                }
                let _ = reply.send(transactions);
            }
        }
    }

    fn shard(&mut self, asset_id: &str) -> BookHandle {
        let publisher = &self.publisher;
        let capacity = self.shard_capacity;
        self.shards
            .entry(asset_id.to_string())
            .or_insert_with(|| {
                let (sender, receiver) = mpsc::channel(capacity);
                let book = Book::new(receiver, publisher.clone());
                log::info!("spawning book for asset {}", asset_id);
                Shard {
                    handle: BookHandle::new(sender),
                    task: tokio::spawn(book.run()),
                }
            })
            .handle
            .clone()
    }
}
