//! Book Module
//!
//! This module implements the book actor: the single task that owns a set of
//! asset queues, consumes the inbound order stream and publishes every
//! matched order on the outbound stream.

use std::time::Instant;

use tokio::sync::mpsc::{Receiver, Sender};
use tokio::sync::oneshot;

use crate::engine::data::TransactionLog;
use crate::engine::entry::{Order, Transaction};
use crate::engine::publisher::Publisher;
use crate::engine::spot::OrderProcessor;
use crate::engine::submission::{Receipt, Submission};
use crate::error::EngineError;
use crate::metrics;

/// Commands accepted on a book's inbound stream
#[derive(Debug)]
pub enum MatchCmd {
    /// Match an order and rest its remainder
    PlaceOrder(Submission),
    /// Read the current state of an order
    QueryOrder {
        order_id: String,
        reply: oneshot::Sender<Option<Order>>,
    },
    /// Read the transaction log so far
    Transactions {
        reply: oneshot::Sender<Vec<Transaction>>,
    },
}

/// The book actor
/// Sole writer of its queues, orders and transaction log
#[derive(Debug)]
pub struct Book {
    processor: OrderProcessor,
    inbound: Receiver<MatchCmd>,
    publisher: Publisher,
}

impl Book {
    pub fn new(inbound: Receiver<MatchCmd>, publisher: Publisher) -> Book {
        Book {
            processor: OrderProcessor::new(),
            inbound,
            publisher,
        }
    }

    /// Consumes the inbound stream until every sender is gone
    ///
    /// Orders still open when the stream closes stay in their queues.
    ///
    /// # Returns
    /// The transaction log of this book
    pub async fn run(mut self) -> TransactionLog {
        log::info!("book started");
        while let Some(cmd) = self.inbound.recv().await {
            self.on_message(cmd).await;
        }
        let transactions = self.processor.into_transactions();
        log::info!(
            "inbound stream closed, book stopped after {} transactions",
            transactions.len()
        );
        transactions
    }

    async fn on_message(&mut self, cmd: MatchCmd) {
        match cmd {
            MatchCmd::PlaceOrder(submission) => self.place_order(submission).await,
            MatchCmd::QueryOrder { order_id, reply } => {
                let _ = reply.send(self.processor.query_order(&order_id));
            }
            MatchCmd::Transactions { reply } => {
                let _ = reply.send(self.processor.transactions().as_slice().to_vec());
            }
        }
    }

    async fn place_order(&mut self, submission: Submission) {
        let start = Instant::now();
        let (order, completion) = submission.into_parts();
        let side = order.side;

        let mut result = self.processor.place_order(order);
        match &mut result {
            Ok(report) => {
                for order in report.take_published() {
                    self.publisher.publish(order).await;
                }
            }
            Err(e) => log::warn!("{}", e),
        }

        metrics::record_order(side, start.elapsed(), &result);
        completion.complete(result);
    }
}

/// Intake side of a running book (or shard router)
///
/// Dropping every clone closes the inbound stream and stops the book.
#[derive(Debug, Clone)]
pub struct BookHandle {
    sender: Sender<MatchCmd>,
}

impl BookHandle {
    pub fn new(sender: Sender<MatchCmd>) -> Self {
        Self { sender }
    }

    /// Enqueues an order for matching
    ///
    /// # Returns
    /// * `Ok(Receipt)` - Resolves when the order's processing pass is done
    /// * `Err(EngineError::Closed)` - If the book no longer runs
    pub async fn submit(&self, order: Order) -> Result<Receipt, EngineError> {
        let (submission, receipt) = Submission::new(order);
        self.sender
            .send(MatchCmd::PlaceOrder(submission))
            .await
            .map_err(|_| EngineError::Closed)?;
        Ok(receipt)
    }

    /// Current state of an order the book has consumed
    pub async fn query_order(&self, order_id: &str) -> Result<Option<Order>, EngineError> {
        let (reply, rx) = oneshot::channel();
        self.forward(MatchCmd::QueryOrder {
            order_id: order_id.to_string(),
            reply,
        })
        .await
        .map_err(|_| EngineError::Closed)?;
        rx.await.map_err(|_| EngineError::Dropped)
    }

    /// Copy of the transaction log so far
    pub async fn transactions(&self) -> Result<Vec<Transaction>, EngineError> {
        let (reply, rx) = oneshot::channel();
        self.forward(MatchCmd::Transactions { reply })
            .await
            .map_err(|_| EngineError::Closed)?;
        rx.await.map_err(|_| EngineError::Dropped)
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Sends a command as is, handing it back if the book is gone
    pub(crate) async fn forward(&self, cmd: MatchCmd) -> Result<(), MatchCmd> {
        self.sender.send(cmd).await.map_err(|e| e.0)
    }
}
