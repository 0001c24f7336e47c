//! Order Processing Module
//!
//! This module processes the orders consumed by a book.
//! It checks each order, routes it to its asset's queues and runs the matcher.

use crate::engine::data::{AssetBook, TransactionLog};
use crate::engine::entry::{Asset, Order};
use crate::engine::matchlogic::{MatchReport, Matcher};
use crate::engine::spot::BookManager;
use crate::error::EngineError;

/// Main processor for the orders of one book
/// Owns the per-asset queues, every consumed order and the transaction log
#[derive(Debug, Default)]
pub struct OrderProcessor {
    /// Manager for the per-asset queue pairs
    book_manager: BookManager,
    /// Matching state shared by every asset of this book
    matcher: Matcher,
    /// Arrival number of the last consumed order
    sequence: u64,
}

impl OrderProcessor {
    /// Creates a new order processor with no books
    pub fn new() -> Self {
        Self::default()
    }

    /// Places an order on its asset's book
    ///
    /// # Arguments
    /// * `order` - The order to place
    ///
    /// # Returns
    /// * `Ok(MatchReport)` - The order after matching and the transactions it caused
    /// * `Err(EngineError)` - If the order is malformed or its ID was already used
    pub fn place_order(&mut self, mut order: Order) -> Result<MatchReport, EngineError> {
        order
            .validate()
            .map_err(|reason| EngineError::Rejected {
                order_id: order.id.clone(),
                reason,
            })?;
        if self.matcher.contains_order(&order.id) {
            return Err(EngineError::DuplicateOrder(order.id));
        }

        self.sequence += 1;
        order.sequence = self.sequence;

        let book = self.book_manager.get_or_create(&order.asset);
        Ok(self.matcher.place_order(book, order))
    }

    /// Retrieves the current state of an order
    ///
    /// # Arguments
    /// * `order_id` - ID of the order
    ///
    /// # Returns
    /// A snapshot of the order if this book consumed it
    pub fn query_order(&self, order_id: &str) -> Option<Order> {
        self.matcher.get_order(order_id).cloned()
    }

    /// Retrieves the queues of an asset
    pub fn get_book(&self, asset_id: &str) -> Option<&AssetBook> {
        self.book_manager.get_book(asset_id)
    }

    /// Lists every asset traded on this book
    pub fn list_assets(&self) -> Vec<&Asset> {
        self.book_manager.list_assets()
    }

    /// Transactions settled so far, in settlement order
    pub fn transactions(&self) -> &TransactionLog {
        self.matcher.transactions()
    }

    pub fn into_transactions(self) -> TransactionLog {
        self.matcher.into_transactions()
    }
}
