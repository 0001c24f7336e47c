//! Transaction Types and Structures
//!
//! A transaction records one match between a buying and a selling order.
//! Its fields are fixed once the book has settled it, so they are only
//! exposed through getters.

use getset::Getters;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use uuid::Uuid;

use super::Order;

/// Represents an executed match between two orders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
#[getset(get = "pub")]
pub struct Transaction {
    /// Unique identifier for the transaction
    id: String,
    /// ID of the buyer's order
    buying_order_id: String,
    /// ID of the seller's order
    selling_order_id: String,
    buying_investor_id: String,
    selling_investor_id: String,
    /// Asset that changed hands
    asset_id: String,
    /// Quantity executed in this fill
    shares: i64,
    /// Execution price, always the resting order's limit
    price: Decimal,
    /// `shares * price`
    total: Decimal,
    /// Timestamp when the transaction was created
    executed_at: SystemTime,
}

impl Transaction {
    /// Creates a new transaction with a fresh ID
    ///
    /// # Arguments
    /// * `buying_order` - The buy side of the match
    /// * `selling_order` - The sell side of the match
    /// * `shares` - Quantity to execute
    /// * `price` - Execution price
    pub fn new(buying_order: &Order, selling_order: &Order, shares: i64, price: Decimal) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            buying_order_id: buying_order.id.clone(),
            selling_order_id: selling_order.id.clone(),
            buying_investor_id: buying_order.investor_id().to_string(),
            selling_investor_id: selling_order.investor_id().to_string(),
            asset_id: buying_order.asset_id().to_string(),
            shares,
            price,
            total: Decimal::from(shares).saturating_mul(price),
            executed_at: SystemTime::now(),
        }
    }

    /// Recomputes the total from the recorded shares and price
    pub(crate) fn calculate_total(&mut self) {
        self.total = Decimal::from(self.shares).saturating_mul(self.price);
    }
}
