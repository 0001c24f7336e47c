use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::SystemTime;

use super::{Asset, Investor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderSide {
    #[default]
    Buy,
    Sell,
}

impl OrderSide {
    pub fn opposite(self) -> Self {
        match self {
            OrderSide::Buy => OrderSide::Sell,
            OrderSide::Sell => OrderSide::Buy,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderSide::Buy => "buy",
            OrderSide::Sell => "sell",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    #[default]
    Open,
    Closed,
}

#[derive(Debug, Clone)]
pub struct Order {
    pub id: String,
    pub investor: Arc<Investor>,
    pub asset: Arc<Asset>,
    pub side: OrderSide,
    pub shares: i64,
    pub pending_shares: i64,
    pub price: Decimal,
    pub status: OrderStatus,
    /// IDs of the transactions this order took part in, oldest first
    pub transactions: Vec<String>,
    pub submitted_at: SystemTime,
    /// Arrival number assigned by the book, zero until consumed
    pub sequence: u64,
}

impl Order {
    pub fn new(
        id: impl Into<String>,
        investor: Arc<Investor>,
        asset: Arc<Asset>,
        side: OrderSide,
        shares: i64,
        price: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            investor,
            asset,
            side,
            shares,
            pending_shares: shares,
            price,
            status: OrderStatus::Open,
            transactions: Vec::new(),
            submitted_at: SystemTime::now(),
            sequence: 0,
        }
    }

    pub fn investor_id(&self) -> &str {
        &self.investor.id
    }

    pub fn asset_id(&self) -> &str {
        &self.asset.id
    }

    pub fn is_closed(&self) -> bool {
        self.status == OrderStatus::Closed
    }

    pub fn executed_shares(&self) -> i64 {
        self.shares - self.pending_shares
    }

    /// Whether a resting order at `resting_price` satisfies this order's limit
    pub fn accepts_price(&self, resting_price: Decimal) -> bool {
        match self.side {
            OrderSide::Buy => resting_price <= self.price,
            OrderSide::Sell => resting_price >= self.price,
        }
    }

    /// Value of the whole order at its limit, `None` if it does not fit a
    /// `Decimal`
    pub fn notional(&self) -> Option<Decimal> {
        Decimal::from(self.shares).checked_mul(self.price)
    }

    /// Checks the shape of an order entering the book
    pub fn validate(&self) -> Result<(), String> {
        if self.shares <= 0 {
            return Err(format!("shares must be positive, got {}", self.shares));
        }
        if self.price <= dec!(0) {
            return Err(format!("price must be positive, got {}", self.price));
        }
        // every fill executes at most `shares` at a price no worse than a
        // validated limit, so a representable notional bounds every total
        if self.notional().is_none() {
            return Err(format!(
                "{} shares at {} overflow the order value",
                self.shares, self.price
            ));
        }
        if self.pending_shares != self.shares {
            return Err(format!(
                "pending shares {} differ from shares {}",
                self.pending_shares, self.shares
            ));
        }
        if self.status != OrderStatus::Open || !self.transactions.is_empty() {
            return Err("order has already been executed".to_string());
        }
        Ok(())
    }

    pub(crate) fn fill(&mut self, shares: i64) {
        debug_assert!(shares <= self.pending_shares);
        self.pending_shares -= shares;
    }

    /// Closes the order once nothing is left to execute
    pub(crate) fn close_if_filled(&mut self) {
        if self.pending_shares == 0 {
            self.status = OrderStatus::Closed;
        }
    }
}
