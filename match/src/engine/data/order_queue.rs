//! Order Priority Queue
//!
//! One queue holds the resting orders of a single side of a single asset.
//! Orders are grouped into price levels kept in a `BTreeMap`; each level is a
//! FIFO of arrival-ordered entries, so the queue serves best price first and
//! earliest arrival first within a price.
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | push      | O(log n)   |
//! | peek      | O(log n)   |
//! | pop       | O(log n)   |
//! | requeue   | O(log n)   |

use crate::engine::entry::{Order, OrderSide};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, VecDeque};

/// A resting order's place in the queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueEntry {
    pub order_id: String,
    pub price: Decimal,
    pub sequence: u64,
}

impl QueueEntry {
    pub fn new(order_id: impl Into<String>, price: Decimal, sequence: u64) -> Self {
        Self {
            order_id: order_id.into(),
            price,
            sequence,
        }
    }
}

impl From<&Order> for QueueEntry {
    fn from(order: &Order) -> Self {
        Self::new(order.id.clone(), order.price, order.sequence)
    }
}

#[derive(Debug, Clone)]
pub struct OrderQueue {
    side: OrderSide,
    levels: BTreeMap<Decimal, VecDeque<QueueEntry>>, // price -> entries
    len: usize,
}

impl OrderQueue {
    pub fn new(side: OrderSide) -> Self {
        Self {
            side,
            levels: BTreeMap::new(),
            len: 0,
        }
    }

    pub fn side(&self) -> OrderSide {
        self.side
    }

    /// Inserts an entry behind every entry already resting at its price
    pub fn push(&mut self, entry: QueueEntry) {
        self.levels.entry(entry.price).or_default().push_back(entry);
        self.len += 1;
    }

    /// Puts a partially executed entry back ahead of its price level
    pub fn requeue(&mut self, entry: QueueEntry) {
        self.levels.entry(entry.price).or_default().push_front(entry);
        self.len += 1;
    }

    pub fn peek(&self) -> Option<&QueueEntry> {
        let price = self.best_price()?;
        self.levels.get(&price)?.front()
    }

    pub fn pop(&mut self) -> Option<QueueEntry> {
        let price = self.best_price()?;
        let level = self.levels.get_mut(&price)?;
        let entry = level.pop_front();
        if level.is_empty() {
            self.levels.remove(&price);
        }
        if entry.is_some() {
            self.len -= 1;
        }
        entry
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Highest bid for the buy side, lowest ask for the sell side
    pub fn best_price(&self) -> Option<Decimal> {
        match self.side {
            OrderSide::Buy => self.levels.keys().next_back().copied(),
            OrderSide::Sell => self.levels.keys().next().copied(),
        }
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Number of entries resting at `price`
    pub fn depth_at(&self, price: Decimal) -> usize {
        self.levels.get(&price).map_or(0, VecDeque::len)
    }
}
