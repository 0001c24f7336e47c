//! Transaction Log
//!
//! Append-only record of every transaction a book has settled, in settlement
//! order. Reporting and audit code reads it; nothing outside the book writes
//! to it.

use crate::engine::entry::Transaction;
use serde::Serialize;
use std::collections::BTreeMap;

/// Shares held keyed by `(investor_id, asset_id)`
pub type Positions = BTreeMap<(String, String), i64>;

#[derive(Debug, Clone, Default, Serialize)]
pub struct TransactionLog {
    transactions: Vec<Transaction>,
}

impl TransactionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn append(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }

    /// Moves every transaction of `other` to the end of this log
    pub(crate) fn merge(&mut self, other: TransactionLog) {
        self.transactions.extend(other.transactions);
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Transaction> {
        self.transactions.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.transactions.iter()
    }

    pub fn as_slice(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Transactions that moved shares of `asset_id`
    pub fn for_asset<'a>(&'a self, asset_id: &'a str) -> impl Iterator<Item = &'a Transaction> {
        self.transactions
            .iter()
            .filter(move |t| t.asset_id() == asset_id)
    }

    /// Rebuilds final positions by applying every transaction, in order, on
    /// top of `initial`.
    pub fn replay(&self, initial: &Positions) -> Positions {
        let mut positions = initial.clone();
        for transaction in &self.transactions {
            let asset_id = transaction.asset_id().clone();
            let selling = positions
                .entry((transaction.selling_investor_id().clone(), asset_id.clone()))
                .or_insert(0);
            *selling = selling.saturating_sub(*transaction.shares());
            let buying = positions
                .entry((transaction.buying_investor_id().clone(), asset_id))
                .or_insert(0);
            *buying = buying.saturating_add(*transaction.shares());
        }
        positions
    }
}

impl<'a> IntoIterator for &'a TransactionLog {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.transactions.iter()
    }
}

impl IntoIterator for TransactionLog {
    type Item = Transaction;
    type IntoIter = std::vec::IntoIter<Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.transactions.into_iter()
    }
}
