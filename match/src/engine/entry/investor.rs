//! Investor Types
//!
//! An investor owns a set of asset positions. Positions are stored behind a
//! mutex so the party holding the investor can read them while the book
//! settles transactions on its own task.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Shares held per asset ID
pub type PositionMap = HashMap<String, i64>;

#[derive(Debug, Default)]
pub struct Investor {
    pub id: String,
    pub name: String,
    positions: Mutex<PositionMap>,
}

impl Investor {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            positions: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the position held in `asset_id`, replacing any previous value
    pub fn add_asset_position(&self, asset_id: impl Into<String>, shares: i64) {
        self.positions().insert(asset_id.into(), shares);
    }

    /// Adds `shares` (negative to remove) to the position in `asset_id`,
    /// creating the position on first use. The position saturates at the
    /// bounds of `i64`.
    ///
    /// # Returns
    /// The position after the update
    pub fn update_asset_position(&self, asset_id: &str, shares: i64) -> i64 {
        let mut positions = self.positions();
        let position = positions.entry(asset_id.to_string()).or_insert(0);
        *position = match position.checked_add(shares) {
            Some(updated) => updated,
            None => {
                log::error!(
                    "position of investor {} in {} overflows by {} shares, saturating",
                    self.id,
                    asset_id,
                    shares
                );
                position.saturating_add(shares)
            }
        };
        *position
    }

    /// Returns the shares held in `asset_id`, if a position exists
    pub fn asset_position(&self, asset_id: &str) -> Option<i64> {
        self.positions().get(asset_id).copied()
    }

    /// Returns a copy of every position held
    pub fn asset_positions(&self) -> PositionMap {
        self.positions().clone()
    }

    fn positions(&self) -> MutexGuard<'_, PositionMap> {
        self.positions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
