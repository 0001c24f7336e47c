//! Asset Types
//!
//! Reference data for the instruments traded on the book. Assets are
//! immutable once created and shared between orders through `Arc`.

use serde::{Deserialize, Serialize};

/// Represents a tradable asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Asset {
    /// Unique identifier of the asset, used to route orders to their book
    pub id: String,
    /// Human readable name (e.g., "Petrobras PN")
    pub name: String,
    /// Total shares issued for the asset
    pub market_volume: i64,
}

impl Asset {
    /// Creates a new asset
    ///
    /// # Arguments
    /// * `id` - Identifier used for routing
    /// * `name` - Descriptive name
    /// * `market_volume` - Total shares issued
    pub fn new(id: impl Into<String>, name: impl Into<String>, market_volume: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            market_volume,
        }
    }
}
