//! Book Management Module
//!
//! This module keeps one buy/sell queue pair per traded asset. Books are
//! created lazily the first time an order for an asset arrives and are never
//! shared between assets.

use crate::engine::data::AssetBook;
use crate::engine::entry::Asset;
use fxhash::FxHashMap;
use std::sync::Arc;

/// Manager for the assets seen by a book and their queue pairs
#[derive(Debug, Default)]
pub struct BookManager {
    /// Map of asset IDs to their reference data
    assets: FxHashMap<String, Arc<Asset>>,
    /// Map of asset IDs to their queue pairs
    books: FxHashMap<String, AssetBook>,
}

impl BookManager {
    /// Creates a new empty book manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieves the queue pair of `asset`, creating it on first use
    ///
    /// # Arguments
    /// * `asset` - Asset the incoming order trades
    ///
    /// # Returns
    /// Mutable reference to the asset's book
    pub fn get_or_create(&mut self, asset: &Arc<Asset>) -> &mut AssetBook {
        if !self.assets.contains_key(&asset.id) {
            log::info!("opening book for asset {}", asset.id);
            self.assets.insert(asset.id.clone(), asset.clone());
        }
        self.books
            .entry(asset.id.clone())
            .or_insert_with(|| AssetBook::new(asset.id.clone()))
    }

    /// Retrieves an asset's book
    pub fn get_book(&self, asset_id: &str) -> Option<&AssetBook> {
        self.books.get(asset_id)
    }

    /// Retrieves an asset's reference data
    pub fn get_asset(&self, asset_id: &str) -> Option<&Arc<Asset>> {
        self.assets.get(asset_id)
    }

    /// Lists every asset that has a book
    pub fn list_assets(&self) -> Vec<&Asset> {
        self.assets.values().map(|asset| asset.as_ref()).collect()
    }

    /// Number of open books
    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}
