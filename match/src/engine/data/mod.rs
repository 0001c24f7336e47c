//! Data Structures Module
//!
//! This module contains the core data structures owned by a book:
//! the per-side priority queues, the per-asset queue pair and the
//! transaction log.

pub mod asset_book;
pub mod order_queue;
pub mod transaction_log;

pub use asset_book::AssetBook;
pub use order_queue::{OrderQueue, QueueEntry};
pub use transaction_log::{Positions, TransactionLog};
