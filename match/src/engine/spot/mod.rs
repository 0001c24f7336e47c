//! Spot Market Module
//!
//! This module provides the per-book processing of orders:
//! - `order_processor`: Validates, sequences and matches consumed orders
//! - `book_manager`: Keeps one queue pair per traded asset
//!
//! Together these components hold all the state a book actor owns.

pub mod book_manager;
pub mod order_processor;

pub use book_manager::BookManager;
pub use order_processor::OrderProcessor;
