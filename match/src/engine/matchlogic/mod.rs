//! Match Logic Module
//!
//! This module implements the core order matching logic for the book.
//! It pairs incoming orders with resting orders of the opposite side under
//! price-time priority and settles every match against investor positions.

pub mod matcher;

pub use matcher::{add_transaction, MatchReport, Matcher};
