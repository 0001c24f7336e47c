pub mod asset;
pub mod investor;
pub mod order;
pub mod transaction;

pub use asset::Asset;
pub use investor::{Investor, PositionMap};
pub use order::{Order, OrderSide, OrderStatus};
pub use transaction::Transaction;
