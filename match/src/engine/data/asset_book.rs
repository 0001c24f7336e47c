use crate::engine::data::OrderQueue;
use crate::engine::entry::OrderSide;
use rust_decimal::Decimal;

/// The buy and sell queues of one asset
#[derive(Debug, Clone)]
pub struct AssetBook {
    pub asset_id: String,
    pub buy_orders: OrderQueue,
    pub sell_orders: OrderQueue,
}

impl AssetBook {
    pub fn new(asset_id: String) -> Self {
        Self {
            asset_id,
            buy_orders: OrderQueue::new(OrderSide::Buy),
            sell_orders: OrderQueue::new(OrderSide::Sell),
        }
    }

    pub fn queue(&self, side: OrderSide) -> &OrderQueue {
        match side {
            OrderSide::Buy => &self.buy_orders,
            OrderSide::Sell => &self.sell_orders,
        }
    }

    pub fn queue_mut(&mut self, side: OrderSide) -> &mut OrderQueue {
        match side {
            OrderSide::Buy => &mut self.buy_orders,
            OrderSide::Sell => &mut self.sell_orders,
        }
    }

    pub fn get_best_bid(&self) -> Option<Decimal> {
        self.buy_orders.best_price()
    }

    pub fn get_best_ask(&self) -> Option<Decimal> {
        self.sell_orders.best_price()
    }

    pub fn get_spread(&self) -> Option<Decimal> {
        match (self.get_best_ask(), self.get_best_bid()) {
            (Some(ask), Some(bid)) => Some(ask - bid),
            _ => None,
        }
    }
}
