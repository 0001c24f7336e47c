use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::mpsc::Sender;

use crate::config::OverflowPolicy;
use crate::engine::entry::Order;
use crate::metrics;

/// Writes matched orders to the outbound stream
#[derive(Debug, Clone)]
pub struct Publisher {
    sender: Sender<Order>,
    policy: OverflowPolicy,
}

impl Publisher {
    pub fn new(sender: Sender<Order>, policy: OverflowPolicy) -> Self {
        Self { sender, policy }
    }

    pub async fn publish(&self, order: Order) {
        match self.policy {
            OverflowPolicy::Block => {
                if let Err(e) = self.sender.send(order).await {
                    log::debug!("outbound stream closed, order {} not published", e.0.id);
                }
            }
            OverflowPolicy::Drop => match self.sender.try_send(order) {
                Ok(()) => {}
                Err(TrySendError::Full(order)) => {
                    metrics::OUTBOUND_DROPPED_COUNTER.inc();
                    log::warn!("outbound stream full, dropping update of order {}", order.id);
                }
                Err(TrySendError::Closed(order)) => {
                    log::debug!("outbound stream closed, order {} not published", order.id);
                }
            },
        }
    }
}
