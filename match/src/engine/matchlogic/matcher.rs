use crate::engine::data::{AssetBook, OrderQueue, QueueEntry, TransactionLog};
use crate::engine::entry::{Order, OrderSide, Transaction};
use fxhash::FxHashMap;

/// Outcome of one order's processing pass
#[derive(Debug, Clone)]
pub struct MatchReport {
    /// The incoming order as it stands after matching
    pub order: Order,
    /// Transactions caused by the order, in execution order
    pub transactions: Vec<Transaction>,
    /// Order snapshots to publish, resting then incoming for every match
    pub(crate) published: Vec<Order>,
}

impl MatchReport {
    pub fn is_matched(&self) -> bool {
        !self.transactions.is_empty()
    }

    pub fn executed_shares(&self) -> i64 {
        self.transactions.iter().map(|t| *t.shares()).sum()
    }

    pub(crate) fn take_published(&mut self) -> Vec<Order> {
        std::mem::take(&mut self.published)
    }
}

/// Matches orders against per-asset books and keeps every order it has seen
#[derive(Debug, Default)]
pub struct Matcher {
    orders: FxHashMap<String, Order>,
    transactions: TransactionLog,
}

impl Matcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Matches `order` against the opposite side of `book` for as long as a
    /// price compatible resting order exists, then rests any remainder on
    /// the order's own side.
    pub fn place_order(&mut self, book: &mut AssetBook, mut order: Order) -> MatchReport {
        let mut transactions = Vec::new();
        let mut published = Vec::new();

        {
            let opposite = book.queue_mut(order.side.opposite());
            while order.pending_shares > 0 {
                match self.trade_option(opposite, &mut order) {
                    Some((transaction, resting)) => {
                        published.push(resting);
                        published.push(order.clone());
                        transactions.push(transaction);
                    }
                    None => break,
                }
            }
        }

        if order.pending_shares > 0 {
            book.queue_mut(order.side).push(QueueEntry::from(&order));
        }
        log::debug!(
            "order {} {} {}@{}: {} transactions, {} pending",
            order.id,
            order.side.as_str(),
            order.shares,
            order.price,
            transactions.len(),
            order.pending_shares
        );

        self.orders.insert(order.id.clone(), order.clone());
        MatchReport {
            order,
            transactions,
            published,
        }
    }

    /// Executes at most one match between `incoming` and the best resting
    /// order of `opposite`.
    ///
    /// Stale entries at the top of the queue are discarded until an eligible
    /// order is found or the queue is exhausted.
    ///
    /// # Returns
    /// The settled transaction and a snapshot of the resting order, or
    /// `None` when no price compatible resting order exists
    fn trade_option(
        &mut self,
        opposite: &mut OrderQueue,
        incoming: &mut Order,
    ) -> Option<(Transaction, Order)> {
        loop {
            let best = opposite.peek()?;
            if !incoming.accepts_price(best.price) {
                return None;
            }
            let entry = opposite.pop()?;

            let resting = match self.orders.get_mut(&entry.order_id) {
                Some(resting) if resting.pending_shares > 0 => resting,
                _ => {
                    log::debug!("discarding stale entry {}", entry.order_id);
                    continue;
                }
            };

            let shares = incoming.pending_shares.min(resting.pending_shares);
            let (buying, selling) = match incoming.side {
                OrderSide::Buy => (&mut *incoming, &mut *resting),
                OrderSide::Sell => (&mut *resting, &mut *incoming),
            };
            let mut transaction = Transaction::new(buying, selling, shares, entry.price);
            add_transaction(&mut transaction, buying, selling);

            if resting.pending_shares > 0 {
                opposite.requeue(entry);
            }
            let resting = resting.clone();
            self.transactions.append(transaction.clone());
            return Some((transaction, resting));
        }
    }

    pub fn get_order(&self, order_id: &str) -> Option<&Order> {
        self.orders.get(order_id)
    }

    pub fn contains_order(&self, order_id: &str) -> bool {
        self.orders.contains_key(order_id)
    }

    pub fn transactions(&self) -> &TransactionLog {
        &self.transactions
    }

    pub fn into_transactions(self) -> TransactionLog {
        self.transactions
    }
}

/// Settles `transaction` between its two orders.
///
/// The executed quantity is recomputed from the orders' current pending
/// shares, so this must run before anything else touches them.
pub fn add_transaction(transaction: &mut Transaction, buying: &mut Order, selling: &mut Order) {
    let min_shares = buying.pending_shares.min(selling.pending_shares);

    let remaining = selling
        .investor
        .update_asset_position(selling.asset_id(), -min_shares);
    if remaining < 0 {
        log::warn!(
            "investor {} is short {} shares of {}",
            selling.investor_id(),
            remaining.unsigned_abs(),
            selling.asset_id()
        );
    }
    selling.fill(min_shares);
    buying
        .investor
        .update_asset_position(buying.asset_id(), min_shares);
    buying.fill(min_shares);

    transaction.calculate_total();

    buying.close_if_filled();
    selling.close_if_filled();

    buying.transactions.push(transaction.id().clone());
    selling.transactions.push(transaction.id().clone());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::entry::{Asset, Investor, OrderStatus};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    struct Fixture {
        asset: Arc<Asset>,
        book: AssetBook,
        matcher: Matcher,
        sequence: u64,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                asset: Arc::new(Asset::new("asset1", "Asset 1", 100)),
                book: AssetBook::new("asset1".to_string()),
                matcher: Matcher::new(),
                sequence: 0,
            }
        }

        fn place(
            &mut self,
            id: &str,
            investor: &Arc<Investor>,
            side: OrderSide,
            shares: i64,
            price: Decimal,
        ) -> MatchReport {
            self.sequence += 1;
            let mut order = Order::new(id, investor.clone(), self.asset.clone(), side, shares, price);
            order.sequence = self.sequence;
            self.matcher.place_order(&mut self.book, order)
        }
    }

    #[test]
    fn test_add_transaction_settles_both_sides() {
        let asset = Arc::new(Asset::new("asset1", "Asset 1", 100));
        let seller = Arc::new(Investor::new("1"));
        seller.add_asset_position("asset1", 10);
        let buyer = Arc::new(Investor::new("2"));

        let mut sell = Order::new("s", seller.clone(), asset.clone(), OrderSide::Sell, 3, dec!(5));
        let mut buy = Order::new("b", buyer.clone(), asset, OrderSide::Buy, 5, dec!(5));
        let mut transaction = Transaction::new(&buy, &sell, 3, dec!(5));

        add_transaction(&mut transaction, &mut buy, &mut sell);

        assert_eq!(*transaction.total(), dec!(15));
        assert_eq!(sell.pending_shares, 0);
        assert_eq!(sell.status, OrderStatus::Closed);
        assert_eq!(buy.pending_shares, 2);
        assert_eq!(buy.status, OrderStatus::Open);
        assert_eq!(seller.asset_position("asset1"), Some(7));
        assert_eq!(buyer.asset_position("asset1"), Some(3));
        assert_eq!(buy.transactions, vec![transaction.id().clone()]);
        assert_eq!(sell.transactions, vec![transaction.id().clone()]);
    }

    #[test]
    fn test_executes_at_resting_price() {
        let mut fixture = Fixture::new();
        let buyer = Arc::new(Investor::new("buyer"));
        let seller = Arc::new(Investor::new("seller"));

        fixture.place("b1", &buyer, OrderSide::Buy, 5, dec!(5));
        let report = fixture.place("s1", &seller, OrderSide::Sell, 3, dec!(4));

        assert_eq!(report.transactions.len(), 1);
        assert_eq!(*report.transactions[0].price(), dec!(5));
        assert_eq!(*report.transactions[0].total(), dec!(15));
        assert_eq!(report.transactions[0].buying_order_id(), "b1");
        assert_eq!(report.transactions[0].selling_order_id(), "s1");
    }

    #[test]
    fn test_sweeps_levels_in_price_order() {
        let mut fixture = Fixture::new();
        let buyer = Arc::new(Investor::new("buyer"));
        let seller = Arc::new(Investor::new("seller"));

        fixture.place("s1", &seller, OrderSide::Sell, 2, dec!(5.2));
        fixture.place("s2", &seller, OrderSide::Sell, 2, dec!(5.0));
        fixture.place("s3", &seller, OrderSide::Sell, 2, dec!(5.1));
        let report = fixture.place("b1", &buyer, OrderSide::Buy, 5, dec!(5.1));

        let sellers: Vec<&str> = report
            .transactions
            .iter()
            .map(|t| t.selling_order_id().as_str())
            .collect();
        assert_eq!(sellers, vec!["s2", "s3"]);
        assert_eq!(report.order.pending_shares, 1);
        assert_eq!(fixture.book.get_best_bid(), Some(dec!(5.1)));
        assert_eq!(fixture.book.get_best_ask(), Some(dec!(5.2)));
        assert_eq!(fixture.book.get_spread(), Some(dec!(0.1)));
    }

    #[test]
    fn test_partial_fill_keeps_time_priority() {
        let mut fixture = Fixture::new();
        let buyer = Arc::new(Investor::new("buyer"));
        let seller = Arc::new(Investor::new("seller"));

        fixture.place("b1", &buyer, OrderSide::Buy, 5, dec!(5));
        fixture.place("b2", &buyer, OrderSide::Buy, 5, dec!(5));
        fixture.place("s1", &seller, OrderSide::Sell, 2, dec!(5));
        let report = fixture.place("s2", &seller, OrderSide::Sell, 1, dec!(5));

        assert_eq!(report.transactions[0].buying_order_id(), "b1");
        assert_eq!(fixture.matcher.get_order("b1").unwrap().pending_shares, 2);
        assert_eq!(fixture.matcher.get_order("b2").unwrap().pending_shares, 5);
    }

    #[test]
    fn test_publishes_resting_then_incoming() {
        let mut fixture = Fixture::new();
        let buyer = Arc::new(Investor::new("buyer"));
        let seller = Arc::new(Investor::new("seller"));

        fixture.place("s1", &seller, OrderSide::Sell, 1, dec!(5));
        fixture.place("s2", &seller, OrderSide::Sell, 1, dec!(5));
        let mut report = fixture.place("b1", &buyer, OrderSide::Buy, 2, dec!(5));

        let published: Vec<(String, i64)> = report
            .take_published()
            .into_iter()
            .map(|o| (o.id, o.pending_shares))
            .collect();
        assert_eq!(
            published,
            vec![
                ("s1".to_string(), 0),
                ("b1".to_string(), 1),
                ("s2".to_string(), 0),
                ("b1".to_string(), 0),
            ]
        );
        assert_eq!(report.executed_shares(), 2);
    }

    #[test]
    fn test_skips_stale_entries() {
        let mut fixture = Fixture::new();
        let buyer = Arc::new(Investor::new("buyer"));
        let seller = Arc::new(Investor::new("seller"));

        fixture.place("s1", &seller, OrderSide::Sell, 2, dec!(5));
        fixture
            .book
            .sell_orders
            .requeue(QueueEntry::new("ghost", dec!(4), 0));
        let report = fixture.place("b1", &buyer, OrderSide::Buy, 2, dec!(5));

        assert_eq!(report.transactions.len(), 1);
        assert_eq!(report.transactions[0].selling_order_id(), "s1");
        assert!(fixture.book.sell_orders.is_empty());
    }

    #[test]
    fn test_incompatible_price_rests_both() {
        let mut fixture = Fixture::new();
        let buyer = Arc::new(Investor::new("buyer"));
        let seller = Arc::new(Investor::new("seller"));

        fixture.place("s1", &seller, OrderSide::Sell, 3, dec!(6));
        let report = fixture.place("b1", &buyer, OrderSide::Buy, 5, dec!(5));

        assert!(!report.is_matched());
        assert_eq!(fixture.book.buy_orders.len(), 1);
        assert_eq!(fixture.book.sell_orders.len(), 1);
        assert!(fixture.matcher.transactions().is_empty());
    }
}
