use std::sync::Arc;

use match_book::{
    Asset, Engine, EngineConfig, EngineError, Investor, Order, OrderSide, OrderStatus, ShardMode,
};
use rust_decimal_macros::dec;

fn sharded_engine() -> Engine {
    let _ = env_logger::try_init();
    let mut config = EngineConfig::new();
    config.sharding = ShardMode::PerAsset;
    config.shard_capacity = 2;
    match_book::start_with(&config)
}

#[tokio::test]
async fn test_each_asset_matches_in_its_own_book() {
    let Engine {
        handle,
        mut matches,
        task,
    } = sharded_engine();
    let asset1 = Arc::new(Asset::new("asset1", "Asset 1", 100));
    let asset2 = Arc::new(Asset::new("asset2", "Asset 2", 100));
    let seller = Arc::new(Investor::new("seller"));
    seller.add_asset_position("asset1", 10);
    seller.add_asset_position("asset2", 10);
    let buyer = Arc::new(Investor::new("buyer"));

    let orders = vec![
        Order::new("1", seller.clone(), asset1.clone(), OrderSide::Sell, 4, dec!(10)),
        Order::new("2", seller.clone(), asset2.clone(), OrderSide::Sell, 6, dec!(20)),
        Order::new("3", buyer.clone(), asset2.clone(), OrderSide::Buy, 6, dec!(20)),
        Order::new("4", buyer.clone(), asset1.clone(), OrderSide::Buy, 3, dec!(11)),
    ];
    let mut receipts = Vec::new();
    for order in orders {
        receipts.push(handle.submit(order).await.unwrap());
    }
    for receipt in receipts {
        receipt.wait().await.unwrap();
    }

    assert_eq!(seller.asset_position("asset1"), Some(7));
    assert_eq!(seller.asset_position("asset2"), Some(4));
    assert_eq!(buyer.asset_position("asset1"), Some(3));
    assert_eq!(buyer.asset_position("asset2"), Some(6));

    let resting = handle.query_order("1").await.unwrap().unwrap();
    assert_eq!(resting.status, OrderStatus::Open);
    assert_eq!(resting.pending_shares, 1);
    let filled = handle.query_order("2").await.unwrap().unwrap();
    assert_eq!(filled.status, OrderStatus::Closed);
    assert!(handle.query_order("missing").await.unwrap().is_none());

    let transactions = handle.transactions().await.unwrap();
    assert_eq!(transactions.len(), 2);
    let asset1_trade = transactions
        .iter()
        .find(|t| t.asset_id() == "asset1")
        .unwrap();
    assert_eq!(*asset1_trade.price(), dec!(10));
    assert_eq!(*asset1_trade.total(), dec!(30));

    // every matched order is published exactly once per match
    let mut published = Vec::new();
    for _ in 0..4 {
        published.push(matches.recv().await.unwrap().id);
    }
    published.sort();
    assert_eq!(published, vec!["1", "2", "3", "4"]);

    drop(handle);
    let log = task.await.unwrap();
    assert_eq!(log.len(), 2);
    assert_eq!(log.for_asset("asset2").count(), 1);
}

#[tokio::test]
async fn test_order_ids_are_unique_across_books() {
    let Engine { handle, task, .. } = sharded_engine();
    let asset1 = Arc::new(Asset::new("asset1", "Asset 1", 100));
    let asset2 = Arc::new(Asset::new("asset2", "Asset 2", 100));
    let investor = Arc::new(Investor::new("1"));

    handle
        .submit(Order::new("1", investor.clone(), asset1, OrderSide::Buy, 1, dec!(1)))
        .await
        .unwrap()
        .wait()
        .await
        .unwrap();
    let duplicate = handle
        .submit(Order::new("1", investor.clone(), asset2.clone(), OrderSide::Buy, 1, dec!(1)))
        .await
        .unwrap()
        .wait()
        .await;
    assert!(matches!(duplicate, Err(EngineError::DuplicateOrder(_))));

    let rejected = handle
        .submit(Order::new("2", investor, asset2, OrderSide::Sell, 0, dec!(1)))
        .await
        .unwrap()
        .wait()
        .await;
    assert!(matches!(rejected, Err(EngineError::Rejected { .. })));
    assert!(handle.query_order("2").await.unwrap().is_none());

    let query = handle.query_order("1").await.unwrap().unwrap();
    assert_eq!(query.asset_id(), "asset1");

    drop(handle);
    assert!(task.await.unwrap().is_empty());
}

#[tokio::test]
async fn test_transactions_keep_settlement_order_per_asset() {
    let Engine { handle, task, .. } = sharded_engine();
    let asset1 = Arc::new(Asset::new("asset1", "Asset 1", 100));
    let asset2 = Arc::new(Asset::new("asset2", "Asset 2", 100));
    let seller = Arc::new(Investor::new("seller"));
    seller.add_asset_position("asset1", 100);
    seller.add_asset_position("asset2", 100);
    let buyer = Arc::new(Investor::new("buyer"));

    for (i, price) in [dec!(12), dec!(10), dec!(11), dec!(10)].into_iter().enumerate() {
        for asset in [&asset1, &asset2] {
            let id = format!("{}-s{}", asset.id, i);
            handle
                .submit(Order::new(id, seller.clone(), asset.clone(), OrderSide::Sell, 2, price))
                .await
                .unwrap();
        }
    }
    let mut sweeps = Vec::new();
    for asset in [&asset1, &asset2] {
        let id = format!("{}-sweep", asset.id);
        let receipt = handle
            .submit(Order::new(id, buyer.clone(), asset.clone(), OrderSide::Buy, 8, dec!(12)))
            .await
            .unwrap();
        sweeps.push(receipt);
    }
    let mut reports = Vec::new();
    for receipt in sweeps {
        reports.push(receipt.wait().await.unwrap());
    }

    let transactions = handle.transactions().await.unwrap();
    assert_eq!(transactions.len(), 8);
    for (asset, report) in [&asset1, &asset2].into_iter().zip(&reports) {
        let settled: Vec<&String> = transactions
            .iter()
            .filter(|t| t.asset_id() == &asset.id)
            .map(|t| t.id())
            .collect();
        let expected: Vec<&String> = report.transactions.iter().map(|t| t.id()).collect();
        assert_eq!(settled, expected);

        let sellers: Vec<String> = report
            .transactions
            .iter()
            .map(|t| t.selling_order_id().clone())
            .collect();
        let prefix = &asset.id;
        assert_eq!(
            sellers,
            vec![
                format!("{}-s1", prefix),
                format!("{}-s3", prefix),
                format!("{}-s2", prefix),
                format!("{}-s0", prefix),
            ]
        );
    }

    drop(handle);
    let log = task.await.unwrap();
    for (asset, report) in [&asset1, &asset2].into_iter().zip(&reports) {
        let logged: Vec<&String> = log.for_asset(&asset.id).map(|t| t.id()).collect();
        let expected: Vec<&String> = report.transactions.iter().map(|t| t.id()).collect();
        assert_eq!(logged, expected);
    }
}
