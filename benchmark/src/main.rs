use anyhow::Context;
use clap::Parser;
use hdrhistogram::Histogram;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

use match_book::{metrics, Asset, EngineConfig, Investor, Order, OrderSide, ShardMode};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of concurrent submitters
    #[arg(short, long, default_value = "4")]
    concurrency: usize,

    /// Orders sent by each submitter
    #[arg(short, long, default_value = "10000")]
    orders: usize,

    /// Number of distinct assets traded
    #[arg(short, long, default_value = "4")]
    assets: usize,

    /// Engine configuration file
    #[arg(long)]
    config: Option<String>,

    /// Run one book per asset, overriding the configuration
    #[arg(long)]
    sharded: bool,
}

const INITIAL_SHARES: i64 = 1_000_000;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => EngineConfig::from_toml(path),
        None => EngineConfig::new(),
    };
    if args.sharded {
        config.sharding = ShardMode::PerAsset;
    }
    metrics::init_registry();

    let assets: Vec<Arc<Asset>> = (0..args.assets.max(1))
        .map(|i| {
            Arc::new(Asset::new(
                format!("asset{}", i),
                format!("Asset {}", i),
                INITIAL_SHARES,
            ))
        })
        .collect();

    let engine = match_book::start_with(&config);
    let handle = engine.handle;
    let mut matches = engine.matches;
    let drainer = tokio::spawn(async move {
        let mut published = 0u64;
        while matches.recv().await.is_some() {
            published += 1;
        }
        published
    });

    let histogram = Arc::new(Mutex::new(Histogram::<u64>::new(3)?));

    println!(
        "Starting benchmark with {} concurrent submitters, {} orders each, {} assets, {:?} sharding",
        args.concurrency,
        args.orders,
        assets.len(),
        config.sharding
    );

    let started = Instant::now();
    let mut submitters = vec![];
    for client in 0..args.concurrency {
        let handle = handle.clone();
        let histogram = histogram.clone();
        let assets = assets.clone();
        let orders = args.orders;

        submitters.push(tokio::spawn(async move {
            let investor = Arc::new(Investor::new(format!("investor{}", client)));
            for asset in &assets {
                investor.add_asset_position(asset.id.clone(), INITIAL_SHARES);
            }
            let mut rng = StdRng::from_entropy();

            for n in 0..orders {
                let asset = assets[rng.gen_range(0..assets.len())].clone();
                let side = if rng.gen_bool(0.5) {
                    OrderSide::Buy
                } else {
                    OrderSide::Sell
                };
                let order = Order::new(
                    format!("{}-{}", client, n),
                    investor.clone(),
                    asset,
                    side,
                    rng.gen_range(1..=100),
                    Decimal::new(rng.gen_range(9_900..=10_100), 2),
                );

                let start = Instant::now();
                let receipt = handle.submit(order).await?;
                match receipt.wait().await {
                    Ok(_) => {
                        let mut hist = histogram.lock().await;
                        hist.record(start.elapsed().as_micros() as u64)?;
                    }
                    Err(e) => log::warn!("order {}-{} failed: {}", client, n, e),
                }
            }
            anyhow::Ok(())
        }));
    }

    for submitter in submitters {
        submitter.await.context("submitter panicked")??;
    }
    let elapsed = started.elapsed();

    drop(handle);
    let transactions = engine.task.await.context("engine task failed")?;
    let published = drainer.await.context("drainer panicked")?;

    let total = (args.concurrency * args.orders) as u64;
    let hist = histogram.lock().await;

    println!("\nBenchmark Results:");
    println!("Total Orders: {}", total);
    println!("Transactions: {}", transactions.len());
    println!("Published: {}", published);
    println!("Average TPS: {:.2}", total as f64 / elapsed.as_secs_f64());
    println!("\nLatency Distribution (microseconds):");
    println!("p50: {}", hist.value_at_percentile(50.0));
    println!("p90: {}", hist.value_at_percentile(90.0));
    println!("p95: {}", hist.value_at_percentile(95.0));
    println!("p99: {}", hist.value_at_percentile(99.0));
    println!("p99.9: {}", hist.value_at_percentile(99.9));

    let summary = serde_json::json!({
        "orders": total,
        "transactions": transactions.len(),
        "published": published,
        "elapsed_ms": elapsed.as_millis() as u64,
        "p50_us": hist.value_at_percentile(50.0),
        "p99_us": hist.value_at_percentile(99.0),
        "max_us": hist.max(),
    });
    println!("\n{}", serde_json::to_string_pretty(&summary)?);
    println!("\n{}", metrics::gather());

    Ok(())
}
