//! Metrics collection module for the matching engine
//!
//! This module provides functionality for collecting and exposing book
//! metrics using Prometheus.

use lazy_static::lazy_static;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::time::Duration;

use crate::engine::entry::OrderSide;
use crate::engine::matchlogic::MatchReport;
use crate::error::EngineError;

lazy_static! {
    /// Global Prometheus registry instance
    pub static ref REGISTRY_INSTANCE: Registry = Registry::new();

    /// Orders consumed by the books, by side and outcome
    pub static ref ORDER_COUNTER_VEC: IntCounterVec = IntCounterVec::new(
        Opts::new("orders_processed", "orders processed"),
        &["side", "outcome"]
    )
    .unwrap();

    /// Transactions settled
    pub static ref TRANSACTION_COUNTER: IntCounter =
        IntCounter::new("transactions_executed", "transactions executed").unwrap();

    /// Shares moved between investors
    pub static ref MATCHED_SHARES_COUNTER: IntCounter =
        IntCounter::new("matched_shares", "shares executed").unwrap();

    /// Notifications lost to a full outbound stream
    pub static ref OUTBOUND_DROPPED_COUNTER: IntCounter =
        IntCounter::new("outbound_dropped", "match notifications dropped").unwrap();

    /// Time spent processing one order, publishing included
    pub static ref PROCESS_HISTOGRAM: Histogram = Histogram::with_opts(HistogramOpts::new(
        "order_process_seconds",
        "order processing cost"
    ))
    .unwrap();
}

/// Initializes the metrics registry
///
/// Registers all metric collectors with the global registry
pub fn init_registry() {
    let _ = REGISTRY_INSTANCE.register(Box::new(ORDER_COUNTER_VEC.clone()));
    let _ = REGISTRY_INSTANCE.register(Box::new(TRANSACTION_COUNTER.clone()));
    let _ = REGISTRY_INSTANCE.register(Box::new(MATCHED_SHARES_COUNTER.clone()));
    let _ = REGISTRY_INSTANCE.register(Box::new(OUTBOUND_DROPPED_COUNTER.clone()));
    let _ = REGISTRY_INSTANCE.register(Box::new(PROCESS_HISTOGRAM.clone()));
}

/// Records the outcome of one processed order
pub fn record_order(
    side: OrderSide,
    elapsed: Duration,
    result: &Result<MatchReport, EngineError>,
) {
    let outcome = match result {
        Ok(report) if report.order.is_closed() => "filled",
        Ok(report) if report.is_matched() => "partial",
        Ok(_) => "resting",
        Err(_) => "rejected",
    };
    ORDER_COUNTER_VEC
        .with_label_values(&[side.as_str(), outcome])
        .inc();
    if let Ok(report) = result {
        TRANSACTION_COUNTER.inc_by(report.transactions.len() as u64);
        MATCHED_SHARES_COUNTER.inc_by(report.executed_shares().max(0) as u64);
    }
    PROCESS_HISTOGRAM.observe(elapsed.as_secs_f64());
}

/// Renders every registered metric in the Prometheus text format
pub fn gather() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY_INSTANCE.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        log::error!("failed to encode metrics: {}", e);
    }
    String::from_utf8(buffer).unwrap_or_default()
}
