// Metrics and observability module
// Prometheus collectors for trades, rejections, collected fees and quote
// latency, registered in the default registry and rendered at /metrics
//
// Numan Thabit 2025 Nov

use alloy_primitives::U256;
use once_cell::sync::Lazy;
use prometheus::{
    register_counter, register_counter_vec, register_histogram_vec, Counter, CounterVec,
    Encoder, HistogramVec, TextEncoder,
};

pub static TRADES: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "fee_router_trades_total",
        "trades by side and outcome",
        &["side", "outcome"]
    )
    .unwrap()
});

pub static REJECTIONS: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "fee_router_rejections_total",
        "rejected operations by error code",
        &["operation", "code"]
    )
    .unwrap()
});

pub static FEES_COLLECTED: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "fee_router_fees_collected",
        "router fees sent to the recipient, native base units",
        &["side"]
    )
    .unwrap()
});

pub static FEE_UPDATES: Lazy<Counter> = Lazy::new(|| {
    register_counter!("fee_router_fee_updates_total", "fee configuration changes").unwrap()
});

pub static QUOTE_LATENCY: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "fee_router_quote_latency_seconds",
        "latency of dry-run quotes",
        &["side"]
    )
    .unwrap()
});

/// Lossy conversion for counters; amounts above `u128::MAX` saturate.
pub fn amount_as_f64(amount: U256) -> f64 {
    u128::try_from(amount).map(|v| v as f64).unwrap_or(f64::MAX)
}

/// Render the default registry in the Prometheus text format.
pub fn render() -> Result<String, prometheus::Error> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&prometheus::gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|err| prometheus::Error::Msg(err.to_string()))
}
