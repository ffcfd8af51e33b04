//! Prometheus metrics for the Stake-Ledger engine.
//!
//! All metrics follow the naming convention: `sl_<component>_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: transactions checked and applied, fees collected
//! - **Gauge**: mempool occupancy
//! - **Histogram**: block application latency

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Gauge, Histogram, HistogramOpts, Opts,
    Registry, TextEncoder,
};
use std::sync::Arc;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // UTILITY METRICS
    // =========================================================================

    /// Admission checks by outcome
    pub static ref TRANSACTIONS_CHECKED: CounterVec = CounterVec::new(
        Opts::new("sl_utility_transactions_checked_total", "Transactions run through admission checks"),
        &["outcome"]  // accepted, duplicate, committed, decode, validation, mempool
    ).expect("metric creation failed");

    /// Applied transactions by message kind and outcome
    pub static ref TRANSACTIONS_APPLIED: CounterVec = CounterVec::new(
        Opts::new("sl_utility_transactions_applied_total", "Transactions applied inside blocks"),
        &["message", "outcome"]  // outcome: success/failure
    ).expect("metric creation failed");

    /// Fees moved into the fee collector pool
    pub static ref FEES_COLLECTED: Counter = Counter::new(
        "sl_utility_fees_collected_total",
        "Number of fees moved into the fee collector pool"
    ).expect("metric creation failed");

    /// Block application duration
    pub static ref BLOCK_APPLY_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "sl_utility_block_apply_duration_seconds",
            "Time spent applying a block of transactions"
        ).buckets(exponential_buckets(0.0001, 2.0, 15).unwrap_or_default())
    ).expect("metric creation failed");

    // =========================================================================
    // MEMPOOL METRICS
    // =========================================================================

    /// Transactions waiting in the mempool
    pub static ref MEMPOOL_SIZE: Gauge = Gauge::new(
        "sl_mempool_transactions_pending",
        "Number of transactions in the mempool"
    ).expect("metric creation failed");

    /// Bytes held by the mempool
    pub static ref MEMPOOL_BYTES: Gauge = Gauge::new(
        "sl_mempool_size_bytes",
        "Total size of pending transactions in bytes"
    ).expect("metric creation failed");
}

/// Handle to the registry, held by the telemetry guard.
#[derive(Clone)]
pub struct MetricsHandle {
    _registry: Arc<Registry>,
}

/// Register all metrics with the global registry.
///
/// Calling this more than once is harmless: metrics that are already
/// registered are skipped.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Utility
        Box::new(TRANSACTIONS_CHECKED.clone()),
        Box::new(TRANSACTIONS_APPLIED.clone()),
        Box::new(FEES_COLLECTED.clone()),
        Box::new(BLOCK_APPLY_DURATION.clone()),
        // Mempool
        Box::new(MEMPOOL_SIZE.clone()),
        Box::new(MEMPOOL_BYTES.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle {
        _registry: Arc::new(REGISTRY.clone()),
    })
}

/// Encode all metrics as Prometheus text format.
pub fn gather_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Observes elapsed time into a histogram when dropped.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        self.histogram.observe(self.start.elapsed().as_secs_f64());
    }
}
