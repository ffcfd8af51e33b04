//! # Stake-Ledger Telemetry
//!
//! Logging and metrics for the transaction-application engine.
//!
//! ## Components
//!
//! - **Logs**: `tracing` events rendered by `tracing-subscriber` (plain text
//!   for development, JSON for log shippers)
//! - **Metrics**: Prometheus counters, gauges and histograms in a global registry
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sl_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! let _guard = init_telemetry(&config).expect("Failed to init telemetry");
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `SL_SERVICE_NAME` | `stake-ledger` | Service name attached to logs |
//! | `SL_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `SL_JSON_LOGS` | `false` | Emit JSON formatted logs |
//! | `SL_CONSOLE_OUTPUT` | `true` | Emit logs to stdout at all |
//! | `SL_NETWORK` | `localnet` | Network name attached to logs |

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    gather_metrics, register_metrics, HistogramTimer, MetricsHandle, BLOCK_APPLY_DURATION,
    FEES_COLLECTED, MEMPOOL_BYTES, MEMPOOL_SIZE, TRANSACTIONS_APPLIED, TRANSACTIONS_CHECKED,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and register all metrics.
///
/// Returns a guard that must be held for the lifetime of the application.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    // Metrics first: they never depend on the subscriber
    let metrics_handle = register_metrics()?;

    if config.console_output {
        init_logging(config)?;
    }

    tracing::info!(
        service = %config.service_name,
        network = %config.network,
        "Telemetry initialized"
    );

    Ok(TelemetryGuard {
        _metrics: metrics_handle,
    })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    _metrics: MetricsHandle,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!("Shutting down telemetry...");
    }
}

/// Log a transaction-related event with standard fields.
#[macro_export]
macro_rules! log_tx_event {
    ($level:ident, $msg:expr, $height:expr, $tx_hash:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            height = $height,
            tx_hash = %$tx_hash,
            $($($field)*,)?
            $msg
        )
    };
}
