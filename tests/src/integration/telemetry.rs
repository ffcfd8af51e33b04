//! Telemetry as an embedding node wires it up: env config, subscriber,
//! registry, then block application reporting into it.

use super::fixtures::*;
use sl_03_utility::UtilityApi;
use sl_telemetry::{gather_metrics, init_telemetry, TelemetryConfig};

#[test]
fn test_node_telemetry_reports_block_application() {
    let config = TelemetryConfig {
        log_level: "warn".to_string(),
        json_logs: false,
        ..TelemetryConfig::from_env()
    };
    let _guard = init_telemetry(&config).expect("telemetry must initialize once per process");

    let (x, y) = (key(1), key(2));
    let mut svc = service(&[(x.address(), 100)]);
    svc.check_transaction(send(&x, y.address(), 5, "1")).unwrap();
    let block = svc.reap_block_transactions();
    assert!(svc.apply_block(1, &block).unwrap()[0].is_success());

    let exposition = gather_metrics().unwrap();
    for name in [
        "sl_utility_transactions_checked_total",
        "sl_utility_transactions_applied_total",
        "sl_utility_block_apply_duration_seconds",
        "sl_mempool_transactions_pending",
    ] {
        assert!(exposition.contains(name), "missing {name}");
    }
}
