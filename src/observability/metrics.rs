//! Metrics collection and exposition.
//!
//! # Metrics
//! - `watchdog_probes_total` (counter): probes by result
//! - `watchdog_consecutive_failures` (gauge): current failure streak
//! - `watchdog_icmp_suppressed` (gauge): 1=suppressed, 0=normal
//! - `watchdog_policy_errors_total` (counter): failed toggles by action
//!
//! Recording is a no-op until a recorder is installed, so the monitor can
//! run in tests without one.

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::policy::PolicyAction;

/// Install the Prometheus exporter listening on `addr`.
///
/// Must be called from inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_probe(success: bool, consecutive_failures: u64) {
    let result = if success { "success" } else { "failure" };
    metrics::counter!("watchdog_probes_total", "result" => result).increment(1);
    metrics::gauge!("watchdog_consecutive_failures").set(consecutive_failures as f64);
}

pub fn record_suppressed(suppressed: bool) {
    metrics::gauge!("watchdog_icmp_suppressed").set(if suppressed { 1.0 } else { 0.0 });
}

pub fn record_policy_error(action: PolicyAction) {
    metrics::counter!("watchdog_policy_errors_total", "action" => action.as_str()).increment(1);
}
