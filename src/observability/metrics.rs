//! Metrics collection and exposition.
//!
//! # Metrics
//! - `router_substation_load` (gauge): last sampled load per substation
//! - `router_probe_failures_total` (counter): failed probes by substation, reason
//! - `router_requests_total` (counter): routed requests by outcome, substation
//! - `router_request_duration_seconds` (histogram): routing latency by outcome

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_substation_load(substation: &str, load: f64) {
    gauge!("router_substation_load", "substation" => substation.to_string()).set(load);
}

pub fn record_probe_failure(substation: &str, reason: &'static str) {
    counter!(
        "router_probe_failures_total",
        "substation" => substation.to_string(),
        "reason" => reason
    )
    .increment(1);
}

/// Record a finished routing request. `substation` is empty when none was chosen.
pub fn record_request(outcome: &'static str, substation: &str, start: Instant) {
    counter!(
        "router_requests_total",
        "outcome" => outcome,
        "substation" => substation.to_string()
    )
    .increment(1);
    histogram!("router_request_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}
