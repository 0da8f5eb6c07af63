//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gemflux_requests_total` (counter): requests by route and status
//! - `gemflux_request_duration_seconds` (histogram): time from request line to response
//! - `gemflux_active_connections` (gauge): current connection count
//! - `gemflux_upstream_errors_total` (counter): failed Miniflux calls by operation
//! - `gemflux_auth_rejections_total` (counter): refused certificates by reason
//!
//! Recording is a no-op until a recorder is installed, so library code and
//! tests record unconditionally.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and serve it on `address`.
///
/// Must run inside the Tokio runtime.
pub fn init_metrics(address: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(address).install()?;
    describe_metrics();
    tracing::info!(address = %address, "Metrics endpoint listening");
    Ok(())
}

fn describe_metrics() {
    describe_counter!("gemflux_requests_total", "Gemini requests by route and status");
    describe_histogram!(
        "gemflux_request_duration_seconds",
        "Time from reading the request line to writing the response header"
    );
    describe_gauge!("gemflux_active_connections", "Connections currently open");
    describe_counter!(
        "gemflux_upstream_errors_total",
        "Failed Miniflux API calls by operation"
    );
    describe_counter!(
        "gemflux_auth_rejections_total",
        "Requests refused during certificate authentication by reason"
    );
}

/// Record one answered request.
pub fn record_request(route: &'static str, status: u8, start: Instant) {
    let status = status.to_string();
    counter!("gemflux_requests_total", "route" => route, "status" => status).increment(1);
    histogram!("gemflux_request_duration_seconds", "route" => route).record(start.elapsed().as_secs_f64());
}

pub fn set_active_connections(count: u64) {
    gauge!("gemflux_active_connections").set(count as f64);
}

pub fn record_upstream_error(operation: &'static str) {
    counter!("gemflux_upstream_errors_total", "operation" => operation).increment(1);
}

pub fn record_auth_rejection(reason: &'static str) {
    counter!("gemflux_auth_rejections_total", "reason" => reason).increment(1);
}
