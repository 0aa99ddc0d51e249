//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): invocations by encoding, status
//! - `gateway_request_duration_seconds` (histogram): latency by encoding
//!
//! # Design Decisions
//! - Recording without an installed exporter is a no-op
//! - Labels are drawn from closed sets to keep cardinality bounded

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::http::request::Encoding;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one handled invocation.
pub fn record_request(encoding: Encoding, status: u16, start: Instant) {
    counter!(
        "gateway_requests_total",
        "encoding" => encoding.as_str(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("gateway_request_duration_seconds", "encoding" => encoding.as_str())
        .record(start.elapsed().as_secs_f64());
}
