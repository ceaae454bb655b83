//! Metrics collection and exposition.
//!
//! # Metrics
//! - `overlay_requests_total` (counter): HTTP requests by endpoint, status
//! - `overlay_request_duration_seconds` (histogram): handler latency
//! - `overlay_navigations_total` (counter): router outcomes by route
//! - `overlay_view_load_seconds` (histogram): loader latency by route
//! - `overlay_polls_total` (counter): poller outcomes
//! - `overlay_feed_clients` (gauge): connected WebSocket clients

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(endpoint: &'static str, status: u16, start: Instant) {
    ::metrics::counter!(
        "overlay_requests_total",
        "endpoint" => endpoint,
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!("overlay_request_duration_seconds", "endpoint" => endpoint)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_navigation(route: &str, outcome: &'static str) {
    ::metrics::counter!(
        "overlay_navigations_total",
        "route" => route.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

pub fn record_load_duration(route: &str, start: Instant) {
    ::metrics::histogram!("overlay_view_load_seconds", "route" => route.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_poll(outcome: &'static str) {
    ::metrics::counter!("overlay_polls_total", "outcome" => outcome).increment(1);
}

pub fn set_feed_clients(count: usize) {
    ::metrics::gauge!("overlay_feed_clients").set(count as f64);
}
