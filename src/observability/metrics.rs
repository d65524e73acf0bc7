//! Client metrics.
//!
//! # Metrics
//! - `marketplace_requests_total` (counter): dispatched requests by method, status
//! - `marketplace_request_duration_seconds` (histogram): per-dispatch latency
//! - `marketplace_csrf_refresh_total` (counter): refreshes by outcome
//! - `marketplace_replays_total` (counter): replays after a 403 by outcome
//!
//! Recording goes through the `metrics` facade; nothing is exported unless
//! the embedding application installs a recorder.

use std::time::Duration;

use reqwest::{Method, StatusCode};

/// Record a completed dispatch.
pub fn record_request(method: &Method, status: StatusCode, elapsed: Duration) {
    metrics::counter!(
        "marketplace_requests_total",
        "method" => method.as_str().to_string(),
        "status" => status.as_u16().to_string()
    )
    .increment(1);
    metrics::histogram!(
        "marketplace_request_duration_seconds",
        "method" => method.as_str().to_string()
    )
    .record(elapsed.as_secs_f64());
}

/// Record a dispatch that never produced a response.
pub fn record_transport_error(method: &Method) {
    metrics::counter!(
        "marketplace_requests_total",
        "method" => method.as_str().to_string(),
        "status" => "transport_error"
    )
    .increment(1);
}

/// Record a CSRF refresh outcome ("success", "failed", "skipped").
pub fn record_csrf_refresh(outcome: &'static str) {
    metrics::counter!("marketplace_csrf_refresh_total", "outcome" => outcome).increment(1);
}

/// Record the outcome of a replayed request ("success", "rejected", "error").
pub fn record_replay(outcome: &'static str) {
    metrics::counter!("marketplace_replays_total", "outcome" => outcome).increment(1);
}
