//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_submissions_total` (counter): submissions by transaction, outcome
//! - `gateway_submission_duration_seconds` (histogram): submission latency

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Start the Prometheus exporter on its own address.
///
/// Failure to start the exporter is logged, not fatal; the gateway serves
/// traffic without metrics rather than refusing to boot.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => {
            metrics::describe_counter!(
                "gateway_submissions_total",
                "Total transaction submissions by transaction name and outcome"
            );
            metrics::describe_histogram!(
                "gateway_submission_duration_seconds",
                "Transaction submission latency in seconds"
            );
            tracing::info!(address = %addr, "Metrics exporter started");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to start metrics exporter");
        }
    }
}

/// Record one submission attempt and its latency.
pub fn record_submission(transaction: &str, success: bool, start: Instant) {
    let outcome = if success { "success" } else { "failure" };
    metrics::counter!(
        "gateway_submissions_total",
        "transaction" => transaction.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!(
        "gateway_submission_duration_seconds",
        "transaction" => transaction.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}
