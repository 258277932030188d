//! Batch worker metrics and Prometheus exporter setup.

use std::net::{Ipv4Addr, SocketAddr};

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::error::{WorkerError, WorkerResult};

/// Install the Prometheus recorder with an HTTP listener on `port`.
pub fn init_metrics(port: u16) -> WorkerResult<()> {
    PrometheusBuilder::new()
        .with_http_listener(SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)))
        .install()
        .map_err(|e| WorkerError::config_error(format!("Failed to install Prometheus exporter: {e}")))
}

/// Metric names as constants for consistency.
pub mod names {
    pub const FILES_TOTAL: &str = "serve_worker_files_total";
    pub const FILE_DURATION_SECONDS: &str = "serve_worker_file_duration_seconds";
    pub const FILES_IN_FLIGHT: &str = "serve_worker_files_in_flight";
    pub const BATCH_SIZE: &str = "serve_worker_batch_size";
}

/// Record a processed input file.
///
/// `outcome` is one of "completed", "failed", "invalid", "timeout" or "error".
pub fn record_file(outcome: &str, duration_secs: f64) {
    counter!(names::FILES_TOTAL, "outcome" => outcome.to_string()).increment(1);
    histogram!(names::FILE_DURATION_SECONDS).record(duration_secs);
}

pub fn file_started() {
    gauge!(names::FILES_IN_FLIGHT).increment(1.0);
}

pub fn file_finished() {
    gauge!(names::FILES_IN_FLIGHT).decrement(1.0);
}

pub fn record_batch_size(files: usize) {
    gauge!(names::BATCH_SIZE).set(files as f64);
}
