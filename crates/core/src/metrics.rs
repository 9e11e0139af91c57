//! Metrics definitions for connection resolution.
//!
//! Metrics are collected using the `metrics` crate and can be exported
//! to Prometheus via `metrics-exporter-prometheus`.

use metrics::{counter, describe_counter, describe_histogram, histogram};
use std::time::Instant;

/// Initialize all metric descriptions.
/// Call this once at startup before any metrics are recorded.
pub fn init_metrics() {
    describe_counter!(
        "connections_resolved_total",
        "Total number of paginated connections resolved"
    );
    describe_counter!(
        "connection_validation_errors_total",
        "Total number of connection requests rejected before any storage call"
    );
    describe_counter!(
        "connection_storage_errors_total",
        "Total number of connection resolutions aborted by a storage failure"
    );
    describe_histogram!(
        "connection_resolution_duration_seconds",
        "Time taken to resolve a connection in seconds"
    );
}

/// Record a successfully resolved connection.
///
/// # Arguments
/// * `resource` - The paginated resource ("users", "todos")
/// * `backward` - Whether the window was anchored at the end
pub fn record_connection_resolved(resource: &'static str, backward: bool) {
    let direction = if backward { "backward" } else { "forward" };
    counter!("connections_resolved_total", "resource" => resource, "window" => direction)
        .increment(1);
}

/// Record a rejected set of connection arguments.
pub fn record_validation_error(resource: &'static str, kind: &'static str) {
    counter!("connection_validation_errors_total", "resource" => resource, "kind" => kind)
        .increment(1);
}

/// Record a storage failure during resolution.
pub fn record_storage_error(resource: &'static str) {
    counter!("connection_storage_errors_total", "resource" => resource).increment(1);
}

/// A timer that records resolution duration when dropped.
pub struct ResolutionTimer {
    resource: &'static str,
    start: Instant,
}

impl ResolutionTimer {
    /// Start a new timer for `resource`.
    pub fn new(resource: &'static str) -> Self {
        Self {
            resource,
            start: Instant::now(),
        }
    }
}

impl Drop for ResolutionTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        histogram!("connection_resolution_duration_seconds", "resource" => self.resource)
            .record(duration);
    }
}
