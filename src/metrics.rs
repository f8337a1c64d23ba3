//! Prometheus metrics for inserts, imports and HTTP latency.
//!
//! This module provides metrics for:
//! - Students inserted per entry point
//! - Import outcomes
//! - Durable log append failures
//! - HTTP request latency

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::{debug, error};

// === Metric Name Constants ===

/// Students inserted counter metric name.
pub const METRIC_STUDENTS_INSERTED: &str = "students_inserted_total";
/// Import runs counter metric name.
pub const METRIC_IMPORTS: &str = "imports_total";
/// Durable log append failures counter metric name.
pub const METRIC_PERSISTENCE_FAILURES: &str = "persistence_failures_total";
/// HTTP request latency metric name.
pub const METRIC_HTTP_REQUEST_LATENCY: &str = "http_request_latency_ms";

/// Where a student insert came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum InsertSource {
    /// `POST /addStudent`.
    Direct,
    /// Bulk import from the pending source.
    Import,
}

/// How an import run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ImportResultLabel {
    /// Records were read and inserted.
    Imported,
    /// The pending source does not exist.
    NothingToImport,
    /// The import aborted with an error.
    Failed,
}

/// Install the Prometheus recorder and describe all metrics.
/// Returns `None` if a recorder is already installed.
pub fn init_metrics() -> Option<PrometheusHandle> {
    let handle = match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => handle,
        Err(e) => {
            error!("Failed to install Prometheus recorder: {}", e);
            return None;
        }
    };

    describe_counter!(METRIC_STUDENTS_INSERTED, "Total number of students inserted");
    describe_counter!(METRIC_IMPORTS, "Total number of import runs by outcome");
    describe_counter!(
        METRIC_PERSISTENCE_FAILURES,
        "Total number of failed durable log appends"
    );
    describe_histogram!(
        METRIC_HTTP_REQUEST_LATENCY,
        "HTTP request latency in milliseconds"
    );

    debug!("Metrics initialized");
    Some(handle)
}

/// Count inserted students.
pub fn inc_students_inserted(source: InsertSource, count: u64) {
    let source: &'static str = source.into();
    counter!(METRIC_STUDENTS_INSERTED, "source" => source).increment(count);
}

/// Count an import run.
pub fn inc_imports(outcome: ImportResultLabel) {
    let outcome: &'static str = outcome.into();
    counter!(METRIC_IMPORTS, "outcome" => outcome).increment(1);
}

/// Count a failed durable log append.
pub fn inc_persistence_failures() {
    counter!(METRIC_PERSISTENCE_FAILURES).increment(1);
}

/// Record HTTP request latency.
pub fn record_http_latency(start: Instant, endpoint: &str) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_HTTP_REQUEST_LATENCY, "endpoint" => endpoint.to_string()).record(latency_ms);
}

/// Middleware recording the latency of every routed request by route template.
pub async fn track_http_latency(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let response = next.run(request).await;
    record_http_latency(start, &endpoint);
    response
}
