//! Prometheus metrics for the API server.

use std::sync::LazyLock;
use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use regex_lite::Regex;

/// Install the Prometheus recorder and return a handle for rendering.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "reel_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "reel_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "reel_http_requests_in_flight";

    // Render metrics
    pub const RENDERS_STARTED_TOTAL: &str = "reel_renders_started_total";
    pub const RENDERS_COMPLETED_TOTAL: &str = "reel_renders_completed_total";
    pub const RENDERS_FAILED_TOTAL: &str = "reel_renders_failed_total";
    pub const RENDER_DURATION_SECONDS: &str = "reel_render_duration_seconds";
}

static OUTPUT_FILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/outputs/[^/]+$").expect("output path pattern is valid")
});

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a render handed to the engine.
pub fn record_render_started(animation: &str) {
    let labels = [("animation", animation.to_string())];
    counter!(names::RENDERS_STARTED_TOTAL, &labels).increment(1);
}

/// Record a finished render.
pub fn record_render_completed(animation: &str, duration_secs: f64) {
    let labels = [("animation", animation.to_string())];
    counter!(names::RENDERS_COMPLETED_TOTAL, &labels).increment(1);
    histogram!(names::RENDER_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a failed render. `reason` is `validation` or `engine`.
pub fn record_render_failed(animation: &str, reason: &'static str) {
    let labels = [
        ("animation", animation.to_string()),
        ("reason", reason.to_string()),
    ];
    counter!(names::RENDERS_FAILED_TOTAL, &labels).increment(1);
}

/// Collapse per-file paths so label cardinality stays bounded.
fn sanitize_path(path: &str) -> String {
    match path {
        "/options" | "/create-video" | "/health" | "/ready" | "/metrics" | "/" => path.to_string(),
        _ if OUTPUT_FILE.is_match(path) => "/outputs/:file".to_string(),
        _ => "/static".to_string(),
    }
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path() {
        assert_eq!(sanitize_path("/create-video"), "/create-video");
        assert_eq!(
            sanitize_path("/outputs/output_1700000000000.mp4"),
            "/outputs/:file"
        );
        assert_eq!(sanitize_path("/scripts.js"), "/static");
        assert_eq!(sanitize_path("/outputs/a/b"), "/static");
    }
}
