//! API routes.

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;

use crate::handlers::{create_video, health, list_options, ready};
use crate::metrics::metrics_middleware;
use crate::middleware::{cors_layer, request_id, request_logging, security_headers};
use crate::state::AppState;

/// Static directory served at `/`, relative to the asset root.
const PUBLIC_DIR: &str = "public";

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let reel_routes = Router::new()
        .route("/options", get(list_options))
        .route("/create-video", post(create_video));

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready));

    // Metrics endpoint (if enabled)
    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    let movie = state.maker.config();
    let output_prefix = movie.output_url_prefix.trim_matches('/').to_string();
    let outputs = ServeDir::new(movie.resolved_output_dir());
    let public = ServeDir::new(state.maker.assets().root().join(PUBLIC_DIR));

    let mut router = Router::new()
        .merge(reel_routes)
        .merge(health_routes)
        .merge(metrics_routes);

    if !output_prefix.is_empty() {
        router = router.nest_service(&format!("/{output_prefix}"), outputs);
    }

    router
        .fallback_service(public)
        // Multipart extraction has its own, smaller default limit
        .layer(DefaultBodyLimit::max(state.config.max_body_size))
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
