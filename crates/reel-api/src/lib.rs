//! Axum HTTP API server for greeting reels.
//!
//! This crate provides:
//! - The options listing and multipart reel creation endpoints
//! - Static serving of rendered outputs and the public directory
//! - Request id, logging, CORS and body limit middleware
//! - Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
