//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use reel_media::MediaError;
use reel_models::ValidationError;
use serde::Serialize;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

/// Body message for failed renders; clients match on it.
pub const RENDER_FAILED: &str = "Error creating video";

/// Body detail for server-side failures when details are hidden.
const HIDDEN_DETAIL: &str = "An internal error occurred";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{source}")]
    Render { source: MediaError, hide_details: bool },

    #[error("Internal error: {message}")]
    Internal { message: String, hide_details: bool },
}

impl From<MediaError> for ApiError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::Validation(e) => Self::Validation(e),
            source => Self::Render {
                source,
                hide_details: false,
            },
        }
    }
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal {
            message: msg.into(),
            hide_details: false,
        }
    }

    /// Keep server-side details out of the response body when `hide` is set.
    /// Client errors are always shown.
    pub fn hide_details(mut self, hide: bool) -> Self {
        match &mut self {
            ApiError::Render { hide_details, .. } | ApiError::Internal { hide_details, .. } => {
                *hide_details = hide;
            }
            ApiError::BadRequest(_) | ApiError::Validation(_) => {}
        }
        self
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Render { .. } | ApiError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

#[derive(Serialize)]
struct RenderErrorResponse {
    error: &'static str,
    details: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            ApiError::Render { hide_details, .. } => {
                let details = if *hide_details {
                    HIDDEN_DETAIL.to_string()
                } else {
                    self.to_string()
                };
                (
                    status,
                    Json(RenderErrorResponse {
                        error: RENDER_FAILED,
                        details,
                    }),
                )
                    .into_response()
            }
            ApiError::Internal {
                hide_details: true, ..
            } => (
                status,
                Json(ErrorResponse {
                    detail: HIDDEN_DETAIL.to_string(),
                }),
            )
                .into_response(),
            _ => (
                status,
                Json(ErrorResponse {
                    detail: self.to_string(),
                }),
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_validation_maps_to_bad_request() {
        let err: ApiError = MediaError::Validation(ValidationError::NoImages).into();
        assert!(matches!(err, ApiError::Validation(ValidationError::NoImages)));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "No images uploaded");
    }

    #[test]
    fn test_engine_failure_maps_to_server_error() {
        let err: ApiError = MediaError::ffmpeg_failed("Invalid argument", None, Some(1)).into();
        assert!(matches!(err, ApiError::Render { hide_details: false, .. }));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_hide_details_only_touches_server_errors() {
        let err = ApiError::internal("disk full").hide_details(true);
        assert!(matches!(err, ApiError::Internal { hide_details: true, .. }));

        let err = ApiError::bad_request("No images uploaded").hide_details(true);
        assert_eq!(err.to_string(), "Bad request: No images uploaded");
    }
}
