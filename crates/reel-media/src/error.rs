//! Error types for media operations.

use std::path::PathBuf;
use thiserror::Error;

use reel_models::ValidationError;

use crate::graph::GraphError;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur while compiling or rendering a reel.
#[derive(Debug, Error)]
pub enum MediaError {
    /// Bad selection input; raised before FFmpeg is ever started.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid filter graph: {0}")]
    Graph(#[from] GraphError),

    #[error("Invalid timeline: {0}")]
    InvalidTimeline(String),

    #[error("FFmpeg not found in PATH")]
    FfmpegNotFound,

    /// The external engine exited abnormally.
    #[error("FFmpeg command failed: {message}")]
    FfmpegFailed {
        message: String,
        stderr: Option<String>,
        exit_code: Option<i32>,
    },

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Operation timed out after {0} seconds")]
    Timeout(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MediaError {
    /// Create an FFmpeg failure error.
    pub fn ffmpeg_failed(
        message: impl Into<String>,
        stderr: Option<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self::FfmpegFailed {
            message: message.into(),
            stderr,
            exit_code,
        }
    }

    /// Create an invalid timeline error.
    pub fn invalid_timeline(message: impl Into<String>) -> Self {
        Self::InvalidTimeline(message.into())
    }

    /// Whether the error was caused by user input rather than the engine.
    pub fn is_validation(&self) -> bool {
        matches!(self, MediaError::Validation(_))
    }

    /// Engine diagnostics (stderr tail) when available.
    pub fn diagnostics(&self) -> Option<&str> {
        match self {
            MediaError::FfmpegFailed { stderr, .. } => stderr.as_deref(),
            _ => None,
        }
    }
}
