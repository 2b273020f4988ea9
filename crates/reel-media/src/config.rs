//! Reel rendering configuration.
//!
//! Built once at startup and shared read-only between requests.

use std::path::PathBuf;

use reel_models::{EncodingConfig, MAX_IMAGES};

use crate::caption::CaptionStyle;
use crate::error::{MediaError, MediaResult};

/// Default reel length in seconds.
pub const DEFAULT_MOVIE_DURATION_SECS: f64 = 30.0;

/// Default render timeout in seconds.
pub const DEFAULT_RENDER_TIMEOUT_SECS: u64 = 300;

/// Pixel size of a scaled stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Everything that shapes a reel apart from the user's selection.
#[derive(Debug, Clone)]
pub struct MovieConfig {
    /// Total reel length; also the period of the slide and bounce motions
    pub duration_secs: f64,
    /// How long each looped image input runs. Does not affect enable windows.
    pub clip_duration_secs: f64,
    /// Upper bound on uploaded images
    pub max_clips: usize,
    /// Background canvas size
    pub canvas: FrameSize,
    /// Size each uploaded image is scaled to before animating
    pub clip_size: FrameSize,
    pub encoding: EncodingConfig,
    pub caption: CaptionStyle,
    /// Root holding `backgrounds/`, `songs/` and `public/`
    pub asset_root: PathBuf,
    /// Where finished reels are written
    pub output_dir: PathBuf,
    /// URL prefix the outputs directory is served under
    pub output_url_prefix: String,
    /// Declare the auxiliary image as a trailing engine input
    pub include_aux_input: bool,
    /// Kill FFmpeg after this many seconds
    pub render_timeout_secs: Option<u64>,
}

impl Default for MovieConfig {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_MOVIE_DURATION_SECS,
            clip_duration_secs: DEFAULT_MOVIE_DURATION_SECS / 2.0,
            max_clips: MAX_IMAGES,
            canvas: FrameSize::new(640, 360),
            clip_size: FrameSize::new(320, 180),
            encoding: EncodingConfig::default(),
            caption: CaptionStyle::default(),
            asset_root: PathBuf::from("."),
            output_dir: PathBuf::from("public/outputs"),
            output_url_prefix: "outputs".to_string(),
            include_aux_input: true,
            render_timeout_secs: Some(DEFAULT_RENDER_TIMEOUT_SECS),
        }
    }
}

impl MovieConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let duration_secs = std::env::var("MOVIE_DURATION_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.duration_secs);

        let clip_duration_secs = std::env::var("CLIP_DURATION_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(duration_secs / 2.0);

        let render_timeout_secs = match std::env::var("RENDER_TIMEOUT_SECS") {
            // 0 disables the timeout
            Ok(s) => match s.parse::<u64>() {
                Ok(0) => None,
                Ok(secs) => Some(secs),
                Err(_) => defaults.render_timeout_secs,
            },
            Err(_) => defaults.render_timeout_secs,
        };

        Self {
            duration_secs,
            clip_duration_secs,
            asset_root: std::env::var("ASSET_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.asset_root),
            output_dir: std::env::var("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            render_timeout_secs,
            ..defaults
        }
    }

    /// Returns a new config with a different asset root.
    pub fn with_asset_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.asset_root = root.into();
        self
    }

    /// Returns a new config with a different output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Output directory, relative paths taken from the asset root.
    pub fn resolved_output_dir(&self) -> PathBuf {
        if self.output_dir.is_absolute() {
            self.output_dir.clone()
        } else {
            self.asset_root.join(&self.output_dir)
        }
    }

    /// Validate configuration.
    pub fn validate(&self) -> MediaResult<()> {
        if !self.duration_secs.is_finite() || self.duration_secs <= 0.0 {
            return Err(MediaError::invalid_timeline(format!(
                "movie duration must be positive, got {}",
                self.duration_secs
            )));
        }
        if !self.clip_duration_secs.is_finite() || self.clip_duration_secs <= 0.0 {
            return Err(MediaError::invalid_timeline(format!(
                "clip duration must be positive, got {}",
                self.clip_duration_secs
            )));
        }
        if self.max_clips == 0 {
            return Err(MediaError::invalid_timeline("max_clips must be at least 1"));
        }
        Ok(())
    }
}
