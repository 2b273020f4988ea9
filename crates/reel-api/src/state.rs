//! Application state.

use reel_media::{MovieConfig, MovieMaker};
use reel_models::Catalog;

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone, Debug)]
pub struct AppState {
    pub config: ApiConfig,
    pub maker: MovieMaker,
}

impl AppState {
    pub fn new(config: ApiConfig, maker: MovieMaker) -> Self {
        Self { config, maker }
    }

    /// State backed by the `ffmpeg` binary and the built-in catalog.
    pub fn from_env(config: ApiConfig) -> Self {
        let maker = MovieMaker::with_ffmpeg(MovieConfig::from_env(), Catalog::default());
        Self::new(config, maker)
    }
}
