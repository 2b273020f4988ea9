//! MovieMaker: the single entry point from a user selection to a finished reel.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use reel_models::{Catalog, CatalogListing, Selection};
use tracing::{debug, info};

use crate::assets::AssetStore;
use crate::command::{FfmpegRunner, RenderEngine};
use crate::compose::build_movie_graph;
use crate::config::MovieConfig;
use crate::error::MediaResult;
use crate::fs_utils::{ensure_dir, reserve_file, FileGuard};
use crate::render::{output_stem, render, RenderJob};
use crate::resolve::resolve;

/// Status reported for a finished reel.
pub const STATUS_COMPLETE: &str = "complete";

/// A finished reel.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoOutput {
    pub status: &'static str,
    /// Path relative to the static root, e.g. `outputs/output_1700000000000.mp4`
    pub video_url: String,
    pub video_path: PathBuf,
}

/// Compiles selections and drives the render engine.
///
/// Cheap to clone; configuration and catalog are shared read-only.
#[derive(Clone)]
pub struct MovieMaker {
    config: Arc<MovieConfig>,
    catalog: Arc<Catalog>,
    assets: AssetStore,
    engine: Arc<dyn RenderEngine>,
}

impl MovieMaker {
    pub fn new(config: MovieConfig, catalog: Catalog, engine: Arc<dyn RenderEngine>) -> Self {
        let assets = AssetStore::new(config.asset_root.clone());
        Self {
            config: Arc::new(config),
            catalog: Arc::new(catalog),
            assets,
            engine,
        }
    }

    /// MovieMaker backed by the `ffmpeg` binary on `PATH`.
    pub fn with_ffmpeg(config: MovieConfig, catalog: Catalog) -> Self {
        let runner = match config.render_timeout_secs {
            Some(secs) => FfmpegRunner::new().with_timeout(secs),
            None => FfmpegRunner::new(),
        };
        Self::new(config, catalog, Arc::new(runner))
    }

    pub fn config(&self) -> &MovieConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    /// Options a client may choose from.
    pub fn list_catalog(&self) -> CatalogListing {
        self.catalog.listing()
    }

    /// Validate, compile and render `selection`.
    ///
    /// Validation runs before the engine is touched. The uploaded images are
    /// deleted on every path, including rejected selections and a caller that
    /// stops polling mid-render.
    pub async fn create_video(&self, selection: Selection) -> MediaResult<VideoOutput> {
        let mut uploads = FileGuard::new(selection.images.iter().map(|i| i.path.clone()));

        let job = match self.prepare(&selection).await {
            Ok(job) => job,
            Err(e) => {
                debug!(error = %e, "Selection rejected before render");
                return Err(e);
            }
        };
        // The job owns the uploads from here on
        uploads.release_all();

        let video_path = render(job, self.engine.as_ref()).await?;
        let video_url = self.video_url(&video_path);

        info!(video_url = %video_url, "Reel created");

        Ok(VideoOutput {
            status: STATUS_COMPLETE,
            video_url,
            video_path,
        })
    }

    async fn prepare(&self, selection: &Selection) -> MediaResult<RenderJob> {
        let resolved = resolve(selection, &self.catalog, &self.assets, self.config.max_clips)?;
        let graph = build_movie_graph(&resolved, &self.config)?;

        let output_dir = self.config.resolved_output_dir();
        ensure_dir(&output_dir).await?;
        let output_path = reserve_file(&output_dir, &output_stem(Utc::now()), "mp4").await?;

        Ok(RenderJob::new(&resolved, &graph, &self.config, output_path))
    }

    fn video_url(&self, path: &Path) -> String {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let prefix = self.config.output_url_prefix.trim_end_matches('/');
        if prefix.is_empty() {
            file_name
        } else {
            format!("{prefix}/{file_name}")
        }
    }
}

impl std::fmt::Debug for MovieMaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MovieMaker")
            .field("config", &self.config)
            .field("assets", &self.assets)
            .finish_non_exhaustive()
    }
}
