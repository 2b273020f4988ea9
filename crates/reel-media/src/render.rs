//! Render invoker: turns a compiled graph into one FFmpeg run.

use std::path::PathBuf;
use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::command::{FfmpegCommand, RenderEngine};
use crate::config::MovieConfig;
use crate::error::MediaResult;
use crate::fs_utils::{require_files, FileGuard};
use crate::graph::{FilterGraph, StreamLabel};
use crate::resolve::ResolvedSelection;

/// Engine input index of the song for a reel with `clip_count` images.
pub fn song_input_index(clip_count: usize) -> usize {
    clip_count + 1
}

/// File stem for a reel finished at `now`.
pub fn output_stem(now: DateTime<Utc>) -> String {
    format!("output_{}", now.timestamp_millis())
}

/// Everything needed for one engine run. Consumed by [`render`].
///
/// Owns the uploaded images and the reserved output file: dropping the job
/// before [`render`] succeeds deletes all of them.
#[derive(Debug)]
pub struct RenderJob {
    pub command: FfmpegCommand,
    pub output_path: PathBuf,
    cleanup: FileGuard,
}

impl RenderJob {
    /// Lay out inputs, graph, maps and encoding for `selection`.
    ///
    /// Input order: background, each image, song, then the auxiliary image.
    pub fn new(
        selection: &ResolvedSelection,
        graph: &FilterGraph,
        config: &MovieConfig,
        output_path: PathBuf,
    ) -> Self {
        let mut command = FfmpegCommand::new(&output_path)
            .looped_input(&selection.background_path, Some(config.duration_secs));

        for image in &selection.images {
            command = command.looped_input(&image.path, Some(config.clip_duration_secs));
        }

        command = command.input(&selection.song_path);

        if config.include_aux_input {
            command = command.input(&selection.aux_image_path);
        }

        let song = StreamLabel::input_audio(song_input_index(selection.clip_count()));
        let command = command
            .filter_complex(graph.to_filter_complex())
            .map(graph.output().to_string())
            .map(song.as_str())
            .output_args(config.encoding.to_ffmpeg_args())
            .duration(config.duration_secs);

        let mut cleanup = FileGuard::new(selection.images.iter().map(|i| i.path.clone()));
        cleanup.push(output_path.clone());

        Self {
            command,
            output_path,
            cleanup,
        }
    }

    /// Uploaded images removed once the job is done with.
    pub fn uploads(&self) -> impl Iterator<Item = &PathBuf> {
        self.cleanup
            .paths()
            .iter()
            .filter(move |p| **p != self.output_path)
    }
}

/// Run `job` on `engine`.
///
/// Uploads are removed whatever the outcome, including when this future is
/// dropped. On failure the output is removed too and no path is returned.
pub async fn render(mut job: RenderJob, engine: &dyn RenderEngine) -> MediaResult<PathBuf> {
    let start = Instant::now();
    debug!(output = %job.output_path.display(), "Starting render");

    let result = async {
        let inputs: Vec<&std::path::Path> =
            job.command.inputs().iter().map(|i| i.path.as_path()).collect();
        require_files(inputs).await?;
        engine.execute(&job.command).await
    }
    .await;

    match result {
        Ok(()) => {
            info!(
                output = %job.output_path.display(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Render complete"
            );
            job.cleanup.release(&job.output_path);
            Ok(job.output_path.clone())
        }
        Err(e) => {
            warn!(
                error = %e,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Render failed"
            );
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use reel_models::{AnimationStyle, UploadedImage};
    use tempfile::TempDir;

    use crate::compose::build_movie_graph;
    use crate::error::MediaError;

    /// Records the command and optionally fails.
    #[derive(Default)]
    struct FakeEngine {
        fail_with: Option<String>,
        seen: Mutex<Vec<Vec<String>>>,
    }

    #[async_trait]
    impl RenderEngine for FakeEngine {
        async fn execute(&self, cmd: &FfmpegCommand) -> MediaResult<()> {
            self.seen.lock().unwrap().push(cmd.build_args());
            match &self.fail_with {
                Some(msg) => Err(MediaError::ffmpeg_failed(msg.clone(), Some(msg.clone()), Some(1))),
                None => {
                    std::fs::write(cmd.output(), b"mp4").unwrap();
                    Ok(())
                }
            }
        }
    }

    struct Fixture {
        _tmp: TempDir,
        selection: ResolvedSelection,
        output: PathBuf,
    }

    fn fixture(images: usize) -> Fixture {
        let tmp = TempDir::new().unwrap();
        let touch = |name: &str| {
            let path = tmp.path().join(name);
            std::fs::write(&path, b"x").unwrap();
            path
        };

        let selection = ResolvedSelection {
            background_path: touch("bg.jpg"),
            song_path: touch("song.mp3"),
            font_path: touch("font.otf"),
            aux_image_path: touch("aux.png"),
            animation: AnimationStyle::Slide,
            caption: "שלום".to_string(),
            images: (0..images)
                .map(|i| UploadedImage::new(touch(&format!("upload-{i}")), format!("{i}.jpg")))
                .collect(),
        };
        let output = tmp.path().join("output_1.mp4");

        Fixture {
            _tmp: tmp,
            selection,
            output,
        }
    }

    fn job(f: &Fixture) -> RenderJob {
        let config = MovieConfig::default();
        let graph = build_movie_graph(&f.selection, &config).unwrap();
        RenderJob::new(&f.selection, &graph, &config, f.output.clone())
    }

    #[test]
    fn test_output_stem_uses_millis() {
        let now = DateTime::from_timestamp_millis(1_700_000_000_123).unwrap();
        assert_eq!(output_stem(now), "output_1700000000123");
    }

    #[test]
    fn test_job_layout() {
        let f = fixture(2);
        let job = job(&f);
        let inputs = job.command.inputs();

        assert_eq!(inputs.len(), 5);
        assert_eq!(inputs[0].path, f.selection.background_path);
        assert_eq!(inputs[0].args, vec!["-loop", "1", "-t", "30.000"]);
        assert_eq!(inputs[1].args, vec!["-loop", "1", "-t", "15.000"]);
        assert_eq!(inputs[3].path, f.selection.song_path);
        assert_eq!(inputs[4].path, f.selection.aux_image_path);
        assert!(inputs[4].args.is_empty());

        let args = job.command.build_args().join(" ");
        assert!(args.contains("-map [background] -map 3:a"));
        assert!(args.contains("-c:v libx264"));
        assert!(args.contains("-t 30.000"));
        assert_eq!(job.uploads().count(), 2);
    }

    #[test]
    fn test_aux_input_can_be_dropped() {
        let f = fixture(1);
        let config = MovieConfig {
            include_aux_input: false,
            ..Default::default()
        };
        let graph = build_movie_graph(&f.selection, &config).unwrap();
        let job = RenderJob::new(&f.selection, &graph, &config, f.output.clone());
        assert_eq!(job.command.inputs().len(), 3);
        assert!(job.command.build_args().join(" ").contains("-map 2:a"));
    }

    #[tokio::test]
    async fn test_render_success_cleans_uploads() {
        let f = fixture(1);
        let engine = FakeEngine::default();

        let path = render(job(&f), &engine).await.unwrap();

        assert_eq!(path, f.output);
        assert!(path.exists());
        assert!(!f.selection.images[0].path.exists());
        assert_eq!(engine.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_render_failure_cleans_uploads_and_output() {
        let f = fixture(2);
        std::fs::write(&f.output, b"").unwrap();
        let engine = FakeEngine {
            fail_with: Some("Invalid argument".to_string()),
            ..Default::default()
        };

        let err = render(job(&f), &engine).await.unwrap_err();

        assert!(matches!(&err, MediaError::FfmpegFailed { message, .. } if message == "Invalid argument"));
        assert!(!f.output.exists());
        for image in &f.selection.images {
            assert!(!image.path.exists());
        }
    }

    /// Never finishes, like an FFmpeg run stuck on a broken input.
    struct HangingEngine;

    #[async_trait]
    impl RenderEngine for HangingEngine {
        async fn execute(&self, _cmd: &FfmpegCommand) -> MediaResult<()> {
            std::future::pending::<()>().await;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_dropped_render_cleans_uploads_and_output() {
        let f = fixture(2);
        std::fs::write(&f.output, b"").unwrap();

        let run = render(job(&f), &HangingEngine);
        let elapsed = tokio::time::timeout(std::time::Duration::from_millis(200), run).await;

        assert!(elapsed.is_err());
        assert!(!f.output.exists());
        for image in &f.selection.images {
            assert!(!image.path.exists());
        }
        assert!(f.selection.song_path.exists());
    }

    #[tokio::test]
    async fn test_missing_input_never_reaches_engine() {
        let f = fixture(1);
        std::fs::remove_file(&f.selection.song_path).unwrap();
        let engine = FakeEngine::default();

        let err = render(job(&f), &engine).await.unwrap_err();

        assert!(matches!(err, MediaError::FileNotFound(p) if p == f.selection.song_path));
        assert!(engine.seen.lock().unwrap().is_empty());
        assert!(!f.selection.images[0].path.exists());
    }
}
