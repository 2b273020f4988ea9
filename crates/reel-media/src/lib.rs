#![deny(unreachable_patterns)]
//! Filter-graph compiler and FFmpeg CLI wrapper for greeting reels.
//!
//! This crate provides:
//! - Selection resolution against the catalog and asset store
//! - Enable-window planning for multi-image reels
//! - Animation and caption compilers producing typed filter fragments
//! - A graph builder that checks label continuity before FFmpeg sees it
//! - Type-safe FFmpeg command building with progress parsing and timeouts
//! - `MovieMaker`, the entry point from a selection to a finished mp4

pub mod animation;
pub mod assets;
pub mod caption;
pub mod command;
pub mod compose;
pub mod config;
pub mod error;
pub mod fs_utils;
pub mod graph;
pub mod maker;
pub mod progress;
pub mod render;
pub mod resolve;
pub mod timeline;

pub use animation::compile_animation;
pub use assets::AssetStore;
pub use caption::{compile_caption, reverse_for_rtl, CaptionStyle};
pub use command::{check_ffmpeg, FfmpegCommand, FfmpegInput, FfmpegRunner, RenderEngine};
pub use compose::{assemble, build_movie_graph, ClipFragments};
pub use config::{FrameSize, MovieConfig};
pub use error::{MediaError, MediaResult};
pub use graph::{
    FilterChain, FilterFragment, FilterGraph, FragmentKind, GraphBuilder, GraphError, StreamLabel,
};
pub use maker::{MovieMaker, VideoOutput, STATUS_COMPLETE};
pub use progress::FfmpegProgress;
pub use render::{render, RenderJob};
pub use resolve::{resolve, ResolvedSelection};
pub use timeline::plan_windows;
