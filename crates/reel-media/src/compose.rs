//! Graph assembler: background scale, per-clip fragments in upload order,
//! caption last.

use tracing::debug;

use crate::animation::compile_animation;
use crate::caption::compile_caption;
use crate::config::{FrameSize, MovieConfig};
use crate::error::MediaResult;
use crate::graph::{
    FilterChain, FilterFragment, FilterGraph, FragmentKind, GraphBuilder, GraphError, StreamLabel,
};
use crate::resolve::ResolvedSelection;
use crate::timeline::plan_windows;

/// Engine input index of the background image.
pub const BACKGROUND_INPUT: usize = 0;

/// Engine input index of uploaded image `clip`.
pub fn image_input_index(clip: usize) -> usize {
    clip + 1
}

/// Fragments contributed by one clip: its scale, then its animation.
#[derive(Debug, Clone)]
pub struct ClipFragments {
    pub scale: FilterFragment,
    pub animation: FilterFragment,
}

/// `[0:v]scale=WxH[background]`
pub fn scale_background(canvas: FrameSize) -> FilterFragment {
    FilterFragment::new(FragmentKind::BackgroundScale).chain(
        FilterChain::new()
            .input(StreamLabel::input_video(BACKGROUND_INPUT))
            .filter(format!("scale={}:{}", canvas.width, canvas.height))
            .output(StreamLabel::background()),
    )
}

/// `[<clip+1>:v]scale=WxH[image-<clip>]`
pub fn scale_image(clip: usize, size: FrameSize) -> FilterFragment {
    FilterFragment::new(FragmentKind::ImageScale { clip }).chain(
        FilterChain::new()
            .input(StreamLabel::input_video(image_input_index(clip)))
            .filter(format!("scale={}:{}", size.width, size.height))
            .output(StreamLabel::image(clip)),
    )
}

/// Assemble the full graph in z-order and validate label continuity.
pub fn assemble(
    background: FilterFragment,
    clips: Vec<ClipFragments>,
    caption: FilterFragment,
) -> Result<FilterGraph, GraphError> {
    if clips.is_empty() {
        return Err(GraphError::NoClips);
    }

    let mut builder = GraphBuilder::new();
    builder.push(background)?;
    for clip in clips {
        builder.push(clip.scale)?;
        builder.push(clip.animation)?;
    }
    builder.push(caption)?;

    builder.finish(StreamLabel::background())
}

/// Compile a resolved selection into a validated graph.
pub fn build_movie_graph(
    selection: &ResolvedSelection,
    config: &MovieConfig,
) -> MediaResult<FilterGraph> {
    let windows = plan_windows(config.duration_secs, selection.clip_count())?;

    let clips = windows
        .iter()
        .enumerate()
        .map(|(clip, window)| ClipFragments {
            scale: scale_image(clip, config.clip_size),
            animation: compile_animation(&selection.animation, clip, window, config.duration_secs),
        })
        .collect();

    let graph = assemble(
        scale_background(config.canvas),
        clips,
        compile_caption(&selection.caption, &selection.font_path, &config.caption),
    )?;

    debug!(
        animation = %selection.animation,
        clips = selection.clip_count(),
        filter_complex = %graph.to_filter_complex(),
        "Compiled filter graph"
    );

    Ok(graph)
}
