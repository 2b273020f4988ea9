//! Selection resolver: validates a user selection against the catalog and maps
//! it onto asset paths and an animation style.

use std::path::PathBuf;

use reel_models::{validate_caption, AnimationStyle, Catalog, Selection, UploadedImage, ValidationError};
use tracing::warn;

use crate::assets::AssetStore;

/// A selection that passed validation, with every name resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSelection {
    pub background_path: PathBuf,
    pub song_path: PathBuf,
    pub font_path: PathBuf,
    pub aux_image_path: PathBuf,
    pub animation: AnimationStyle,
    pub caption: String,
    pub images: Vec<UploadedImage>,
}

impl ResolvedSelection {
    pub fn clip_count(&self) -> usize {
        self.images.len()
    }
}

/// Validate `selection` and resolve it.
///
/// Checks run in a fixed order (images, caption, song, background) so the
/// first reported problem is stable. Pure: nothing on disk is touched.
pub fn resolve(
    selection: &Selection,
    catalog: &Catalog,
    assets: &AssetStore,
    max_clips: usize,
) -> Result<ResolvedSelection, ValidationError> {
    if selection.images.is_empty() {
        return Err(ValidationError::NoImages);
    }
    if selection.images.len() > max_clips {
        return Err(ValidationError::TooManyImages {
            count: selection.images.len(),
            max: max_clips,
        });
    }

    validate_caption(&selection.caption)?;

    if !catalog.has_song(&selection.song) {
        return Err(ValidationError::UnknownSong(selection.song.clone()));
    }
    if !catalog.has_background(&selection.background) {
        return Err(ValidationError::UnknownBackground(selection.background.clone()));
    }

    let animation = AnimationStyle::from_display_name(&selection.animation);
    if !animation.is_recognized() {
        warn!(
            animation = %selection.animation,
            "Unrecognized animation, images will not be composited"
        );
    }

    Ok(ResolvedSelection {
        background_path: assets.background_path(&selection.background),
        song_path: assets.song_path(&selection.song),
        font_path: assets.font_path(),
        aux_image_path: assets.aux_image_path(),
        animation,
        caption: selection.caption.clone(),
        images: selection.images.clone(),
    })
}
