//! User selection submitted for a reel, and its validation rules.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum caption length in characters (not bytes).
pub const MAX_CAPTION_CHARS: usize = 30;

/// Maximum number of images per reel.
pub const MAX_IMAGES: usize = 2;

/// First character outside the caption charset: Hebrew block, whitespace,
/// digits and a small punctuation set (`+` through `=` is an ASCII range).
static DISALLOWED_CAPTION_CHAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\x{0590}-\x{05FF}\s0-9!@#\$%\^\&\*,'\(\)_\x2B-\x3D]")
        .expect("caption charset pattern is valid")
});

/// An uploaded image handed over by the upload layer.
///
/// The file at `path` is temporary and owned by the render pipeline once
/// submitted: it is removed after the render finishes, whatever the outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedImage {
    pub path: PathBuf,
    pub original_name: String,
}

impl UploadedImage {
    pub fn new(path: impl Into<PathBuf>, original_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            original_name: original_name.into(),
        }
    }
}

/// Raw selection as received from the request layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub song: String,
    pub background: String,
    pub animation: String,
    pub caption: String,
    pub images: Vec<UploadedImage>,
}

/// Reasons a selection is rejected before any rendering starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("No images uploaded")]
    NoImages,

    #[error("Too many images: {count} (max {max})")]
    TooManyImages { count: usize, max: usize },

    #[error("Caption too long: {length} characters (max {max})")]
    CaptionTooLong { length: usize, max: usize },

    #[error("Caption contains disallowed character {0:?}")]
    CaptionCharacter(char),

    #[error("Unknown song: {0}")]
    UnknownSong(String),

    #[error("Unknown background: {0}")]
    UnknownBackground(String),
}

/// Check a caption against the length limit and the allowed charset.
///
/// An empty caption is valid.
pub fn validate_caption(caption: &str) -> Result<(), ValidationError> {
    let length = caption.chars().count();
    if length > MAX_CAPTION_CHARS {
        return Err(ValidationError::CaptionTooLong {
            length,
            max: MAX_CAPTION_CHARS,
        });
    }

    if let Some(m) = DISALLOWED_CAPTION_CHAR.find(caption) {
        // find() only matches a single character
        let c = m.as_str().chars().next().unwrap_or_default();
        return Err(ValidationError::CaptionCharacter(c));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hebrew_caption_accepted() {
        assert!(validate_caption("שלום").is_ok());
        assert!(validate_caption("שבת שלום 2024!").is_ok());
        assert!(validate_caption("").is_ok());
    }

    #[test]
    fn test_punctuation_range_accepted() {
        // + through = covers , - . / digits : ; < =
        assert!(validate_caption("+,-./:;<=").is_ok());
        assert!(validate_caption("!@#$%^&*'()_").is_ok());
    }

    #[test]
    fn test_exactly_max_length_accepted() {
        let caption: String = "א".repeat(MAX_CAPTION_CHARS);
        assert_eq!(caption.chars().count(), 30);
        assert!(validate_caption(&caption).is_ok());
    }

    #[test]
    fn test_one_over_max_length_rejected() {
        let caption: String = "א".repeat(MAX_CAPTION_CHARS + 1);
        assert_eq!(
            validate_caption(&caption),
            Err(ValidationError::CaptionTooLong { length: 31, max: 30 })
        );
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // 30 Hebrew letters are 60 bytes of UTF-8
        let caption: String = "ש".repeat(30);
        assert_eq!(caption.len(), 60);
        assert!(validate_caption(&caption).is_ok());
    }

    #[test]
    fn test_latin_letters_rejected() {
        assert_eq!(
            validate_caption("shalom"),
            Err(ValidationError::CaptionCharacter('s'))
        );
    }

    #[test]
    fn test_chars_outside_range_rejected() {
        for bad in ["שלום?", "שלום>", "[שלום]", "a", "\u{05FF}\u{0600}", "\"", "\\"] {
            assert!(
                matches!(validate_caption(bad), Err(ValidationError::CaptionCharacter(_))),
                "expected rejection for {bad:?}"
            );
        }
    }
}
