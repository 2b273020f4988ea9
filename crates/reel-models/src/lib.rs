//! Shared data models for the greeting reel service.
//!
//! This crate provides Serde-serializable types for:
//! - The product catalog (songs, backgrounds, animations)
//! - Animation styles
//! - User selections and their validation rules
//! - Timeline enable windows
//! - Encoding configuration

pub mod animation;
pub mod catalog;
pub mod encoding;
pub mod selection;
pub mod timeline;

// Re-export common types
pub use animation::AnimationStyle;
pub use catalog::{Catalog, CatalogListing};
pub use encoding::EncodingConfig;
pub use selection::{
    validate_caption, Selection, UploadedImage, ValidationError, MAX_CAPTION_CHARS, MAX_IMAGES,
};
pub use timeline::{fmt_secs, EnableWindow};
