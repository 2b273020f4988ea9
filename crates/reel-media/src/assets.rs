//! Asset store: filesystem locations of backgrounds, songs, the caption font
//! and the auxiliary image.
//!
//! Layout under the asset root:
//!
//! ```text
//! backgrounds/<name>.jpg
//! songs/<name>.mp3
//! public/ktav.otf
//! public/test.png
//! ```

use std::path::{Path, PathBuf};

use reel_models::Catalog;
use tracing::debug;

/// Caption font, relative to the asset root.
pub const FONT_FILE: &str = "public/ktav.otf";

/// Auxiliary image declared as the last engine input, relative to the asset root.
pub const AUX_IMAGE_FILE: &str = "public/test.png";

/// Resolves catalog names to asset paths.
#[derive(Debug, Clone)]
pub struct AssetStore {
    root: PathBuf,
}

impl AssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn background_path(&self, name: &str) -> PathBuf {
        self.root.join("backgrounds").join(format!("{name}.jpg"))
    }

    pub fn song_path(&self, name: &str) -> PathBuf {
        self.root.join("songs").join(format!("{name}.mp3"))
    }

    pub fn font_path(&self) -> PathBuf {
        self.root.join(FONT_FILE)
    }

    pub fn aux_image_path(&self) -> PathBuf {
        self.root.join(AUX_IMAGE_FILE)
    }

    /// List every asset the catalog refers to that is missing on disk.
    pub fn missing_assets(&self, catalog: &Catalog) -> Vec<PathBuf> {
        let expected = catalog
            .backgrounds()
            .iter()
            .map(|b| self.background_path(b))
            .chain(catalog.songs().iter().map(|s| self.song_path(s)))
            .chain([self.font_path(), self.aux_image_path()]);

        let missing: Vec<PathBuf> = expected.filter(|p| !p.exists()).collect();
        if !missing.is_empty() {
            debug!(count = missing.len(), root = %self.root.display(), "Assets missing");
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_paths_follow_layout() {
        let store = AssetStore::new("/srv/reel");
        assert_eq!(
            store.background_path("כותל"),
            PathBuf::from("/srv/reel/backgrounds/כותל.jpg")
        );
        assert_eq!(
            store.song_path("התקווה"),
            PathBuf::from("/srv/reel/songs/התקווה.mp3")
        );
        assert_eq!(store.font_path(), PathBuf::from("/srv/reel/public/ktav.otf"));
        assert_eq!(store.aux_image_path(), PathBuf::from("/srv/reel/public/test.png"));
    }

    #[test]
    fn test_missing_assets_reports_everything_in_empty_root() {
        let dir = TempDir::new().unwrap();
        let store = AssetStore::new(dir.path());
        let catalog = Catalog::default();
        // 5 backgrounds + 6 songs + font + aux image
        assert_eq!(store.missing_assets(&catalog).len(), 13);
    }

    #[test]
    fn test_missing_assets_skips_present_files() {
        let dir = TempDir::new().unwrap();
        let catalog = Catalog::new(vec!["a".into()], vec!["b".into()], vec![]);
        std::fs::create_dir_all(dir.path().join("songs")).unwrap();
        std::fs::create_dir_all(dir.path().join("backgrounds")).unwrap();
        std::fs::create_dir_all(dir.path().join("public")).unwrap();
        std::fs::write(dir.path().join("songs/a.mp3"), b"").unwrap();
        std::fs::write(dir.path().join("backgrounds/b.jpg"), b"").unwrap();
        std::fs::write(dir.path().join(FONT_FILE), b"").unwrap();

        let store = AssetStore::new(dir.path());
        assert_eq!(store.missing_assets(&catalog), vec![store.aux_image_path()]);
    }
}
