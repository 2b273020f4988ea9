//! Product catalog: the songs, backgrounds and animations a user can pick.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::animation::AnimationStyle;

/// Default song names. Each maps to `songs/<name>.mp3` in the asset root.
pub const DEFAULT_SONGS: &[&str] = &[
    "מלאכי השלום",
    "ביבי המלך",
    "עם ישראל חי",
    "התקווה",
    "מזרחי טיפוסי",
    "שבוע טוב",
];

/// Default background names. Each maps to `backgrounds/<name>.jpg`.
pub const DEFAULT_BACKGROUNDS: &[&str] = &["שקיעה", "חיילים", "כותל", "שבת שלום", "פרחים"];

/// Immutable catalog, built once at startup and shared by reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Catalog {
    songs: Vec<String>,
    backgrounds: Vec<String>,
    animations: Vec<String>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            songs: DEFAULT_SONGS.iter().map(|s| s.to_string()).collect(),
            backgrounds: DEFAULT_BACKGROUNDS.iter().map(|s| s.to_string()).collect(),
            animations: AnimationStyle::KNOWN
                .iter()
                .filter_map(|style| style.display_name())
                .map(str::to_string)
                .collect(),
        }
    }
}

impl Catalog {
    /// Build a catalog from explicit lists.
    pub fn new(songs: Vec<String>, backgrounds: Vec<String>, animations: Vec<String>) -> Self {
        Self {
            songs,
            backgrounds,
            animations,
        }
    }

    pub fn songs(&self) -> &[String] {
        &self.songs
    }

    pub fn backgrounds(&self) -> &[String] {
        &self.backgrounds
    }

    pub fn animations(&self) -> &[String] {
        &self.animations
    }

    pub fn has_song(&self, name: &str) -> bool {
        self.songs.iter().any(|s| s == name)
    }

    pub fn has_background(&self, name: &str) -> bool {
        self.backgrounds.iter().any(|b| b == name)
    }

    pub fn has_animation(&self, name: &str) -> bool {
        self.animations.iter().any(|a| a == name)
    }

    /// Snapshot for the options listing.
    pub fn listing(&self) -> CatalogListing {
        CatalogListing {
            songs: self.songs.clone(),
            backgrounds: self.backgrounds.clone(),
            animations: self.animations.clone(),
        }
    }
}

/// Wire shape of `GET /options`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CatalogListing {
    pub songs: Vec<String>,
    pub backgrounds: Vec<String>,
    pub animations: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_sizes() {
        let catalog = Catalog::default();
        assert_eq!(catalog.songs().len(), 6);
        assert_eq!(catalog.backgrounds().len(), 5);
        assert_eq!(catalog.animations().len(), 5);
    }

    #[test]
    fn test_default_animations_are_all_recognized() {
        let catalog = Catalog::default();
        for name in catalog.animations() {
            assert!(AnimationStyle::from_display_name(name).is_recognized());
        }
    }

    #[test]
    fn test_membership() {
        let catalog = Catalog::default();
        assert!(catalog.has_song("התקווה"));
        assert!(catalog.has_background("כותל"));
        assert!(catalog.has_animation("זום"));
        assert!(!catalog.has_song("Bohemian Rhapsody"));
        assert!(!catalog.has_background("../etc/passwd"));
    }

    #[test]
    fn test_listing_serializes_with_expected_keys() {
        let json = serde_json::to_value(Catalog::default().listing()).unwrap();
        assert!(json["songs"].is_array());
        assert!(json["backgrounds"].is_array());
        assert_eq!(json["animations"][0], "דעיכה");
    }
}
