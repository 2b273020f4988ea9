//! Animation style definitions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Animation applied to every uploaded image of a reel.
///
/// The catalog exposes Hebrew display names; [`AnimationStyle::from_display_name`]
/// maps them onto this closed set. Anything the lookup does not recognise becomes
/// [`AnimationStyle::Unrecognized`], which compiles to a no-op fragment: the image
/// is scaled and then discarded, the background passes through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AnimationStyle {
    /// Alpha fade-in then fade-out, looped, centered
    Fade,
    /// Continuous rotation, centered
    Rotate,
    /// Linear magnification up to a cap, centered
    Zoom,
    /// Horizontal sine sweep
    Slide,
    /// Horizontal sweep with a one-sided vertical bounce
    Bounce,
    /// Value that matched no known style (kept for logging)
    Unrecognized(String),
}

impl AnimationStyle {
    /// Known styles in catalog order.
    pub const KNOWN: &'static [AnimationStyle] = &[
        AnimationStyle::Fade,
        AnimationStyle::Rotate,
        AnimationStyle::Zoom,
        AnimationStyle::Slide,
        AnimationStyle::Bounce,
    ];

    /// Resolve a user-facing name (or an internal tag) to a style.
    ///
    /// Total: unknown names resolve to [`AnimationStyle::Unrecognized`].
    pub fn from_display_name(name: &str) -> Self {
        match name.trim() {
            "דעיכה" | "fade" => AnimationStyle::Fade,
            "סחרור" | "rotate" => AnimationStyle::Rotate,
            "זום" | "zoom" => AnimationStyle::Zoom,
            "מחליק פנימה" | "slide" => AnimationStyle::Slide,
            "אלכסון" | "bounce" => AnimationStyle::Bounce,
            other => AnimationStyle::Unrecognized(other.to_string()),
        }
    }

    /// Hebrew display name shown in the catalog.
    pub fn display_name(&self) -> Option<&'static str> {
        match self {
            AnimationStyle::Fade => Some("דעיכה"),
            AnimationStyle::Rotate => Some("סחרור"),
            AnimationStyle::Zoom => Some("זום"),
            AnimationStyle::Slide => Some("מחליק פנימה"),
            AnimationStyle::Bounce => Some("אלכסון"),
            AnimationStyle::Unrecognized(_) => None,
        }
    }

    /// Internal tag, used in logs and metric labels.
    pub fn as_tag(&self) -> &'static str {
        match self {
            AnimationStyle::Fade => "fade",
            AnimationStyle::Rotate => "rotate",
            AnimationStyle::Zoom => "zoom",
            AnimationStyle::Slide => "slide",
            AnimationStyle::Bounce => "bounce",
            AnimationStyle::Unrecognized(_) => "unrecognized",
        }
    }

    /// Whether the overlay is restricted to the clip's enable window.
    ///
    /// Rotate and fade overlays stay on for the whole reel.
    pub fn is_window_gated(&self) -> bool {
        matches!(
            self,
            AnimationStyle::Slide | AnimationStyle::Bounce | AnimationStyle::Zoom
        )
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, AnimationStyle::Unrecognized(_))
    }
}

impl fmt::Display for AnimationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_resolve() {
        assert_eq!(AnimationStyle::from_display_name("דעיכה"), AnimationStyle::Fade);
        assert_eq!(AnimationStyle::from_display_name("סחרור"), AnimationStyle::Rotate);
        assert_eq!(AnimationStyle::from_display_name("זום"), AnimationStyle::Zoom);
        assert_eq!(
            AnimationStyle::from_display_name("מחליק פנימה"),
            AnimationStyle::Slide
        );
        assert_eq!(AnimationStyle::from_display_name("אלכסון"), AnimationStyle::Bounce);
    }

    #[test]
    fn test_internal_tags_resolve() {
        for style in AnimationStyle::KNOWN {
            assert_eq!(&AnimationStyle::from_display_name(style.as_tag()), style);
        }
    }

    #[test]
    fn test_unknown_name_is_unrecognized() {
        let style = AnimationStyle::from_display_name("spin-o-rama");
        assert_eq!(style, AnimationStyle::Unrecognized("spin-o-rama".to_string()));
        assert!(!style.is_recognized());
        assert_eq!(style.display_name(), None);
    }

    #[test]
    fn test_display_name_round_trip() {
        for style in AnimationStyle::KNOWN {
            let name = style.display_name().unwrap();
            assert_eq!(&AnimationStyle::from_display_name(name), style);
        }
    }

    #[test]
    fn test_window_gating() {
        assert!(AnimationStyle::Slide.is_window_gated());
        assert!(AnimationStyle::Zoom.is_window_gated());
        assert!(!AnimationStyle::Rotate.is_window_gated());
        assert!(!AnimationStyle::Fade.is_window_gated());
    }
}
