//! Caption overlay compiler.
//!
//! `drawtext` lays glyphs out left to right, so right-to-left captions are
//! reversed character by character before drawing. This is a presentation
//! workaround, not bidirectional shaping: mixed-direction runs (Hebrew with
//! digits) come out mirrored.

use std::path::Path;

use reel_models::fmt_secs;

use crate::graph::{escape_filter_value, FilterChain, FilterFragment, FragmentKind, StreamLabel};

/// Fixed caption styling.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionStyle {
    pub font_size: u32,
    pub font_color: String,
    pub shadow_color: String,
    pub shadow_offset: i32,
    /// Distance from the top edge
    pub y_offset: u32,
    /// Horizontal sway amplitude in pixels
    pub sway_amplitude: u32,
    /// Horizontal sway period in seconds
    pub sway_period_secs: f64,
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            font_size: 70,
            font_color: "red".to_string(),
            shadow_color: "white".to_string(),
            shadow_offset: 3,
            y_offset: 20,
            sway_amplitude: 30,
            sway_period_secs: 5.0,
        }
    }
}

/// Reverse the caption's characters for left-to-right drawing.
pub fn reverse_for_rtl(caption: &str) -> String {
    caption.chars().rev().collect()
}

/// Compile the caption fragment. Must be appended after every clip fragment
/// so the text renders above all imagery.
///
/// The caption's timing is fixed by its sway period; the reel duration is not
/// an input.
pub fn compile_caption(caption: &str, font_path: &Path, style: &CaptionStyle) -> FilterFragment {
    let text = escape_filter_value(&reverse_for_rtl(caption));
    let font = escape_filter_value(&font_path.to_string_lossy());

    let drawtext = format!(
        "drawtext=fontfile={font}:text={text}:expansion=none:\
         x='(w-tw)/2+{amp}*sin(2*PI*t/{period})':y={y}:\
         fontcolor={color}:fontsize={size}:\
         shadowcolor={shadow}:shadowx={off}:shadowy={off}",
        amp = style.sway_amplitude,
        period = fmt_secs(style.sway_period_secs),
        y = style.y_offset,
        color = style.font_color,
        size = style.font_size,
        shadow = style.shadow_color,
        off = style.shadow_offset,
    );

    FilterFragment::new(FragmentKind::Caption).chain(
        FilterChain::new()
            .input(StreamLabel::background())
            .filter(drawtext)
            .output(StreamLabel::background()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(s: &str) -> Vec<char> {
        let mut chars: Vec<char> = s.chars().collect();
        chars.sort_unstable();
        chars
    }

    #[test]
    fn test_reverse_hebrew() {
        assert_eq!(reverse_for_rtl("שלום"), "םולש");
        assert_eq!(reverse_for_rtl(""), "");
    }

    #[test]
    fn test_reverse_preserves_length_and_multiset() {
        for caption in ["שלום", "שבת שלום 2024!", "א", "(:)", "ש".repeat(30).as_str()] {
            let reversed = reverse_for_rtl(caption);
            assert_eq!(reversed.chars().count(), caption.chars().count());
            assert_eq!(sorted(&reversed), sorted(caption));
            assert_eq!(reverse_for_rtl(&reversed), caption);
        }
    }

    #[test]
    fn test_caption_fragment() {
        let fragment = compile_caption("שלום", Path::new("/assets/public/ktav.otf"), &CaptionStyle::default());
        assert_eq!(
            fragment.statements(),
            vec![
                "[background]drawtext=fontfile=/assets/public/ktav.otf:text=םולש:expansion=none:\
                 x='(w-tw)/2+30*sin(2*PI*t/5)':y=20:fontcolor=red:fontsize=70:\
                 shadowcolor=white:shadowx=3:shadowy=3[background]"
                    .to_string()
            ]
        );
        assert_eq!(fragment.inputs(), vec![StreamLabel::background()]);
        assert_eq!(fragment.outputs(), vec![StreamLabel::background()]);
    }

    #[test]
    fn test_special_characters_are_escaped() {
        let fragment = compile_caption("א:ב'", Path::new("font.otf"), &CaptionStyle::default());
        let statement = &fragment.statements()[0];
        // reversed to ' ב : א, each special character escaped twice
        assert!(statement.contains("text=\\\\\\'ב\\\\:א:expansion"));
    }

    #[test]
    fn test_edge_whitespace_is_kept() {
        let fragment = compile_caption("שלום ", Path::new("font.otf"), &CaptionStyle::default());
        let statement = &fragment.statements()[0];
        // the trailing space leads once reversed
        assert!(statement.contains("text=\\\\\\ םולש:expansion"));
    }

    #[test]
    fn test_style_values_flow_into_filter() {
        let style = CaptionStyle {
            font_size: 48,
            font_color: "yellow".to_string(),
            sway_period_secs: 2.5,
            ..Default::default()
        };
        let statement = compile_caption("א", Path::new("f.otf"), &style).statements().join("");
        assert!(statement.contains("fontsize=48"));
        assert!(statement.contains("fontcolor=yellow"));
        assert!(statement.contains("sin(2*PI*t/2.5)"));
    }
}
