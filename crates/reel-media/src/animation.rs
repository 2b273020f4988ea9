//! Animation expression compiler.
//!
//! Each style compiles to a fragment that reads `[background]` and
//! `[image-<i>]` and writes `[background]`, so fragments compose by simple
//! concatenation whatever their number or order. Motion is expressed with
//! FFmpeg's per-frame expression evaluator (`t` is elapsed seconds, `W`/`H`
//! the main input size, `w`/`h` the overlay size).

use reel_models::{fmt_secs, AnimationStyle, EnableWindow};

use crate::graph::{FilterChain, FilterFragment, FragmentKind, StreamLabel};

/// Rotation speed numerator: the angle is `4*PI*t/60` radians.
const ROTATE_ANGLE_EXPR: &str = "4*PI*t/60";

/// Fade-in start and length (seconds from the start of the looped image stream).
const FADE_IN: (u32, u32) = (0, 1);
/// Fade-out start and length.
const FADE_OUT: (u32, u32) = (4, 3);
/// Frames buffered by the `loop` filter that repeats the faded image.
const FADE_LOOP_FRAMES: u32 = 70;

/// Zoom factor cap, start factor and growth over one ramp.
const ZOOM_CAP: f64 = 1.5;
const ZOOM_BASE: f64 = 0.1;
const ZOOM_GROWTH: f64 = 1.4;

const CENTER_X: &str = "(W-w)/2";
const CENTER_Y: &str = "(H-h)/2";

/// Compile the fragment animating clip `clip` within `window`.
///
/// `duration` is the total reel length; it sets the slide/bounce period and
/// the zoom ramp (a third of the reel). Pure: equal inputs give equal output.
pub fn compile_animation(
    style: &AnimationStyle,
    clip: usize,
    window: &EnableWindow,
    duration: f64,
) -> FilterFragment {
    let kind = FragmentKind::Animation {
        clip,
        style: style.as_tag(),
    };
    let image = StreamLabel::image(clip);
    let period = fmt_secs(duration);
    let gate = style.is_window_gated().then_some(window);

    match style {
        AnimationStyle::Slide => FilterFragment::new(kind).chain(overlay(
            image,
            &format!("'{CENTER_X}+(W/4)*sin(PI*t/{period})'"),
            CENTER_Y,
            gate,
        )),
        AnimationStyle::Bounce => FilterFragment::new(kind).chain(overlay(
            image,
            &format!("'{CENTER_X}+(W/4)*sin(2*PI*t/{period})'"),
            &format!("'{CENTER_Y}+(H/4)*abs(sin(2*PI*t/{period}))'"),
            gate,
        )),
        AnimationStyle::Rotate => {
            let rotated = StreamLabel::image_stage(clip, "rotated");
            FilterFragment::new(kind)
                .chain(
                    FilterChain::new()
                        .input(image)
                        .filter(format!("rotate='{ROTATE_ANGLE_EXPR}':c=none"))
                        .output(rotated.clone()),
                )
                .chain(overlay(
                    rotated,
                    &format!("'{CENTER_X}'"),
                    &format!("'{CENTER_Y}'"),
                    gate,
                ))
        }
        AnimationStyle::Fade => {
            let faded = StreamLabel::image_stage(clip, "faded");
            let looped = StreamLabel::image_stage(clip, "looped");
            FilterFragment::new(kind)
                .chain(
                    FilterChain::new()
                        .input(image)
                        .filter("format=rgba")
                        .filter(format!("fade=in:st={}:d={}:alpha=1", FADE_IN.0, FADE_IN.1))
                        .filter(format!("fade=out:st={}:d={}:alpha=0", FADE_OUT.0, FADE_OUT.1))
                        .output(faded.clone()),
                )
                .chain(
                    FilterChain::new()
                        .input(faded)
                        .filter(format!("loop=loop=-1:size={FADE_LOOP_FRAMES}:start=0"))
                        .output(looped.clone()),
                )
                .chain(overlay(looped, CENTER_X, CENTER_Y, gate))
        }
        AnimationStyle::Zoom => {
            let zoomed = StreamLabel::image_stage(clip, "zoomed");
            let ramp = fmt_secs(duration / 3.0);
            FilterFragment::new(kind)
                .chain(
                    FilterChain::new()
                        .input(image)
                        .filter(format!(
                            "scale='min(iw*{ZOOM_CAP},iw*{ZOOM_BASE}+(iw*{ZOOM_GROWTH}*t/{ramp}))':-1:eval=frame"
                        ))
                        .output(zoomed.clone()),
                )
                .chain(overlay(
                    zoomed,
                    &format!("'{CENTER_X}'"),
                    &format!("'{CENTER_Y}'"),
                    gate,
                ))
        }
        AnimationStyle::Unrecognized(_) => {
            // No-op: drain the scaled image so the graph has no dangling label;
            // the background passes through untouched.
            FilterFragment::new(kind).chain(FilterChain::new().input(image).filter("nullsink"))
        }
    }
}

/// `[background][top]overlay=x=..:y=..[:enable=..][background]`
fn overlay(top: StreamLabel, x: &str, y: &str, window: Option<&EnableWindow>) -> FilterChain {
    let mut filter = format!("overlay=x={x}:y={y}");
    if let Some(window) = window {
        filter.push_str(&format!(":enable='{}'", window.to_enable_expr()));
    }
    FilterChain::new()
        .input(StreamLabel::background())
        .input(top)
        .filter(filter)
        .output(StreamLabel::background())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphBuilder, BACKGROUND};

    const D: f64 = 30.0;

    fn all_styles() -> Vec<AnimationStyle> {
        let mut styles = AnimationStyle::KNOWN.to_vec();
        styles.push(AnimationStyle::Unrecognized("wobble".to_string()));
        styles
    }

    fn first_window() -> EnableWindow {
        EnableWindow::new(0.0, 15.0)
    }

    #[test]
    fn test_slide_expression() {
        let fragment = compile_animation(&AnimationStyle::Slide, 0, &first_window(), D);
        assert_eq!(
            fragment.statements(),
            vec![
                "[background][image-0]overlay=x='(W-w)/2+(W/4)*sin(PI*t/30)':y=(H-h)/2:\
                 enable='gte(t,0)*lt(t,15)'[background]"
                    .to_string()
            ]
        );
    }

    #[test]
    fn test_bounce_uses_abs_sine_vertically() {
        let fragment = compile_animation(&AnimationStyle::Bounce, 1, &EnableWindow::new(15.0, 30.0), D);
        let text = fragment.statements().join(";");
        assert!(text.starts_with("[background][image-1]overlay="));
        assert!(text.contains("x='(W-w)/2+(W/4)*sin(2*PI*t/30)'"));
        assert!(text.contains("y='(H-h)/2+(H/4)*abs(sin(2*PI*t/30))'"));
        assert!(text.contains("enable='gte(t,15)*lt(t,30)'"));
    }

    #[test]
    fn test_rotate_is_not_window_gated() {
        let fragment = compile_animation(&AnimationStyle::Rotate, 0, &first_window(), D);
        assert_eq!(
            fragment.statements(),
            vec![
                "[image-0]rotate='4*PI*t/60':c=none[image-0-rotated]".to_string(),
                "[background][image-0-rotated]overlay=x='(W-w)/2':y='(H-h)/2'[background]"
                    .to_string(),
            ]
        );
    }

    #[test]
    fn test_fade_loops_and_overlays() {
        let fragment = compile_animation(&AnimationStyle::Fade, 0, &first_window(), D);
        assert_eq!(
            fragment.statements(),
            vec![
                "[image-0]format=rgba,fade=in:st=0:d=1:alpha=1,fade=out:st=4:d=3:alpha=0[image-0-faded]"
                    .to_string(),
                "[image-0-faded]loop=loop=-1:size=70:start=0[image-0-looped]".to_string(),
                "[background][image-0-looped]overlay=x=(W-w)/2:y=(H-h)/2[background]".to_string(),
            ]
        );
    }

    #[test]
    fn test_zoom_ramp_is_a_third_of_duration() {
        let fragment = compile_animation(&AnimationStyle::Zoom, 1, &EnableWindow::new(15.0, 30.0), D);
        let statements = fragment.statements();
        assert_eq!(
            statements[0],
            "[image-1]scale='min(iw*1.5,iw*0.1+(iw*1.4*t/10))':-1:eval=frame[image-1-zoomed]"
        );
        assert!(statements[1].ends_with(":enable='gte(t,15)*lt(t,30)'[background]"));
    }

    #[test]
    fn test_unrecognized_is_noop() {
        let fragment = compile_animation(
            &AnimationStyle::Unrecognized("wobble".into()),
            0,
            &first_window(),
            D,
        );
        assert_eq!(fragment.statements(), vec!["[image-0]nullsink".to_string()]);
        assert!(fragment.outputs().is_empty());
    }

    #[test]
    fn test_every_style_reads_and_writes_background() {
        for style in AnimationStyle::KNOWN {
            let fragment = compile_animation(style, 0, &first_window(), D);
            let inputs = fragment.inputs();
            assert!(inputs.contains(&StreamLabel::image(0)), "{style}");
            assert!(inputs.contains(&StreamLabel::background()), "{style}");
            assert_eq!(fragment.outputs(), vec![StreamLabel::background()], "{style}");
        }
    }

    #[test]
    fn test_enable_window_follows_style() {
        for style in AnimationStyle::KNOWN {
            let fragment = compile_animation(style, 1, &EnableWindow::new(15.0, 30.0), D);
            let gated = fragment
                .statements()
                .iter()
                .any(|s| s.contains(":enable='gte(t,15)*lt(t,30)'"));
            assert_eq!(gated, style.is_window_gated(), "{style}");
        }
    }

    #[test]
    fn test_any_two_styles_compose() {
        for first in all_styles() {
            for second in all_styles() {
                let mut builder = GraphBuilder::new();
                for fragment in [
                    FilterFragment::new(FragmentKind::BackgroundScale).chain(
                        FilterChain::new()
                            .input(StreamLabel::input_video(0))
                            .filter("scale=640:360")
                            .output(StreamLabel::background()),
                    ),
                    scale(0),
                    compile_animation(&first, 0, &first_window(), D),
                    scale(1),
                    compile_animation(&second, 1, &EnableWindow::new(15.0, 30.0), D),
                ] {
                    builder.push(fragment).unwrap();
                }
                let graph = builder.finish(StreamLabel::new(BACKGROUND));
                assert!(graph.is_ok(), "{first} then {second}: {graph:?}");
            }
        }
    }

    #[test]
    fn test_compilation_is_deterministic() {
        for style in all_styles() {
            let a = compile_animation(&style, 1, &EnableWindow::new(15.0, 30.0), D);
            let b = compile_animation(&style, 1, &EnableWindow::new(15.0, 30.0), D);
            assert_eq!(a.statements().join(";"), b.statements().join(";"));
        }
    }

    #[test]
    fn test_intermediate_labels_are_per_clip() {
        let a = compile_animation(&AnimationStyle::Rotate, 0, &first_window(), D);
        let b = compile_animation(&AnimationStyle::Rotate, 1, &first_window(), D);
        assert!(a.statements()[0].contains("[image-0-rotated]"));
        assert!(b.statements()[0].contains("[image-1-rotated]"));
    }

    fn scale(i: usize) -> FilterFragment {
        FilterFragment::new(FragmentKind::ImageScale { clip: i }).chain(
            FilterChain::new()
                .input(StreamLabel::input_video(i + 1))
                .filter("scale=320:180")
                .output(StreamLabel::image(i)),
        )
    }
}
