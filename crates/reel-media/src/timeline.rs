//! Timeline planner: splits the reel into one enable window per clip.

use reel_models::EnableWindow;

use crate::error::{MediaError, MediaResult};

/// Partition `[0, duration)` into `clip_count` contiguous windows.
///
/// Window `i` is `[i * duration / n, (i + 1) * duration / n)`; the last window
/// ends at exactly `duration`.
pub fn plan_windows(duration: f64, clip_count: usize) -> MediaResult<Vec<EnableWindow>> {
    if clip_count == 0 {
        return Err(MediaError::invalid_timeline("clip count must be at least 1"));
    }
    if !duration.is_finite() || duration <= 0.0 {
        return Err(MediaError::invalid_timeline(format!(
            "duration must be positive, got {duration}"
        )));
    }

    let n = clip_count as f64;
    let windows = (0..clip_count)
        .map(|i| {
            let start = i as f64 * duration / n;
            let end = if i + 1 == clip_count {
                duration
            } else {
                (i + 1) as f64 * duration / n
            };
            EnableWindow::new(start, end)
        })
        .collect();

    Ok(windows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_partition(windows: &[EnableWindow], duration: f64) {
        assert_eq!(windows.first().map(|w| w.start), Some(0.0));
        assert_eq!(windows.last().map(|w| w.end), Some(duration));
        for pair in windows.windows(2) {
            assert_eq!(pair[0].end, pair[1].start, "windows must be contiguous");
        }
        for w in windows {
            assert!(w.start < w.end);
        }
    }

    #[test]
    fn test_single_clip_covers_everything() {
        let windows = plan_windows(30.0, 1).unwrap();
        assert_eq!(windows, vec![EnableWindow::new(0.0, 30.0)]);
    }

    #[test]
    fn test_two_clips_split_in_half() {
        let windows = plan_windows(30.0, 2).unwrap();
        assert_eq!(
            windows,
            vec![EnableWindow::new(0.0, 15.0), EnableWindow::new(15.0, 30.0)]
        );
    }

    #[test]
    fn test_partition_holds_for_awkward_durations() {
        for duration in [30.0, 10.0, 7.0, 1.0 / 3.0, 29.97] {
            for n in 1..=5 {
                let windows = plan_windows(duration, n).unwrap();
                assert_eq!(windows.len(), n);
                assert_partition(&windows, duration);
            }
        }
    }

    #[test]
    fn test_every_instant_has_exactly_one_window() {
        let windows = plan_windows(30.0, 2).unwrap();
        for step in 0..300 {
            let t = step as f64 * 0.1;
            let hits = windows.iter().filter(|w| w.contains(t)).count();
            assert_eq!(hits, 1, "t={t}");
        }
    }

    #[test]
    fn test_zero_clips_rejected() {
        assert!(matches!(plan_windows(30.0, 0), Err(MediaError::InvalidTimeline(_))));
    }

    #[test]
    fn test_non_positive_duration_rejected() {
        assert!(plan_windows(0.0, 1).is_err());
        assert!(plan_windows(-5.0, 2).is_err());
        assert!(plan_windows(f64::INFINITY, 2).is_err());
    }
}
