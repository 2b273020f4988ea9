//! Render progress reported by FFmpeg's `-progress` stream.

use serde::Serialize;

/// Snapshot of one `progress=` block.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FfmpegProgress {
    pub frame: u64,
    pub fps: f64,
    /// Output time in milliseconds
    pub out_time_ms: i64,
    /// Output time as HH:MM:SS.micro
    pub out_time: String,
    /// Encoding speed as a multiple of realtime
    pub speed: f64,
    /// Set once FFmpeg reports `progress=end`
    pub is_complete: bool,
}

impl FfmpegProgress {
    /// Percentage of `total_ms` encoded so far, clamped to 100.
    pub fn percentage(&self, total_ms: i64) -> f64 {
        if self.is_complete {
            return 100.0;
        }
        if total_ms <= 0 {
            return 0.0;
        }
        ((self.out_time_ms as f64 / total_ms as f64) * 100.0).clamp(0.0, 100.0)
    }

    /// Seconds left at the current speed.
    pub fn eta_seconds(&self, total_ms: i64) -> Option<f64> {
        if self.speed <= 0.0 || self.out_time_ms <= 0 {
            return None;
        }
        let remaining_ms = (total_ms - self.out_time_ms).max(0);
        Some(remaining_ms as f64 / 1000.0 / self.speed)
    }
}
