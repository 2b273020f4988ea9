//! Enable windows on the reel timeline.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Half-open interval `[start, end)` in seconds during which a clip is shown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EnableWindow {
    pub start: f64,
    pub end: f64,
}

impl EnableWindow {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, t: f64) -> bool {
        t >= self.start && t < self.end
    }

    /// FFmpeg `enable` expression for this window.
    ///
    /// `between()` is closed on both ends, so the half-open bound is spelled out.
    pub fn to_enable_expr(&self) -> String {
        format!("gte(t,{})*lt(t,{})", fmt_secs(self.start), fmt_secs(self.end))
    }
}

/// Format seconds for filter expressions: integral values print without a
/// fractional part, others with millisecond precision.
pub fn fmt_secs(secs: f64) -> String {
    if secs.fract() == 0.0 {
        format!("{}", secs as i64)
    } else {
        let s = format!("{:.3}", secs);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
