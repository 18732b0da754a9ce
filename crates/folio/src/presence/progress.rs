//! Playback position helpers for listening activities.

use super::TimeRange;

/// Percentage of `[start, end]` elapsed at `now`, clamped to 0..=100.
///
/// An empty or inverted range reports 0.
pub fn progress_percent(start: i64, end: i64, now: i64) -> f64 {
    let total = end.saturating_sub(start);
    if total <= 0 {
        return 0.0;
    }
    let pct = now.saturating_sub(start) as f64 / total as f64 * 100.0;
    pct.clamp(0.0, 100.0)
}

/// `m:ss` with seconds zero-padded. Negative input renders as `0:00`.
pub fn format_clock(ms: i64) -> String {
    let total_secs = ms.max(0) / 1000;
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

/// Elapsed/total pair for a bounded range, e.g. `("1:30", "3:00")`.
#[derive(Debug, Clone, PartialEq)]
pub struct Playback {
    pub percent: f64,
    pub elapsed: String,
    pub duration: String,
}

impl Playback {
    /// `None` when the range has no end.
    pub fn at(range: &TimeRange, now: i64) -> Option<Self> {
        let end = range.end?;
        let duration = end.saturating_sub(range.start).max(0);
        let elapsed = now.saturating_sub(range.start).clamp(0, duration);
        Some(Self {
            percent: progress_percent(range.start, end, now),
            elapsed: format_clock(elapsed),
            duration: format_clock(duration),
        })
    }
}
