//! Time utilities for temporal heuristics

use chrono::Duration;

/// Render a non-negative duration as a compact `XmYs` / `XhYm` string
///
/// # Examples
/// ```
/// use chrono::Duration;
/// use chain_trace::utils::time::format_gap;
///
/// assert_eq!(format_gap(Duration::seconds(330)), "5m 30s");
/// assert_eq!(format_gap(Duration::minutes(125)), "2h 5m");
/// assert_eq!(format_gap(Duration::seconds(42)), "42s");
/// ```
pub fn format_gap(gap: Duration) -> String {
    let secs = gap.num_seconds().max(0);
    let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}
