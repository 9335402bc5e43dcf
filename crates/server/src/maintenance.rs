//! Maintenance window suppression.

use crate::entity::maintenance_window;
use time::OffsetDateTime;

/// True when `now` falls inside any of the monitor's maintenance windows.
///
/// Pure and side-effect free; windows must be pre-loaded. Bounds are
/// inclusive on both ends, and all stored timestamps are timezone-aware so
/// the comparison is between absolute instants.
pub fn is_suppressed(windows: &[maintenance_window::Model], now: OffsetDateTime) -> bool {
    windows
        .iter()
        .any(|window| window.start_time <= now && now <= window.end_time)
}
