//! Elapsed-time helpers.
//!
//! The session stores plain millisecond timestamps so the machine stays pure
//! and testable; `now_ms` is the convenience source for callers timing
//! against the wall clock.

use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch.
#[must_use]
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

/// Format the span between two millisecond timestamps for display.
///
/// The most significant non-zero unit sets the width:
/// - hours: `H:MM:SS` (hours unpadded),
/// - minutes: `MM:SS`,
/// - otherwise: `0:SS`.
///
/// `end_ms` earlier than `start_ms` saturates to `0:00`.
#[must_use]
pub fn format_duration(start_ms: u64, end_ms: u64) -> String {
    let total_seconds = end_ms.saturating_sub(start_ms) / 1000;

    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{:02}:{:02}", minutes, seconds)
    } else {
        format!("0:{:02}", seconds)
    }
}
