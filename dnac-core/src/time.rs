//! Display helpers for controller timestamps
//!
//! The controller reports times as millisecond epochs. Conversion is for
//! presentation only.

use chrono::DateTime;

/// Render a millisecond epoch as `YYYY-MM-DD HH:MM:SS UTC`.
///
/// Values outside chrono's range fall back to the raw number.
pub fn format_epoch_millis(millis: i64) -> String {
    match DateTime::from_timestamp_millis(millis) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => millis.to_string(),
    }
}

/// Like [`format_epoch_millis`], with `N/A` for missing values
pub fn format_optional_millis(millis: Option<i64>) -> String {
    millis
        .map(format_epoch_millis)
        .unwrap_or_else(|| "N/A".to_string())
}
