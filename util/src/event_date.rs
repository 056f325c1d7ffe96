//! The event's calendar day.
//!
//! Check-in, search status, stats, reports and reset all scope attendance to
//! the same day: the date of "now" as seen from a fixed UTC offset configured
//! through `EVENT_UTC_OFFSET_MINUTES`.

use crate::config::AppConfig;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

/// Calendar date of `now` at the given UTC offset (minutes east of UTC).
///
/// Offsets outside ±24h fall back to UTC; `AppConfig` already rejects them.
pub fn event_date_at(now: DateTime<Utc>, offset_minutes: i32) -> NaiveDate {
    match FixedOffset::east_opt(offset_minutes * 60) {
        Some(offset) => now.with_timezone(&offset).date_naive(),
        None => {
            tracing::warn!(offset_minutes, "event offset out of range; using UTC");
            now.date_naive()
        }
    }
}

/// Today's event date for the configured offset.
pub fn today(config: &AppConfig) -> NaiveDate {
    event_date_at(Utc::now(), config.event_utc_offset_minutes)
}
