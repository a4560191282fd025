//! Calendar helpers: football season years and the reference timezone.

use chrono::{DateTime, Datelike, NaiveDate};
use chrono_tz::Tz;

use crate::error::ConfigError;

/// Year in which the season containing `date` started.
///
/// API-Football keys English seasons by their start year, and the
/// July-to-June split puts pre-season friendlies in the new season:
/// 2025-07-01 → 2025, 2025-06-30 → 2024, 2026-01-15 → 2025.
pub fn season_start_year(date: NaiveDate) -> i32 {
    if date.month() >= 7 {
        date.year()
    } else {
        date.year() - 1
    }
}

/// Calendar date and season for an instant already expressed in the
/// reference timezone.
pub fn today_and_season(now: &DateTime<Tz>) -> (NaiveDate, i32) {
    let today = now.date_naive();
    (today, season_start_year(today))
}

pub fn parse_timezone(name: &str) -> Result<Tz, ConfigError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|e| ConfigError::Invalid {
            field: "SCORES_TIMEZONE",
            reason: e.to_string(),
        })
}
