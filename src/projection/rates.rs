//! Rate conversion and horizon resolution

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::{ProjectionError, Result};

/// Length of a projection month in days.
///
/// Horizons are measured in 30-day blocks, not calendar months; reminder
/// text and dashboards depend on these exact counts.
pub const DAYS_PER_MONTH: i64 = 30;

const MILLIS_PER_MONTH: f64 = (DAYS_PER_MONTH * 24 * 60 * 60 * 1000) as f64;

/// Convert a nominal annual percentage to a monthly decimal rate (no compounding conversion)
pub fn monthly_rate(annual_return_pct: f64) -> f64 {
    annual_return_pct / 100.0 / 12.0
}

/// Whole months between `now` and `target_date`, rounded up, never negative
pub fn months_remaining(target_date: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    let millis = (target_date - now).num_milliseconds() as f64;
    let months = (millis / MILLIS_PER_MONTH).ceil();
    if months <= 0.0 {
        0
    } else {
        // chrono's representable range keeps this well inside u32
        months as u32
    }
}

/// Parse a target date from an RFC 3339 timestamp, a naive timestamp (UTC) or a plain date
pub fn parse_target_date(input: &str) -> Result<DateTime<Utc>> {
    let trimmed = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| {
            ProjectionError::InvalidHorizon(format!("unparseable target date '{}'", input))
        })
}
