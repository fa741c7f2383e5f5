use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DateError {
    #[error("unrecognized date '{0}'")]
    Unrecognized(String),

    #[error("date '{date}' does not exist in timezone {timezone}")]
    NonexistentLocalTime { date: String, timezone: String },
}

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parses a front matter date.
///
/// Dates with an explicit offset keep it. Dates and datetimes without one are
/// taken to be in `timezone`; a bare date means midnight.
pub fn parse_date(date: &str, timezone: Tz) -> Result<DateTime<FixedOffset>, DateError> {
    let date = date.trim();

    if let Ok(datetime) = DateTime::parse_from_rfc3339(date) {
        return Ok(datetime);
    }

    let naive = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(date, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .ok()
                .and_then(|day| day.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| DateError::Unrecognized(date.to_string()))?;

    let local = timezone
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| DateError::NonexistentLocalTime {
            date: date.to_string(),
            timezone: timezone.name().to_string(),
        })?;

    Ok(local.fixed_offset())
}

/// Formats a date as RFC 3339 in UTC, as used by sitemaps.
pub fn to_w3c(date: &DateTime<FixedOffset>) -> String {
    date.with_timezone(&Utc).to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

/// Formats a date as RFC 2822, as used by RSS.
pub fn to_rfc2822(date: &DateTime<FixedOffset>) -> String {
    date.to_rfc2822()
}

pub fn format_date(date: &DateTime<FixedOffset>, format: &str, timezone: Tz) -> String {
    date.with_timezone(&timezone).format(format).to_string()
}
