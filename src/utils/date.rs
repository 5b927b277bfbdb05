//! Date helpers for `datetime` attributes and calendars.

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use tracing::warn;

const SHORT_DATE: &str = "%Y-%m-%d";

/// Formats `date` as `YYYY-MM-DD`, as used in `datetime` attributes, in `date`'s own time zone.
///
/// ```
/// use chrono::{FixedOffset, TimeZone};
/// use web_component_utils::utils::date::short_date;
///
/// let date = FixedOffset::east_opt(2 * 3600).unwrap().with_ymd_and_hms(2025, 7, 12, 0, 30, 0).unwrap();
/// assert_eq!(short_date(&date), "2025-07-12");
/// ```
#[must_use]
pub fn short_date<Tz: TimeZone>(date: &DateTime<Tz>) -> String {
	date.date_naive().format(SHORT_DATE).to_string()
}

/// Formats the calendar date `date` falls on in `zone`.
#[must_use]
pub fn short_date_in<Tz: TimeZone>(date: &DateTime<Utc>, zone: &Tz) -> String {
	short_date(&date.with_timezone(zone))
}

/// Today's date in the local time zone.
#[must_use]
pub fn today() -> String {
	short_date(&Local::now())
}

/// Normalizes an ISO 8601 date or date-time to `YYYY-MM-DD`.
///
/// Date-times keep the calendar date of their own offset. Returns `None` for invalid input.
#[must_use]
pub fn short_date_from_str(value: &str) -> Option<String> {
	let value = value.trim();
	if let Ok(date) = DateTime::parse_from_rfc3339(value) {
		return Some(short_date(&date));
	}
	if let Ok(date) = NaiveDate::parse_from_str(value, SHORT_DATE) {
		return Some(date.format(SHORT_DATE).to_string());
	}
	if let Some(date_time) = parse_naive_date_time(value) {
		return Some(date_time.date().format(SHORT_DATE).to_string());
	}
	warn!("Not an ISO date: {:?}", crate::redact(value));
	None
}

/// Parses an ISO 8601 date or date-time the way browsers do:
/// date-only forms are UTC, date-times without offset are local time.
#[must_use]
pub fn parse_iso(value: &str) -> Option<DateTime<Utc>> {
	let value = value.trim();
	if let Ok(date) = DateTime::parse_from_rfc3339(value) {
		return Some(date.with_timezone(&Utc));
	}
	if let Ok(date) = NaiveDate::parse_from_str(value, SHORT_DATE) {
		return date.and_hms_opt(0, 0, 0).map(|midnight| Utc.from_utc_datetime(&midnight));
	}
	parse_naive_date_time(value)
		.and_then(|date_time| Local.from_local_datetime(&date_time).earliest())
		.map(|date_time| date_time.with_timezone(&Utc))
}

fn parse_naive_date_time(value: &str) -> Option<NaiveDateTime> {
	["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
		.iter()
		.find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

/// The ISO 8601 week number of `date`. Weeks start on Monday and week 1 contains the year's first Thursday.
#[must_use]
pub fn week_number<D: Datelike>(date: &D) -> u32 {
	date.iso_week().week()
}
