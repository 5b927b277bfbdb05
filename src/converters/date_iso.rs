use super::AttributeConverter;
use crate::utils::date::{parse_iso, short_date};
use chrono::{DateTime, SecondsFormat, Utc};
use tracing::warn;

/// Converts between ISO 8601 attribute values and dates.
///
/// With `short`, dates are written as `YYYY-MM-DD` (as in `datetime` attributes),
/// otherwise as full UTC timestamps with milliseconds, e.g. `2023-01-01T00:00:00.000Z`.
/// Missing, empty and invalid attribute values read as `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateIsoConverter {
	pub short: bool,
}
impl DateIsoConverter {
	#[must_use]
	pub const fn new(short: bool) -> Self {
		Self { short }
	}
}

impl AttributeConverter<Option<DateTime<Utc>>> for DateIsoConverter {
	fn from_attribute(&self, value: Option<&str>) -> Option<DateTime<Utc>> {
		let value = value.filter(|value| !value.is_empty())?;
		let date = parse_iso(value);
		if date.is_none() {
			warn!("Ignoring invalid date attribute {:?}.", crate::redact(value));
		}
		date
	}

	fn to_attribute(&self, value: &Option<DateTime<Utc>>) -> Option<String> {
		let value = value.as_ref()?;
		Some(if self.short {
			short_date(value)
		} else {
			value.to_rfc3339_opts(SecondsFormat::Millis, true)
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::TimeZone;

	fn new_year() -> DateTime<Utc> {
		Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap()
	}

	#[test]
	fn writes_iso_strings() {
		assert_eq!(DateIsoConverter::default().to_attribute(&Some(new_year())).as_deref(), Some("2023-01-01T00:00:00.000Z"));
	}

	#[test]
	fn writes_short_iso_strings_when_short() {
		assert_eq!(DateIsoConverter::new(true).to_attribute(&Some(new_year())).as_deref(), Some("2023-01-01"));
	}

	#[test]
	fn missing_dates_remove_the_attribute() {
		assert_eq!(DateIsoConverter::default().to_attribute(&None), None);
	}

	#[test]
	fn reads_iso_strings() {
		let converter = DateIsoConverter::default();
		let date = converter.from_attribute(Some("2023-01-01T00:00:00.000Z"));
		assert_eq!(date, Some(new_year()));
		assert_eq!(converter.to_attribute(&date).as_deref(), Some("2023-01-01T00:00:00.000Z"));
	}

	#[test]
	fn reads_short_iso_strings() {
		assert_eq!(DateIsoConverter::new(true).from_attribute(Some("2023-01-01")), Some(new_year()));
	}

	#[test]
	fn empty_and_invalid_values_are_none() {
		let converter = DateIsoConverter::default();
		assert_eq!(converter.from_attribute(Some("")), None);
		assert_eq!(converter.from_attribute(None), None);
		assert_eq!(converter.from_attribute(Some("yesterday")), None);
	}
}
