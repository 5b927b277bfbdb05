use super::AttributeConverter;
use core::marker::PhantomData;

/// Items of a [`ListConverter`].
pub trait ListItem: Sized {
	fn parse_item(item: &str) -> Self;
	fn format_item(&self) -> String;
}

impl ListItem for String {
	fn parse_item(item: &str) -> Self {
		item.to_owned()
	}

	fn format_item(&self) -> String {
		self.clone()
	}
}

/// Numbers are coerced like JavaScript's `Number(…)`:
/// surrounding whitespace is ignored, an empty item is `0` and anything unparsable is `NaN`.
impl ListItem for f64 {
	fn parse_item(item: &str) -> Self {
		let item = item.trim();
		if item.is_empty() {
			return 0.0;
		}
		match item {
			"Infinity" | "+Infinity" => return f64::INFINITY,
			"-Infinity" => return f64::NEG_INFINITY,
			_ => (),
		}
		for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
			if let Some(digits) = item.strip_prefix(prefix) {
				#[allow(clippy::cast_precision_loss)]
				return u64::from_str_radix(digits, radix).map_or(f64::NAN, |value| value as f64);
			}
		}
		// Rust also accepts `inf` and `nan`, JavaScript doesn't.
		if item.chars().all(|c| c.is_ascii_digit() || "+-.eE".contains(c)) {
			item.parse().unwrap_or(f64::NAN)
		} else {
			f64::NAN
		}
	}

	fn format_item(&self) -> String {
		match *self {
			value if value == f64::INFINITY => "Infinity".to_owned(),
			value if value == f64::NEG_INFINITY => "-Infinity".to_owned(),
			value => value.to_string(),
		}
	}
}

/// Lists of primitive values as a single attribute, like `class`, `rel` or `accept`.
///
/// Entries are neither trimmed nor filtered: `"foo,,bar,"` has four entries.
/// Empty lists remove the attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListConverter<T> {
	separator: String,
	item: PhantomData<fn() -> T>,
}
impl<T> Default for ListConverter<T> {
	fn default() -> Self {
		Self::new(",")
	}
}
impl<T> ListConverter<T> {
	#[must_use]
	pub fn new(separator: &str) -> Self {
		Self {
			separator: separator.to_owned(),
			item: PhantomData,
		}
	}

	#[must_use]
	pub fn separator(&self) -> &str {
		&self.separator
	}
}

impl<T: ListItem> AttributeConverter<Vec<T>> for ListConverter<T> {
	fn from_attribute(&self, value: Option<&str>) -> Vec<T> {
		match value {
			None | Some("") => Vec::new(),
			Some(value) => value.split(self.separator.as_str()).map(T::parse_item).collect(),
		}
	}

	fn to_attribute(&self, value: &Vec<T>) -> Option<String> {
		if value.is_empty() {
			return None;
		}
		Some(value.iter().map(ListItem::format_item).collect::<Vec<_>>().join(&self.separator))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn strings(separator: &str, value: Option<&str>) -> Vec<String> {
		ListConverter::<String>::new(separator).from_attribute(value)
	}

	fn numbers(separator: &str, value: Option<&str>) -> Vec<f64> {
		ListConverter::<f64>::new(separator).from_attribute(value)
	}

	#[test]
	fn defaults_to_comma_separated_strings() {
		assert_eq!(ListConverter::<String>::default().from_attribute(Some("foo,23")), ["foo", "23"]);
	}

	#[test]
	fn missing_and_empty_values_are_empty_lists() {
		assert!(strings(",", None).is_empty());
		assert!(strings(",", Some("")).is_empty());
		assert!(numbers(",", Some("")).is_empty());
	}

	#[test]
	fn parses_single_and_multiple_values() {
		assert_eq!(strings(",", Some("foo")), ["foo"]);
		assert_eq!(numbers(",", Some("23")), [23.0]);
		assert_eq!(strings(",", Some("foo,bar")), ["foo", "bar"]);
		assert_eq!(numbers(",", Some("23,32,14")), [23.0, 32.0, 14.0]);
	}

	#[test]
	fn keeps_empty_values_within() {
		assert_eq!(strings(",", Some("foo,,bar,")), ["foo", "", "bar", ""]);
		assert_eq!(numbers(",", Some("23,,14,")), [23.0, 0.0, 14.0, 0.0]);
	}

	#[test]
	fn allows_custom_separators() {
		for separator in [" ", "#", "|"] {
			let joined = ["foo", "bar"].join(separator);
			assert_eq!(strings(separator, Some(&joined)), ["foo", "bar"]);
			let joined = ["23", "32", "14"].join(separator);
			assert_eq!(numbers(separator, Some(&joined)), [23.0, 32.0, 14.0]);
		}
	}

	#[test]
	fn keeps_whitespace_in_entries() {
		assert_eq!(strings(",", Some(" ")), [" "]);
		assert_eq!(strings(",", Some("foo ")), ["foo "]);
		assert_eq!(strings(",", Some(" foo ,bar ")), [" foo ", "bar "]);
	}

	#[test]
	fn coerces_numbers_like_javascript() {
		assert_eq!(numbers(",", Some(" 7 ,0x1A,-Infinity,1e3")), [7.0, 26.0, f64::NEG_INFINITY, 1000.0]);
		assert!(numbers(",", Some("abc"))[0].is_nan());
		assert!(numbers(",", Some("inf"))[0].is_nan());
	}

	#[test]
	fn empty_lists_remove_the_attribute() {
		assert_eq!(ListConverter::<String>::default().to_attribute(&vec![]), None);
		assert_eq!(ListConverter::<f64>::default().to_attribute(&vec![]), None);
	}

	#[test]
	fn a_single_empty_entry_is_an_empty_attribute() {
		assert_eq!(ListConverter::<String>::default().to_attribute(&vec![String::new()]).as_deref(), Some(""));
	}

	#[test]
	fn stringifies_lists() {
		assert_eq!(ListConverter::<String>::default().to_attribute(&vec!["foo".to_owned()]).as_deref(), Some("foo"));
		assert_eq!(ListConverter::<f64>::default().to_attribute(&vec![23.0]).as_deref(), Some("23"));
		for separator in [",", " ", "#", "|"] {
			let strings = ListConverter::<String>::new(separator).to_attribute(&vec!["foo".to_owned(), "bar".to_owned()]);
			assert_eq!(strings, Some(["foo", "bar"].join(separator)));
			let numbers = ListConverter::<f64>::new(separator).to_attribute(&vec![23.0, 32.0, 14.0]);
			assert_eq!(numbers, Some(["23", "32", "14"].join(separator)));
		}
	}
}
