use super::AttributeConverter;

/// Maps `bool` to two fixed strings, as needed for e.g. [`aria-expanded`](https://developer.mozilla.org/en-US/docs/Web/Accessibility/ARIA/Attributes/aria-expanded#values),
/// which can't be a plain boolean attribute.
///
/// Any attribute value other than `true_value` reads as `false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringifiedBooleanConverter {
	pub true_value: String,
	pub false_value: String,
}
impl Default for StringifiedBooleanConverter {
	fn default() -> Self {
		Self::new("true", "false")
	}
}
impl StringifiedBooleanConverter {
	#[must_use]
	pub fn new(true_value: &str, false_value: &str) -> Self {
		Self {
			true_value: true_value.to_owned(),
			false_value: false_value.to_owned(),
		}
	}
}

impl AttributeConverter<bool> for StringifiedBooleanConverter {
	fn from_attribute(&self, value: Option<&str>) -> bool {
		value == Some(self.true_value.as_str())
	}

	fn to_attribute(&self, value: &bool) -> Option<String> {
		Some((if *value { &self.true_value } else { &self.false_value }).clone())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_boolean_values() {
		let converter = StringifiedBooleanConverter::default();
		assert!(converter.from_attribute(Some("true")));
		assert!(!converter.from_attribute(Some("false")));
		assert!(!converter.from_attribute(None));
		assert_eq!(converter.to_attribute(&false).as_deref(), Some("false"));
	}

	#[test]
	fn parses_custom_boolean_values() {
		let converter = StringifiedBooleanConverter::new("ja", "nein");
		assert!(converter.from_attribute(Some("ja")));
		assert!(!converter.from_attribute(Some("nein")));
		assert!(!converter.from_attribute(Some("true")));
		assert_eq!(converter.to_attribute(&true).as_deref(), Some("ja"));
	}
}
