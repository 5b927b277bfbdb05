//! Attribute converters: marshalling between property values and attribute strings.
//!
//! A missing attribute is passed as `None`. Returning `None` from [`AttributeConverter::to_attribute`] removes the attribute.

pub mod date_iso;
pub mod list;
pub mod stringified_boolean;

pub use date_iso::DateIsoConverter;
pub use list::{ListConverter, ListItem};
pub use stringified_boolean::StringifiedBooleanConverter;

pub trait AttributeConverter<T> {
	fn from_attribute(&self, value: Option<&str>) -> T;
	fn to_attribute(&self, value: &T) -> Option<String>;
}
