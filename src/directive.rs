//! The lifecycle protocol between a rendering host and the [directives](`crate::directives`).
//!
//! A host creates one directive instance per binding position ([`Part`]), calls [`Directive::update`] on each render
//! and notifies it when the surrounding template is removed from or re-inserted into the document.
//! [`Binding`] implements the host side of that bookkeeping, so that disconnection and reconnection
//! are only ever reported as transitions.

use crate::{Error, Result};
use core::fmt::{self, Debug, Formatter};
use tracing::trace;

/// The kind of template position a directive is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartType {
	/// `attr="${…}"`
	Attribute,
	/// Child content.
	Child,
	/// `.prop=${…}`
	Property,
	/// `?attr=${…}`
	BooleanAttribute,
	/// `@event=${…}`
	Event,
	/// `<div ${…}>`, bound to the element itself.
	Element,
}

/// A binding position.
///
/// For child parts, `element` is the parent element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part<E> {
	pub part_type: PartType,
	pub element: E,
	/// The attribute, property or event name, if any.
	pub name: Option<String>,
}
impl<E> Part<E> {
	#[must_use]
	pub fn element(element: E) -> Self {
		Self {
			part_type: PartType::Element,
			element,
			name: None,
		}
	}

	#[must_use]
	pub fn child(parent: E) -> Self {
		Self {
			part_type: PartType::Child,
			element: parent,
			name: None,
		}
	}

	#[must_use]
	pub fn attribute(element: E, name: &str) -> Self {
		Self::named(PartType::Attribute, element, name)
	}

	#[must_use]
	pub fn boolean_attribute(element: E, name: &str) -> Self {
		Self::named(PartType::BooleanAttribute, element, name)
	}

	#[must_use]
	pub fn property(element: E, name: &str) -> Self {
		Self::named(PartType::Property, element, name)
	}

	#[must_use]
	pub fn event(element: E, name: &str) -> Self {
		Self::named(PartType::Event, element, name)
	}

	fn named(part_type: PartType, element: E, name: &str) -> Self {
		Self {
			part_type,
			element,
			name: Some(name.to_owned()),
		}
	}

	/// Fails with [`Error::InvalidPart`] unless this part's type is one of `allowed`.
	pub fn expect_type(&self, directive: &'static str, allowed: &[PartType], usage: &'static str) -> Result<()> {
		if allowed.contains(&self.part_type) {
			Ok(())
		} else {
			Err(Error::InvalidPart {
				directive,
				part_type: self.part_type,
				usage,
			})
		}
	}
}

/// What a directive hands back to the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rendered<T> {
	/// Render nothing; the directive only has side effects.
	Nothing,
	/// Keep whatever was rendered before.
	NoChange,
	Value(T),
}
impl<T> Rendered<T> {
	#[must_use]
	pub fn value(self) -> Option<T> {
		match self {
			Self::Value(value) => Some(value),
			Self::Nothing | Self::NoChange => None,
		}
	}
}

pub trait Directive {
	type Element;
	type Params;
	type Output;

	/// Called on each render with the current parameters.
	///
	/// `connected` tells whether the bound element is currently part of the document.
	fn update(&mut self, part: &Part<Self::Element>, params: Self::Params, connected: bool) -> Rendered<Self::Output>;

	/// The binding was removed from the document. Undo side effects that must not outlive it.
	fn disconnected(&mut self) {}

	/// The binding was re-inserted without an intervening render.
	fn reconnected(&mut self) {}
}

/// Drives a [`Directive`] bound to a single [`Part`].
pub struct Binding<Dir: Directive> {
	part: Part<Dir::Element>,
	directive: Option<Dir>,
	connected: bool,
}
impl<Dir> Debug for Binding<Dir>
where
	Dir: Directive + Debug,
	Dir::Element: Debug,
{
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Binding")
			.field("part", &self.part)
			.field("directive", &self.directive)
			.field("connected", &self.connected)
			.finish()
	}
}
impl<Dir: Directive> Binding<Dir> {
	/// Binds `directive` to `part`, which is assumed to be connected.
	pub fn new(part: Part<Dir::Element>, directive: Dir) -> Self {
		Self {
			part,
			directive: Some(directive),
			connected: true,
		}
	}

	/// Renders with `params`. A cleared binding renders [`Rendered::Nothing`].
	pub fn render(&mut self, params: Dir::Params) -> Rendered<Dir::Output> {
		match &mut self.directive {
			Some(directive) => directive.update(&self.part, params, self.connected),
			None => Rendered::Nothing,
		}
	}

	pub fn set_connected(&mut self, connected: bool) {
		if connected == self.connected {
			return;
		}
		self.connected = connected;
		if let Some(directive) = &mut self.directive {
			if connected {
				trace!("Reconnecting directive.");
				directive.reconnected();
			} else {
				trace!("Disconnecting directive.");
				directive.disconnected();
			}
		}
	}

	#[must_use]
	pub fn is_connected(&self) -> bool {
		self.connected
	}

	/// Unbinds the directive, disconnecting it first if necessary.
	pub fn clear(&mut self) {
		if let Some(mut directive) = self.directive.take() {
			if self.connected {
				directive.disconnected();
			}
		}
	}

	#[must_use]
	pub fn is_cleared(&self) -> bool {
		self.directive.is_none()
	}

	#[must_use]
	pub fn part(&self) -> &Part<Dir::Element> {
		&self.part
	}

	#[must_use]
	pub fn directive(&self) -> Option<&Dir> {
		self.directive.as_ref()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[derive(Default)]
	struct Recorder(Vec<String>);
	impl Directive for Recorder {
		type Element = ();
		type Params = u8;
		type Output = u8;

		fn update(&mut self, _part: &Part<()>, params: u8, connected: bool) -> Rendered<u8> {
			self.0.push(format!("update {} {}", params, connected));
			Rendered::Value(params)
		}

		fn disconnected(&mut self) {
			self.0.push("disconnected".to_owned());
		}

		fn reconnected(&mut self) {
			self.0.push("reconnected".to_owned());
		}
	}

	fn log(binding: &Binding<Recorder>) -> Vec<String> {
		binding.directive().map(|recorder| recorder.0.clone()).unwrap_or_default()
	}

	#[test]
	fn connection_changes_are_reported_once() {
		let mut binding = Binding::new(Part::element(()), Recorder::default());
		binding.set_connected(true);
		assert_eq!(binding.render(1), Rendered::Value(1));
		binding.set_connected(false);
		binding.set_connected(false);
		binding.render(2);
		binding.set_connected(true);

		assert_eq!(log(&binding), ["update 1 true", "disconnected", "update 2 false", "reconnected"]);
	}

	#[test]
	fn cleared_bindings_render_nothing() {
		let mut binding = Binding::new(Part::element(()), Recorder::default());
		binding.clear();
		assert!(binding.is_cleared());
		assert_eq!(binding.render(1), Rendered::Nothing);
		binding.set_connected(false);
		assert!(!binding.is_connected());
	}

	#[test]
	fn expect_type_reports_the_offending_part() {
		let part = Part::attribute((), "title");
		let error = part.expect_type("demo", &[PartType::Element], "bind it to an element").unwrap_err();
		assert!(matches!(
			error,
			Error::InvalidPart {
				directive: "demo",
				part_type: PartType::Attribute,
				..
			}
		));
		assert!(Part::element(()).expect_type("demo", &[PartType::Element], "").is_ok());
	}
}
