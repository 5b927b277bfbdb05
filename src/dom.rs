//! The DOM surface the directives and utilities operate on.
//!
//! [`Dom`] covers exactly what the directives need: attributes, classes, event listeners and slot assignment.
//! [`FormDom`] adds the few form-association operations used by [`crate::utils::form`].
//!
//! Two implementations are provided: [`memory::MemoryDom`], a small in-memory tree usable anywhere,
//! and (on `wasm32` only) [`web::WebDom`], which forwards to [`web_sys`].

use crate::Result;
use core::fmt::Debug;
use std::rc::Rc;

pub mod memory;
#[cfg(target_arch = "wasm32")]
pub mod web;

/// The event object handed to listeners.
pub trait DomEvent: Clone {
	type Element;

	fn event_type(&self) -> String;

	/// The node the event was dispatched on, if it is an element.
	fn target(&self) -> Option<Self::Element>;

	fn prevent_default(&self);
	fn default_prevented(&self) -> bool;
}

/// Mirrors [***AddEventListenerOptions***](https://developer.mozilla.org/en-US/docs/Web/API/EventTarget/addEventListener#options).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ListenerOptions {
	capture: bool,
	once: bool,
	passive: bool,
}
impl ListenerOptions {
	#[must_use]
	pub const fn new() -> Self {
		Self {
			capture: false,
			once: false,
			passive: false,
		}
	}

	#[must_use]
	pub const fn with_capture(self, capture: bool) -> Self {
		Self { capture, ..self }
	}

	#[must_use]
	pub const fn with_once(self, once: bool) -> Self {
		Self { once, ..self }
	}

	#[must_use]
	pub const fn with_passive(self, passive: bool) -> Self {
		Self { passive, ..self }
	}

	#[must_use]
	pub const fn capture(self) -> bool {
		self.capture
	}

	#[must_use]
	pub const fn once(self) -> bool {
		self.once
	}

	#[must_use]
	pub const fn passive(self) -> bool {
		self.passive
	}
}

pub type EventHandler<D> = Rc<dyn Fn(&<D as Dom>::Event)>;

/// A handle to a document.
///
/// Handles are cheap to clone and all clones refer to the same document.
/// Fallible operations report backend failures only; callers in this crate log and otherwise ignore them.
pub trait Dom: Clone + 'static {
	type Element: Clone + PartialEq + Debug + 'static;
	type Event: DomEvent<Element = Self::Element> + 'static;

	/// Returned by [`Dom::add_event_listener`] and required to remove the listener again.
	type Listener: Debug;

	/// The element's tag name, upper-cased for HTML elements.
	fn tag_name(&self, element: &Self::Element) -> String;

	fn is_anchor(&self, element: &Self::Element) -> bool {
		self.tag_name(element).eq_ignore_ascii_case("A")
	}

	fn is_slot(&self, element: &Self::Element) -> bool {
		self.tag_name(element).eq_ignore_ascii_case("SLOT")
	}

	fn get_attribute(&self, element: &Self::Element, name: &str) -> Option<String>;

	fn has_attribute(&self, element: &Self::Element, name: &str) -> bool {
		self.get_attribute(element, name).is_some()
	}

	fn set_attribute(&self, element: &Self::Element, name: &str, value: &str) -> Result<()>;
	fn remove_attribute(&self, element: &Self::Element, name: &str) -> Result<()>;

	/// Adds (as empty attribute) or removes `name` depending on `force`. Returns `force`.
	fn toggle_attribute(&self, element: &Self::Element, name: &str, force: bool) -> Result<bool> {
		match (force, self.has_attribute(element, name)) {
			(true, false) => self.set_attribute(element, name, "")?,
			(false, true) => self.remove_attribute(element, name)?,
			_ => (),
		}
		Ok(force)
	}

	fn has_class(&self, element: &Self::Element, class: &str) -> bool;

	/// Adds or removes a class depending on `force`. Returns `force`.
	fn toggle_class(&self, element: &Self::Element, class: &str, force: bool) -> Result<bool>;

	/// The elements assigned to `slot`, skipping text and comment nodes.
	///
	/// With `flatten`, nested slots are replaced by their own assignment (or fallback content).
	fn assigned_elements(&self, slot: &Self::Element, flatten: bool) -> Vec<Self::Element>;

	fn add_event_listener(&self, target: &Self::Element, event_type: &str, options: ListenerOptions, handler: EventHandler<Self>) -> Result<Self::Listener>;
	fn remove_event_listener(&self, listener: Self::Listener) -> Result<()>;
}

/// A single value as found in [***FormData***](https://developer.mozilla.org/en-US/docs/Web/API/FormData).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormDataEntryValue {
	Text(String),
	/// A file input's entry, by file name.
	File(String),
}
impl FormDataEntryValue {
	#[must_use]
	pub fn as_str(&self) -> &str {
		match self {
			Self::Text(text) => text,
			Self::File(name) => name,
		}
	}
}

/// Form-association operations, as exposed by [***ElementInternals***](https://developer.mozilla.org/en-US/docs/Web/API/ElementInternals) in browsers.
pub trait FormDom: Dom {
	/// The form owner of `element`, if any.
	fn form_of(&self, element: &Self::Element) -> Option<Self::Element>;

	/// The form's entry list in tree order.
	fn form_data(&self, form: &Self::Element) -> Vec<(String, FormDataEntryValue)>;

	fn reset_form(&self, form: &Self::Element) -> Result<()>;

	/// Sets the value a form-associated element contributes to its form's entry list.
	fn set_form_value(&self, element: &Self::Element, value: &str) -> Result<()>;

	/// Submits `form` as if `submitter` had been activated, firing a cancelable ***submit*** event first.
	fn request_submit(&self, form: &Self::Element, submitter: &Self::Element) -> Result<()>;
}
