//! Reflects whether nested slots have elements assigned as an attribute on the host element,
//! e.g. for styling `footer[data-has-elements]`.
//!
//! The directive listens for ***slotchange*** events reaching the element it is bound to.
//! Each event that comes from a matching slot sets or removes the attribute according to that slot alone,
//! so with several matching slots the most recently changed one wins.
//! Text and comment nodes don't count as assigned elements.

use crate::{
	directive::{Directive, Part, PartType, Rendered},
	dom::{Dom, DomEvent, EventHandler, ListenerOptions},
	Result,
};
use core::fmt::{self, Debug, Formatter};
use std::rc::Rc;
use tracing::{error, trace};

pub const DEFAULT_ATTRIBUTE: &str = "data-has-elements";

/// The `slot_filled` directive.
///
/// Its parameters are the attribute name (defaulting to [`DEFAULT_ATTRIBUTE`]) and a slot filter:
/// `None` reacts to all slots, `Some("")` only to the default slot and `Some(name)` only to the slot with that name.
pub struct SlotFilled<D: Dom> {
	dom: D,
	element: Option<D::Element>,
	attribute: String,
	slot_name: Option<String>,
	listener: Option<D::Listener>,
}

impl<D: Dom> Debug for SlotFilled<D> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("SlotFilled")
			.field("element", &self.element)
			.field("attribute", &self.attribute)
			.field("slot_name", &self.slot_name)
			.field("listener", &self.listener)
			.finish_non_exhaustive()
	}
}

impl<D: Dom> SlotFilled<D> {
	/// # Errors
	///
	/// [`Error::InvalidPart`](`crate::Error::InvalidPart`) unless `part` is an element part.
	pub fn new(dom: D, part: &Part<D::Element>) -> Result<Self> {
		part.expect_type("slot_filled", &[PartType::Element], "bind it to the element containing the slots")?;
		Ok(Self {
			dom,
			element: None,
			attribute: DEFAULT_ATTRIBUTE.to_owned(),
			slot_name: None,
			listener: None,
		})
	}

	#[must_use]
	pub fn is_listening(&self) -> bool {
		self.listener.is_some()
	}

	fn start_listening(&mut self) {
		if self.listener.is_some() {
			return;
		}
		let element = match &self.element {
			Some(element) => element.clone(),
			None => return,
		};

		let dom = self.dom.clone();
		let host = element.clone();
		let attribute = self.attribute.clone();
		let slot_name = self.slot_name.clone();
		let handler: EventHandler<D> = Rc::new(move |event: &D::Event| {
			let slot = match event.target() {
				Some(target) if dom.is_slot(&target) => target,
				_ => return,
			};
			let matches = match slot_name.as_deref() {
				None => true,
				Some("") => !dom.has_attribute(&slot, "name"),
				Some(name) => dom.get_attribute(&slot, "name").as_deref() == Some(name),
			};
			if !matches {
				return;
			}

			let filled = !dom.assigned_elements(&slot, true).is_empty();
			trace!(?slot, filled, "Slot changed.");
			if let Err(error) = dom.toggle_attribute(&host, &attribute, filled) {
				error!("Could not toggle `{}` on {:?}: {}", attribute, host, error);
			}
		});

		match self.dom.add_event_listener(&element, "slotchange", ListenerOptions::new().with_capture(true), handler) {
			Ok(listener) => self.listener = Some(listener),
			Err(error) => error!("Could not listen for slot changes on {:?}: {}", element, error),
		}
	}

	fn stop_listening(&mut self) {
		if let Some(listener) = self.listener.take() {
			if let Err(error) = self.dom.remove_event_listener(listener) {
				error!("Could not stop listening for slot changes: {}", error);
			}
		}
	}
}

impl<D: Dom> Directive for SlotFilled<D> {
	type Element = D::Element;
	type Params = (Option<String>, Option<String>);
	type Output = ();

	fn update(&mut self, part: &Part<D::Element>, params: Self::Params, connected: bool) -> Rendered<()> {
		let (attribute, slot_name) = params;
		self.attribute = attribute.unwrap_or_else(|| DEFAULT_ATTRIBUTE.to_owned());
		self.slot_name = slot_name;
		self.element = Some(part.element.clone());

		self.stop_listening();
		if connected {
			self.start_listening();
		}
		Rendered::Nothing
	}

	fn disconnected(&mut self) {
		self.stop_listening();
	}

	fn reconnected(&mut self) {
		self.start_listening();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		directive::Binding,
		dom::memory::{MemoryDom, NodeId},
		Error,
	};

	struct Fixture {
		dom: MemoryDom,
		host: NodeId,
		default_slot: NodeId,
		one: NodeId,
		two: NodeId,
	}

	/// `<div><slot name="one"></slot><slot name="two"></slot><slot></slot></div>`
	fn fixture() -> Fixture {
		let dom = MemoryDom::new();
		let host = dom.create_element("div");
		let one = dom.create_element("slot");
		let two = dom.create_element("slot");
		let default_slot = dom.create_element("slot");
		dom.set_attribute(&one, "name", "one").unwrap();
		dom.set_attribute(&two, "name", "two").unwrap();
		for slot in [one, two, default_slot] {
			dom.append_child(host, slot).unwrap();
		}
		Fixture {
			dom,
			host,
			default_slot,
			one,
			two,
		}
	}

	impl Fixture {
		fn bind(&self, slot_name: Option<&str>) -> Binding<SlotFilled<MemoryDom>> {
			let part = Part::element(self.host);
			let directive = SlotFilled::new(self.dom.clone(), &part).unwrap();
			let mut binding = Binding::new(part, directive);
			binding.render((None, slot_name.map(str::to_owned)));
			binding
		}

		fn assign_element(&self, slot: NodeId) {
			let span = self.dom.create_element("span");
			self.dom.assign_slot(slot, &[span]).unwrap();
		}

		fn has_elements(&self) -> bool {
			self.dom.has_attribute(&self.host, DEFAULT_ATTRIBUTE)
		}
	}

	#[test]
	fn empty_slots_leave_the_attribute_absent() {
		let f = fixture();
		let _binding = f.bind(None);
		assert!(!f.has_elements());
	}

	#[test]
	fn text_and_comments_do_not_count() {
		let f = fixture();
		let _binding = f.bind(None);
		let text = f.dom.create_text("Text node");
		let comment = f.dom.create_comment(" comment ");
		f.dom.assign_slot(f.default_slot, &[text, comment]).unwrap();
		assert!(!f.has_elements());
	}

	#[test]
	fn assigned_elements_set_the_attribute() {
		let f = fixture();
		let _binding = f.bind(None);
		f.assign_element(f.default_slot);
		assert!(f.has_elements());

		f.dom.assign_slot(f.default_slot, &[]).unwrap();
		assert!(!f.has_elements());
	}

	#[test]
	fn all_slots_are_considered_by_default() {
		let f = fixture();
		let _binding = f.bind(None);
		f.assign_element(f.one);
		f.assign_element(f.two);
		assert!(f.has_elements());
	}

	#[test]
	fn named_filters_ignore_other_slots() {
		let f = fixture();
		let _binding = f.bind(Some("two"));
		f.assign_element(f.one);
		f.assign_element(f.default_slot);
		assert!(!f.has_elements());

		f.assign_element(f.two);
		assert!(f.has_elements());
	}

	#[test]
	fn empty_filter_only_considers_the_default_slot() {
		let f = fixture();
		let _binding = f.bind(Some(""));
		f.assign_element(f.one);
		assert!(!f.has_elements());

		f.assign_element(f.default_slot);
		assert!(f.has_elements());
	}

	#[test]
	fn the_last_matching_event_wins() {
		let f = fixture();
		let _binding = f.bind(None);
		f.assign_element(f.one);
		f.assign_element(f.two);
		f.dom.assign_slot(f.two, &[]).unwrap();

		// `one` is still filled.
		assert!(!f.has_elements());
	}

	#[test]
	fn custom_attribute_names() {
		let f = fixture();
		let part = Part::element(f.host);
		let mut binding = Binding::new(part.clone(), SlotFilled::new(f.dom.clone(), &part).unwrap());
		binding.render((Some("data-has-social-links".to_owned()), Some("one".to_owned())));
		f.assign_element(f.one);

		assert!(f.dom.has_attribute(&f.host, "data-has-social-links"));
		assert!(!f.has_elements());
	}

	#[test]
	fn listening_is_idempotent_across_renders_and_reconnects() {
		let f = fixture();
		let mut binding = f.bind(None);
		binding.render((None, None));
		binding.render((None, None));
		assert_eq!(f.dom.listener_count(f.host, "slotchange"), 1);

		binding.set_connected(false);
		assert_eq!(f.dom.listener_count(f.host, "slotchange"), 0);
		f.assign_element(f.default_slot);
		assert!(!f.has_elements());

		binding.set_connected(true);
		binding.set_connected(true);
		assert_eq!(f.dom.listener_count(f.host, "slotchange"), 1);
		assert!(binding.directive().map_or(false, SlotFilled::is_listening));
	}

	#[test]
	fn only_element_parts_are_accepted() {
		let f = fixture();
		assert!(matches!(
			SlotFilled::new(f.dom.clone(), &Part::child(f.host)),
			Err(Error::InvalidPart { directive: "slot_filled", .. })
		));
	}
}
