//! A small, single-threaded in-memory DOM.
//!
//! It implements event dispatch with capture, target and bubble phases, slot assignment with
//! ***slotchange*** notifications, anchor activation and enough of form association to drive
//! [`crate::utils::form`]. It is used by this crate's tests and works as a stand-in document
//! wherever [`web_sys`] is unavailable.
//!
//! Anything not needed by the directives (namespaces, shadow roots, layout, …) is intentionally absent:
//! slots are plain `SLOT` elements whose assignment is set explicitly through [`MemoryDom::assign_slot`].

use super::{Dom, DomEvent, EventHandler, FormDataEntryValue, FormDom, ListenerOptions};
use crate::{Error, Result};
use core::{
	cell::{Cell, RefCell},
	fmt::{self, Debug, Formatter},
};
use hashbrown::HashMap;
use std::rc::Rc;
use tracing::{instrument, trace, trace_span, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Clone, Default)]
pub struct MemoryDom(Rc<RefCell<Tree>>);
impl Debug for MemoryDom {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		let tree = self.0.borrow();
		f.debug_struct("MemoryDom")
			.field("node_count", &tree.nodes.len())
			.field("native_navigations", &tree.native_navigations)
			.finish_non_exhaustive()
	}
}

#[derive(Default)]
struct Tree {
	nodes: Vec<NodeData>,
	assignments: HashMap<NodeId, Vec<NodeId>>,
	next_listener_id: u64,
	native_navigations: Vec<String>,
	resets: Vec<NodeId>,
	submissions: Vec<Submission>,
}

struct NodeData {
	kind: NodeKind,
	parent: Option<NodeId>,
	children: Vec<NodeId>,
	listeners: Vec<Registration>,
}

enum NodeKind {
	Element {
		tag: String,
		attributes: Vec<(String, String)>,
		form_value: Option<String>,
	},
	Text(String),
	Comment(String),
}

struct Registration {
	id: u64,
	event_type: String,
	options: ListenerOptions,
	handler: EventHandler<MemoryDom>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct MemoryListener {
	target: NodeId,
	id: u64,
}

/// A form submission that went through (i.e. whose ***submit*** event wasn't canceled).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
	pub form: NodeId,
	pub submitter: Option<NodeId>,
	pub entries: Vec<(String, FormDataEntryValue)>,
}

#[derive(Clone)]
pub struct MemoryEvent(Rc<EventState>);
struct EventState {
	event_type: String,
	target: NodeId,
	bubbles: bool,
	cancelable: bool,
	submitter: Option<NodeId>,
	default_prevented: Cell<bool>,
	propagation_stopped: Cell<bool>,
}
impl Debug for MemoryEvent {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("MemoryEvent")
			.field("event_type", &self.0.event_type)
			.field("target", &self.0.target)
			.field("default_prevented", &self.0.default_prevented.get())
			.finish_non_exhaustive()
	}
}
impl MemoryEvent {
	#[must_use]
	pub fn new(event_type: &str, target: NodeId, bubbles: bool, cancelable: bool) -> Self {
		Self(Rc::new(EventState {
			event_type: event_type.to_owned(),
			target,
			bubbles,
			cancelable,
			submitter: None,
			default_prevented: Cell::new(false),
			propagation_stopped: Cell::new(false),
		}))
	}

	fn with_submitter(event_type: &str, target: NodeId, submitter: NodeId) -> Self {
		Self(Rc::new(EventState {
			event_type: event_type.to_owned(),
			target,
			bubbles: true,
			cancelable: true,
			submitter: Some(submitter),
			default_prevented: Cell::new(false),
			propagation_stopped: Cell::new(false),
		}))
	}

	#[must_use]
	pub fn bubbles(&self) -> bool {
		self.0.bubbles
	}

	/// The element that triggered a ***submit*** event.
	#[must_use]
	pub fn submitter(&self) -> Option<NodeId> {
		self.0.submitter
	}

	pub fn stop_propagation(&self) {
		self.0.propagation_stopped.set(true)
	}
}
impl DomEvent for MemoryEvent {
	type Element = NodeId;

	fn event_type(&self) -> String {
		self.0.event_type.clone()
	}

	fn target(&self) -> Option<NodeId> {
		Some(self.0.target)
	}

	fn prevent_default(&self) {
		if self.0.cancelable {
			self.0.default_prevented.set(true)
		}
	}

	fn default_prevented(&self) -> bool {
		self.0.default_prevented.get()
	}
}

#[derive(Clone, Copy)]
enum Phase {
	Capture,
	AtTarget,
	Bubble,
}

impl Tree {
	fn node(&self, id: NodeId) -> Option<&NodeData> {
		self.nodes.get(id.0)
	}

	fn node_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
		self.nodes.get_mut(id.0)
	}

	fn insert(&mut self, kind: NodeKind) -> NodeId {
		self.nodes.push(NodeData {
			kind,
			parent: None,
			children: Vec::new(),
			listeners: Vec::new(),
		});
		NodeId(self.nodes.len() - 1)
	}

	fn tag(&self, id: NodeId) -> Option<&str> {
		match &self.node(id)?.kind {
			NodeKind::Element { tag, .. } => Some(tag.as_str()),
			NodeKind::Text(_) | NodeKind::Comment(_) => None,
		}
	}

	fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
		match &self.node(id)?.kind {
			NodeKind::Element { attributes, .. } => attributes.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str()),
			NodeKind::Text(_) | NodeKind::Comment(_) => None,
		}
	}

	fn attributes_mut(&mut self, id: NodeId) -> Result<&mut Vec<(String, String)>> {
		match self.node_mut(id).map(|node| &mut node.kind) {
			Some(NodeKind::Element { attributes, .. }) => Ok(attributes),
			Some(_) => Err(Error::Dom(format!("{:?} is not an element", id))),
			None => Err(Error::Dom(format!("{:?} does not exist", id))),
		}
	}

	/// Parent first, root last.
	fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
		let mut ancestors = Vec::new();
		let mut current = self.node(id).and_then(|node| node.parent);
		while let Some(parent) = current {
			ancestors.push(parent);
			current = self.node(parent).and_then(|node| node.parent);
		}
		ancestors
	}

	fn descendants(&self, id: NodeId, out: &mut Vec<NodeId>) {
		if let Some(node) = self.node(id) {
			for &child in &node.children {
				out.push(child);
				self.descendants(child, out);
			}
		}
	}

	fn collect_assigned(&self, slot: NodeId, flatten: bool, out: &mut Vec<NodeId>) {
		let assigned = self.assignments.get(&slot).map_or(&[][..], Vec::as_slice);
		let nodes = if assigned.is_empty() && flatten {
			// Fallback content.
			self.node(slot).map_or(&[][..], |node| node.children.as_slice())
		} else {
			assigned
		};
		for &node in nodes {
			match self.tag(node) {
				Some(tag) if flatten && tag == "SLOT" => self.collect_assigned(node, flatten, out),
				Some(_) => out.push(node),
				None => (),
			}
		}
	}

	fn form_data(&self, form: NodeId) -> Vec<(String, FormDataEntryValue)> {
		let mut controls = Vec::new();
		self.descendants(form, &mut controls);

		let mut entries = Vec::new();
		for control in controls {
			let (tag, form_value) = match self.node(control).map(|node| &node.kind) {
				Some(NodeKind::Element { tag, form_value, .. }) => (tag.as_str(), form_value.as_deref()),
				_ => continue,
			};
			let name = match self.attribute(control, "name") {
				Some(name) if !name.is_empty() => name,
				_ => continue,
			};
			if self.attribute(control, "disabled").is_some() {
				continue;
			}

			let value = self.attribute(control, "value").unwrap_or("");
			let entry = match tag {
				"INPUT" => match self.attribute(control, "type").unwrap_or("text").to_ascii_lowercase().as_str() {
					"submit" | "button" | "reset" | "image" => continue,
					"checkbox" | "radio" if self.attribute(control, "checked").is_none() => continue,
					"checkbox" | "radio" => FormDataEntryValue::Text(if value.is_empty() { "on" } else { value }.to_owned()),
					"file" => FormDataEntryValue::File(value.to_owned()),
					_ => FormDataEntryValue::Text(value.to_owned()),
				},
				"TEXTAREA" | "SELECT" => FormDataEntryValue::Text(value.to_owned()),
				_ if tag.contains('-') => match form_value {
					Some(form_value) => FormDataEntryValue::Text(form_value.to_owned()),
					None => continue,
				},
				_ => continue,
			};
			entries.push((name.to_owned(), entry));
		}
		entries
	}
}

impl MemoryDom {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a detached element. HTML tag names are upper-cased like in browsers.
	pub fn create_element(&self, tag: &str) -> NodeId {
		self.0.borrow_mut().insert(NodeKind::Element {
			tag: tag.to_ascii_uppercase(),
			attributes: Vec::new(),
			form_value: None,
		})
	}

	pub fn create_text(&self, data: &str) -> NodeId {
		self.0.borrow_mut().insert(NodeKind::Text(data.to_owned()))
	}

	pub fn create_comment(&self, data: &str) -> NodeId {
		self.0.borrow_mut().insert(NodeKind::Comment(data.to_owned()))
	}

	/// Moves `child` to the end of `parent`'s child list.
	#[instrument(skip(self))]
	pub fn append_child(&self, parent: NodeId, child: NodeId) -> Result<()> {
		let mut tree = self.0.borrow_mut();
		if tree.node(child).is_none() || tree.tag(parent).is_none() {
			return Err(Error::Dom(format!("can't append {:?} to {:?}", child, parent)));
		}
		if parent == child || tree.ancestors(parent).contains(&child) {
			return Err(Error::Dom(format!("appending {:?} to {:?} would create a cycle", child, parent)));
		}

		if let Some(previous) = tree.node(child).and_then(|node| node.parent) {
			if let Some(previous) = tree.node_mut(previous) {
				previous.children.retain(|&c| c != child);
			}
		}
		if let Some(node) = tree.node_mut(child) {
			node.parent = Some(parent);
		}
		if let Some(parent) = tree.node_mut(parent) {
			parent.children.push(child);
		}
		Ok(())
	}

	pub fn parent(&self, node: NodeId) -> Option<NodeId> {
		self.0.borrow().node(node).and_then(|node| node.parent)
	}

	pub fn children(&self, node: NodeId) -> Vec<NodeId> {
		self.0.borrow().node(node).map(|node| node.children.clone()).unwrap_or_default()
	}

	pub fn text(&self, node: NodeId) -> Option<String> {
		match &self.0.borrow().node(node)?.kind {
			NodeKind::Text(data) | NodeKind::Comment(data) => Some(data.clone()),
			NodeKind::Element { .. } => None,
		}
	}

	/// Replaces the nodes assigned to `slot` and fires a bubbling ***slotchange*** at it if the assignment changed.
	#[instrument(skip(self))]
	pub fn assign_slot(&self, slot: NodeId, nodes: &[NodeId]) -> Result<()> {
		{
			let mut tree = self.0.borrow_mut();
			if tree.tag(slot) != Some("SLOT") {
				return Err(Error::Dom(format!("{:?} is not a slot", slot)));
			}
			let previous = tree.assignments.get(&slot).map_or(&[][..], Vec::as_slice);
			if previous == nodes {
				trace!("Slot assignment unchanged.");
				return Ok(());
			}
			tree.assignments.insert(slot, nodes.to_vec());
		}
		self.dispatch_event(&MemoryEvent::new("slotchange", slot, true, false));
		Ok(())
	}

	/// Dispatches `event` at its target. Returns `false` iff the event was canceled.
	pub fn dispatch_event(&self, event: &MemoryEvent) -> bool {
		let target = event.0.target;
		let span = trace_span!("dispatch_event", event_type = %event.0.event_type, ?target);
		let _enter = span.enter();

		let path = self.0.borrow().ancestors(target);
		for &node in path.iter().rev() {
			self.invoke(node, event, Phase::Capture);
			if event.0.propagation_stopped.get() {
				return !event.default_prevented();
			}
		}

		self.invoke(target, event, Phase::AtTarget);

		if event.0.bubbles {
			for &node in &path {
				if event.0.propagation_stopped.get() {
					break;
				}
				self.invoke(node, event, Phase::Bubble);
			}
		}
		!event.default_prevented()
	}

	fn invoke(&self, node: NodeId, event: &MemoryEvent, phase: Phase) {
		let mut snapshot: Vec<(u64, bool, EventHandler<Self>)> = match self.0.borrow().node(node) {
			Some(data) => data
				.listeners
				.iter()
				.filter(|registration| registration.event_type == event.0.event_type)
				.filter(|registration| match phase {
					Phase::Capture => registration.options.capture(),
					Phase::AtTarget => true,
					Phase::Bubble => !registration.options.capture(),
				})
				.map(|registration| (registration.id, registration.options.capture(), Rc::clone(&registration.handler)))
				.collect(),
			None => return,
		};
		// At the target, capturing listeners still run first.
		snapshot.sort_by_key(|&(_, capture, _)| !capture);

		for (id, _, handler) in snapshot {
			let registered = {
				let mut tree = self.0.borrow_mut();
				let listeners = match tree.node_mut(node) {
					Some(data) => &mut data.listeners,
					None => return,
				};
				match listeners.iter().position(|registration| registration.id == id) {
					Some(index) => {
						if listeners[index].options.once() {
							listeners.remove(index);
						}
						true
					}
					// Removed by an earlier handler.
					None => false,
				}
			};
			if registered {
				handler(event);
			}
		}
	}

	/// Activates `element` like a user click. Unless canceled, this follows the closest anchor's `href`,
	/// which is recorded in [`MemoryDom::native_navigations`].
	#[instrument(skip(self))]
	pub fn click(&self, element: NodeId) -> bool {
		let proceed = self.dispatch_event(&MemoryEvent::new("click", element, true, true));
		if proceed {
			let mut tree = self.0.borrow_mut();
			let href = core::iter::once(element)
				.chain(tree.ancestors(element))
				.find(|&node| tree.tag(node) == Some("A"))
				.and_then(|node| tree.attribute(node, "href"))
				.map(str::to_owned);
			if let Some(href) = href {
				trace!("Following native link.");
				tree.native_navigations.push(href);
			}
		}
		proceed
	}

	/// `href`s followed by uncanceled clicks, oldest first.
	pub fn native_navigations(&self) -> Vec<String> {
		self.0.borrow().native_navigations.clone()
	}

	/// Forms reset through [`FormDom::reset_form`], oldest first.
	pub fn resets(&self) -> Vec<NodeId> {
		self.0.borrow().resets.clone()
	}

	pub fn submissions(&self) -> Vec<Submission> {
		self.0.borrow().submissions.clone()
	}

	pub fn listener_count(&self, node: NodeId, event_type: &str) -> usize {
		self.0
			.borrow()
			.node(node)
			.map_or(0, |data| data.listeners.iter().filter(|registration| registration.event_type == event_type).count())
	}

	pub fn form_value(&self, element: NodeId) -> Option<String> {
		match &self.0.borrow().node(element)?.kind {
			NodeKind::Element { form_value, .. } => form_value.clone(),
			NodeKind::Text(_) | NodeKind::Comment(_) => None,
		}
	}
}

impl Dom for MemoryDom {
	type Element = NodeId;
	type Event = MemoryEvent;
	type Listener = MemoryListener;

	fn tag_name(&self, element: &NodeId) -> String {
		match self.0.borrow().node(*element).map(|node| &node.kind) {
			Some(NodeKind::Element { tag, .. }) => tag.clone(),
			Some(NodeKind::Text(_)) => "#text".to_owned(),
			Some(NodeKind::Comment(_)) => "#comment".to_owned(),
			None => String::new(),
		}
	}

	fn get_attribute(&self, element: &NodeId, name: &str) -> Option<String> {
		self.0.borrow().attribute(*element, name).map(str::to_owned)
	}

	fn set_attribute(&self, element: &NodeId, name: &str, value: &str) -> Result<()> {
		let mut tree = self.0.borrow_mut();
		let attributes = tree.attributes_mut(*element)?;
		match attributes.iter_mut().find(|(n, _)| n == name) {
			Some((_, existing)) => value.clone_into(existing),
			None => attributes.push((name.to_owned(), value.to_owned())),
		}
		Ok(())
	}

	fn remove_attribute(&self, element: &NodeId, name: &str) -> Result<()> {
		self.0.borrow_mut().attributes_mut(*element)?.retain(|(n, _)| n != name);
		Ok(())
	}

	fn has_class(&self, element: &NodeId, class: &str) -> bool {
		self.0
			.borrow()
			.attribute(*element, "class")
			.map_or(false, |classes| classes.split_ascii_whitespace().any(|c| c == class))
	}

	fn toggle_class(&self, element: &NodeId, class: &str, force: bool) -> Result<bool> {
		let mut classes: Vec<String> = self
			.get_attribute(element, "class")
			.map(|classes| classes.split_ascii_whitespace().map(str::to_owned).collect())
			.unwrap_or_default();
		let present = classes.iter().any(|c| c == class);
		match (force, present) {
			(true, false) => classes.push(class.to_owned()),
			(false, true) => classes.retain(|c| c != class),
			_ => return Ok(force),
		}
		self.set_attribute(element, "class", &classes.join(" "))?;
		Ok(force)
	}

	fn assigned_elements(&self, slot: &NodeId, flatten: bool) -> Vec<NodeId> {
		let mut elements = Vec::new();
		self.0.borrow().collect_assigned(*slot, flatten, &mut elements);
		elements
	}

	fn add_event_listener(&self, target: &NodeId, event_type: &str, options: ListenerOptions, handler: EventHandler<Self>) -> Result<MemoryListener> {
		let mut tree = self.0.borrow_mut();
		let id = tree.next_listener_id;
		let node = tree.node_mut(*target).ok_or_else(|| Error::Dom(format!("{:?} does not exist", target)))?;
		node.listeners.push(Registration {
			id,
			event_type: event_type.to_owned(),
			options,
			handler,
		});
		tree.next_listener_id += 1;
		Ok(MemoryListener { target: *target, id })
	}

	fn remove_event_listener(&self, listener: MemoryListener) -> Result<()> {
		let mut tree = self.0.borrow_mut();
		let node = tree.node_mut(listener.target).ok_or_else(|| Error::Dom(format!("{:?} does not exist", listener.target)))?;
		let before = node.listeners.len();
		node.listeners.retain(|registration| registration.id != listener.id);
		if node.listeners.len() == before {
			warn!("Listener {:?} was already removed.", listener);
		}
		Ok(())
	}
}

impl FormDom for MemoryDom {
	fn form_of(&self, element: &NodeId) -> Option<NodeId> {
		let tree = self.0.borrow();
		tree.ancestors(*element).into_iter().find(|&node| tree.tag(node) == Some("FORM"))
	}

	fn form_data(&self, form: &NodeId) -> Vec<(String, FormDataEntryValue)> {
		self.0.borrow().form_data(*form)
	}

	#[instrument(skip(self))]
	fn reset_form(&self, form: &NodeId) -> Result<()> {
		if !self.dispatch_event(&MemoryEvent::new("reset", *form, true, true)) {
			return Ok(());
		}
		let mut tree = self.0.borrow_mut();
		let mut controls = Vec::new();
		tree.descendants(*form, &mut controls);
		for control in controls {
			if let Some(NodeKind::Element { form_value, .. }) = tree.node_mut(control).map(|node| &mut node.kind) {
				*form_value = None;
			}
		}
		tree.resets.push(*form);
		Ok(())
	}

	fn set_form_value(&self, element: &NodeId, value: &str) -> Result<()> {
		match self.0.borrow_mut().node_mut(*element).map(|node| &mut node.kind) {
			Some(NodeKind::Element { form_value, .. }) => {
				*form_value = Some(value.to_owned());
				Ok(())
			}
			_ => Err(Error::Dom(format!("{:?} is not an element", element))),
		}
	}

	#[instrument(skip(self))]
	fn request_submit(&self, form: &NodeId, submitter: &NodeId) -> Result<()> {
		if self.0.borrow().tag(*form) != Some("FORM") {
			return Err(Error::Dom(format!("{:?} is not a form", form)));
		}
		if !self.dispatch_event(&MemoryEvent::with_submitter("submit", *form, *submitter)) {
			trace!("Submission canceled.");
			return Ok(());
		}
		let mut tree = self.0.borrow_mut();
		let entries = tree.form_data(*form);
		tree.submissions.push(Submission {
			form: *form,
			submitter: Some(*submitter),
			entries,
		});
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn recorder(dom: &MemoryDom, log: &Rc<RefCell<Vec<&'static str>>>, node: NodeId, capture: bool, label: &'static str) -> MemoryListener {
		let log = Rc::clone(log);
		dom.add_event_listener(&node, "ping", ListenerOptions::new().with_capture(capture), Rc::new(move |_: &MemoryEvent| log.borrow_mut().push(label)))
			.unwrap()
	}

	#[test]
	fn dispatch_runs_capture_target_and_bubble_phases_in_order() {
		let dom = MemoryDom::new();
		let outer = dom.create_element("div");
		let inner = dom.create_element("span");
		dom.append_child(outer, inner).unwrap();

		let log = Rc::new(RefCell::new(Vec::new()));
		recorder(&dom, &log, outer, false, "outer bubble");
		recorder(&dom, &log, inner, false, "inner bubble");
		recorder(&dom, &log, inner, true, "inner capture");
		recorder(&dom, &log, outer, true, "outer capture");

		assert!(dom.dispatch_event(&MemoryEvent::new("ping", inner, true, true)));
		assert_eq!(*log.borrow(), ["outer capture", "inner capture", "inner bubble", "outer bubble"]);
	}

	#[test]
	fn non_bubbling_events_skip_ancestors_bubble_listeners() {
		let dom = MemoryDom::new();
		let outer = dom.create_element("div");
		let inner = dom.create_element("span");
		dom.append_child(outer, inner).unwrap();

		let log = Rc::new(RefCell::new(Vec::new()));
		recorder(&dom, &log, outer, false, "outer bubble");
		recorder(&dom, &log, outer, true, "outer capture");

		dom.dispatch_event(&MemoryEvent::new("ping", inner, false, false));
		assert_eq!(*log.borrow(), ["outer capture"]);
	}

	#[test]
	fn removed_listeners_are_not_invoked() {
		let dom = MemoryDom::new();
		let div = dom.create_element("div");
		let log = Rc::new(RefCell::new(Vec::new()));
		let listener = recorder(&dom, &log, div, false, "removed");
		dom.remove_event_listener(listener).unwrap();

		dom.dispatch_event(&MemoryEvent::new("ping", div, true, true));
		assert!(log.borrow().is_empty());
		assert_eq!(dom.listener_count(div, "ping"), 0);
	}

	#[test]
	fn once_listeners_fire_once() {
		let dom = MemoryDom::new();
		let div = dom.create_element("div");
		let count = Rc::new(Cell::new(0));
		let counter = Rc::clone(&count);
		dom.add_event_listener(&div, "ping", ListenerOptions::new().with_once(true), Rc::new(move |_: &MemoryEvent| counter.set(counter.get() + 1)))
			.unwrap();

		dom.dispatch_event(&MemoryEvent::new("ping", div, false, false));
		dom.dispatch_event(&MemoryEvent::new("ping", div, false, false));
		assert_eq!(count.get(), 1);
	}

	#[test]
	fn prevented_clicks_do_not_follow_links() {
		let dom = MemoryDom::new();
		let anchor = dom.create_element("a");
		let label = dom.create_element("span");
		dom.append_child(anchor, label).unwrap();
		dom.set_attribute(&anchor, "href", "/somewhere").unwrap();

		assert!(dom.click(label));
		assert_eq!(dom.native_navigations(), ["/somewhere"]);

		dom.add_event_listener(&anchor, "click", ListenerOptions::new(), Rc::new(|event: &MemoryEvent| event.prevent_default()))
			.unwrap();
		assert!(!dom.click(label));
		assert_eq!(dom.native_navigations().len(), 1);
	}

	#[test]
	fn only_the_closest_anchor_is_followed() {
		let dom = MemoryDom::new();
		let outer = dom.create_element("a");
		let inner = dom.create_element("a");
		let label = dom.create_element("span");
		dom.append_child(outer, inner).unwrap();
		dom.append_child(inner, label).unwrap();
		dom.set_attribute(&outer, "href", "/outer").unwrap();

		assert!(dom.click(label));
		assert!(dom.native_navigations().is_empty());

		dom.set_attribute(&inner, "href", "/inner").unwrap();
		dom.click(label);
		assert_eq!(dom.native_navigations(), ["/inner"]);
	}

	#[test]
	fn assigned_elements_skip_text_and_flatten_nested_slots() {
		let dom = MemoryDom::new();
		let outer = dom.create_element("slot");
		let inner = dom.create_element("slot");
		let text = dom.create_text("text");
		let comment = dom.create_comment("comment");
		let span = dom.create_element("span");
		let em = dom.create_element("em");

		dom.assign_slot(inner, &[em]).unwrap();
		dom.assign_slot(outer, &[text, comment, span, inner]).unwrap();

		assert_eq!(dom.assigned_elements(&outer, false), [span, inner]);
		assert_eq!(dom.assigned_elements(&outer, true), [span, em]);
	}

	#[test]
	fn slotchange_fires_only_on_changed_assignment() {
		let dom = MemoryDom::new();
		let host = dom.create_element("div");
		let slot = dom.create_element("slot");
		dom.append_child(host, slot).unwrap();
		let span = dom.create_element("span");

		let count = Rc::new(Cell::new(0));
		let counter = Rc::clone(&count);
		dom.add_event_listener(&host, "slotchange", ListenerOptions::new(), Rc::new(move |_: &MemoryEvent| counter.set(counter.get() + 1)))
			.unwrap();

		dom.assign_slot(slot, &[span]).unwrap();
		dom.assign_slot(slot, &[span]).unwrap();
		assert_eq!(count.get(), 1);
	}

	#[test]
	fn append_child_rejects_cycles() {
		let dom = MemoryDom::new();
		let outer = dom.create_element("div");
		let inner = dom.create_element("div");
		dom.append_child(outer, inner).unwrap();
		assert!(dom.append_child(inner, outer).is_err());
		assert!(dom.append_child(outer, outer).is_err());
	}

	#[test]
	fn toggle_class_keeps_other_classes() {
		let dom = MemoryDom::new();
		let div = dom.create_element("div");
		dom.set_attribute(&div, "class", "a b").unwrap();

		dom.toggle_class(&div, "active", true).unwrap();
		assert_eq!(dom.get_attribute(&div, "class").as_deref(), Some("a b active"));
		dom.toggle_class(&div, "a", false).unwrap();
		assert_eq!(dom.get_attribute(&div, "class").as_deref(), Some("b active"));
		assert!(dom.has_class(&div, "active"));
	}

	#[test]
	fn form_data_follows_control_rules() {
		let dom = MemoryDom::new();
		let form = dom.create_element("form");
		let controls = [
			("input", &[("name", "name"), ("value", "John")][..]),
			("input", &[("name", "age"), ("value", "30"), ("disabled", "")][..]),
			("input", &[("name", "terms"), ("type", "checkbox")][..]),
			("input", &[("name", "news"), ("type", "checkbox"), ("checked", "")][..]),
			("input", &[("name", "go"), ("type", "submit"), ("value", "Go")][..]),
			("textarea", &[("name", "bio"), ("value", "Hi")][..]),
			("div", &[("name", "ignored"), ("value", "x")][..]),
		];
		for (tag, attributes) in controls {
			let control = dom.create_element(tag);
			for (name, value) in attributes {
				dom.set_attribute(&control, name, value).unwrap();
			}
			dom.append_child(form, control).unwrap();
		}

		assert_eq!(
			dom.form_data(&form),
			[
				("name".to_owned(), FormDataEntryValue::Text("John".to_owned())),
				("news".to_owned(), FormDataEntryValue::Text("on".to_owned())),
				("bio".to_owned(), FormDataEntryValue::Text("Hi".to_owned())),
			]
		);
	}
}
