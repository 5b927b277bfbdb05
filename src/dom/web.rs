//! [`Dom`] and [`FormDom`] over [`web_sys`].
//!
//! Form association expects custom elements to expose their [***ElementInternals***](https://developer.mozilla.org/en-US/docs/Web/API/ElementInternals)
//! as `internals` property, i.e. `this.internals = this.attachInternals()`.

use super::{Dom, DomEvent, EventHandler, FormDataEntryValue, FormDom, ListenerOptions};
use crate::{closure_map, Error, Result};
use js_sys::{Function, Object, Reflect};
use tracing::{instrument, trace, warn};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{AddEventListenerOptions, AssignedNodesOptions, Element, Event, HtmlFormElement, HtmlSlotElement};

fn dom_error(error: JsValue) -> Error {
	Error::Dom(format!("{:?}", error))
}

/// The browser's document. All instances are interchangeable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WebDom;

impl WebDom {
	/// How many listener closures are currently held for registered listeners.
	#[must_use]
	pub fn published_listener_count(&self) -> usize {
		closure_map::len()
	}
}

#[derive(Debug, Clone)]
pub struct WebEvent(pub Event);

impl DomEvent for WebEvent {
	type Element = Element;

	fn event_type(&self) -> String {
		self.0.type_()
	}

	fn target(&self) -> Option<Element> {
		self.0.target().and_then(|target| target.dyn_into::<Element>().ok())
	}

	fn prevent_default(&self) {
		self.0.prevent_default();
	}

	fn default_prevented(&self) -> bool {
		self.0.default_prevented()
	}
}

#[derive(Debug)]
pub struct WebListener {
	target: Element,
	event_type: String,
	capture: bool,
	id: u64,
}

impl Dom for WebDom {
	type Element = Element;
	type Event = WebEvent;
	type Listener = WebListener;

	fn tag_name(&self, element: &Element) -> String {
		element.tag_name()
	}

	fn get_attribute(&self, element: &Element, name: &str) -> Option<String> {
		element.get_attribute(name)
	}

	fn has_attribute(&self, element: &Element, name: &str) -> bool {
		element.has_attribute(name)
	}

	fn set_attribute(&self, element: &Element, name: &str, value: &str) -> Result<()> {
		element.set_attribute(name, value).map_err(dom_error)
	}

	fn remove_attribute(&self, element: &Element, name: &str) -> Result<()> {
		element.remove_attribute(name).map_err(dom_error)
	}

	fn toggle_attribute(&self, element: &Element, name: &str, force: bool) -> Result<bool> {
		element.toggle_attribute_with_force(name, force).map_err(dom_error)
	}

	fn has_class(&self, element: &Element, class: &str) -> bool {
		element.class_list().contains(class)
	}

	fn toggle_class(&self, element: &Element, class: &str, force: bool) -> Result<bool> {
		element.class_list().toggle_with_force(class, force).map_err(dom_error)
	}

	fn assigned_elements(&self, slot: &Element, flatten: bool) -> Vec<Element> {
		let slot = match slot.dyn_ref::<HtmlSlotElement>() {
			Some(slot) => slot,
			None => {
				warn!("{:?} is not a slot.", slot);
				return Vec::new();
			}
		};
		let options = AssignedNodesOptions::new();
		options.set_flatten(flatten);
		slot.assigned_elements_with_options(&options)
			.iter()
			.filter_map(|node| node.dyn_into::<Element>().ok())
			.collect()
	}

	#[instrument(skip(self, handler))]
	fn add_event_listener(&self, target: &Element, event_type: &str, options: ListenerOptions, handler: EventHandler<Self>) -> Result<WebListener> {
		let closure = Closure::<dyn FnMut(Event)>::new(move |event: Event| handler(&WebEvent(event)));
		let (id, function) = closure_map::publish(closure);

		let js_options = AddEventListenerOptions::new();
		js_options.set_capture(options.capture());
		js_options.set_once(options.once());
		js_options.set_passive(options.passive());
		if let Err(error) = target.add_event_listener_with_callback_and_add_event_listener_options(event_type, &function, &js_options) {
			closure_map::unpublish(id);
			return Err(dom_error(error));
		}

		trace!(id, "Added event listener.");
		Ok(WebListener {
			target: target.clone(),
			event_type: event_type.to_owned(),
			capture: options.capture(),
			id,
		})
	}

	#[instrument(skip(self))]
	fn remove_event_listener(&self, listener: WebListener) -> Result<()> {
		let function = match closure_map::function(listener.id) {
			Some(function) => function,
			None => {
				warn!("Listener {:?} was already removed.", listener);
				return Ok(());
			}
		};
		let result = listener
			.target
			.remove_event_listener_with_callback_and_bool(&listener.event_type, &function, listener.capture)
			.map_err(dom_error);
		closure_map::unpublish(listener.id);
		result
	}
}

fn internals(element: &Element) -> Option<Object> {
	Reflect::get(element, &JsValue::from_str("internals"))
		.ok()
		.and_then(|internals| internals.dyn_into::<Object>().ok())
}

fn as_form(form: &Element) -> Result<&HtmlFormElement> {
	form.dyn_ref::<HtmlFormElement>().ok_or_else(|| Error::Dom(format!("{:?} is not a form", form)))
}

impl FormDom for WebDom {
	fn form_of(&self, element: &Element) -> Option<Element> {
		if let Some(internals) = internals(element) {
			return Reflect::get(&internals, &JsValue::from_str("form"))
				.ok()
				.and_then(|form| form.dyn_into::<Element>().ok());
		}
		element.closest("form").ok().flatten()
	}

	fn form_data(&self, form: &Element) -> Vec<(String, FormDataEntryValue)> {
		let entries = as_form(form)
			.and_then(|form| web_sys::FormData::new_with_form(form).map_err(dom_error))
			.and_then(|form_data| js_sys::try_iter(&form_data).map_err(dom_error));
		let entries = match entries {
			Ok(Some(entries)) => entries,
			Ok(None) => return Vec::new(),
			Err(error) => {
				warn!("Could not read form data: {}", error);
				return Vec::new();
			}
		};

		entries
			.filter_map(|entry| {
				let entry: js_sys::Array = entry.ok()?.dyn_into().ok()?;
				let name = entry.get(0).as_string()?;
				let value = entry.get(1);
				let value = match value.as_string() {
					Some(text) => FormDataEntryValue::Text(text),
					None => FormDataEntryValue::File(Reflect::get(&value, &JsValue::from_str("name")).ok()?.as_string()?),
				};
				Some((name, value))
			})
			.collect()
	}

	#[instrument(skip(self))]
	fn reset_form(&self, form: &Element) -> Result<()> {
		as_form(form)?.reset();
		Ok(())
	}

	fn set_form_value(&self, element: &Element, value: &str) -> Result<()> {
		let internals = internals(element).ok_or_else(|| Error::Dom(format!("{:?} has no `internals`", element)))?;
		let set_form_value: Function = Reflect::get(&internals, &JsValue::from_str("setFormValue"))
			.map_err(dom_error)?
			.dyn_into()
			.map_err(|_| Error::Dom("`internals.setFormValue` is not a function".to_owned()))?;
		set_form_value.call1(&internals, &JsValue::from_str(value)).map_err(dom_error)?;
		Ok(())
	}

	/// Custom elements can't be passed to `requestSubmit`, so the ***submit*** event's `submitter` is patched in by a one-time capturing listener.
	#[instrument(skip(self))]
	fn request_submit(&self, form: &Element, submitter: &Element) -> Result<()> {
		let html_form = as_form(form)?;

		let submitter_value = JsValue::from(submitter.clone());
		let patch = Closure::once_into_js(move |event: Event| {
			let descriptor = Object::new();
			let defined = Reflect::set(&descriptor, &JsValue::from_str("configurable"), &JsValue::TRUE)
				.and_then(|_| Reflect::set(&descriptor, &JsValue::from_str("enumerable"), &JsValue::TRUE))
				.and_then(|_| Reflect::set(&descriptor, &JsValue::from_str("value"), &submitter_value));
			match defined {
				Ok(_) => {
					Object::define_property(&event, &JsValue::from_str("submitter"), &descriptor);
				}
				Err(error) => warn!("Could not patch `submitter`: {:?}", error),
			}
		});

		let options = AddEventListenerOptions::new();
		options.set_capture(true);
		options.set_once(true);
		form.add_event_listener_with_callback_and_add_event_listener_options("submit", patch.unchecked_ref(), &options)
			.map_err(dom_error)?;

		html_form.request_submit().map_err(dom_error)
	}
}
