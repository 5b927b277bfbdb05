//! Helpers for forms and [form-associated custom elements](https://web.dev/articles/more-capable-form-controls).

use crate::{
	dom::{DomEvent, FormDataEntryValue, FormDom},
	Result,
};
use core::{
	future::Future,
	pin::Pin,
	task::{Context, Poll},
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{error, instrument, trace};

/// How a form control's state is being restored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RestoreMode {
	Autocomplete,
	Restore,
}

/// A state previously stored with ***setFormValue***.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormState {
	Value(FormDataEntryValue),
	Entries(Vec<(String, FormDataEntryValue)>),
}

/// The surface of a form-associated custom element holding a `T`.
///
/// The lifecycle callbacks do nothing by default.
pub trait FormAssociated<T> {
	/// The form element type passed to [`FormAssociated::form_associated_callback`].
	type Form;

	fn disabled(&self) -> bool {
		false
	}

	fn readonly(&self) -> bool {
		false
	}

	fn required(&self) -> bool {
		false
	}

	fn label(&self) -> Option<&str> {
		None
	}

	fn name(&self) -> Option<&str> {
		None
	}

	fn value(&self) -> Option<&T>;

	/// The element was associated with `form`, or disassociated if `None`.
	fn form_associated_callback(&mut self, _form: Option<&Self::Form>) {}

	fn form_disabled_callback(&mut self, _disabled: bool) {}

	fn form_reset_callback(&mut self) {}

	fn form_state_restore_callback(&mut self, _state: Option<FormState>, _mode: RestoreMode) {}
}

/// Writes `form`'s entries into `existing`, as strings. Later entries with the same name win.
///
/// ```
/// use serde_json::json;
/// use web_component_utils::{dom::{memory::MemoryDom, Dom}, utils::form::apply_from_form_data};
///
/// let dom = MemoryDom::new();
/// let form = dom.create_element("form");
/// for (name, value) in [("name", "John"), ("age", "30")] {
/// 	let input = dom.create_element("input");
/// 	dom.set_attribute(&input, "name", name).unwrap();
/// 	dom.set_attribute(&input, "value", value).unwrap();
/// 	dom.append_child(form, input).unwrap();
/// }
///
/// let existing = json!({ "gender": "male", "name": "Peter" });
/// let existing = existing.as_object().cloned().unwrap();
/// let data = apply_from_form_data(&dom, &form, existing);
/// assert_eq!(serde_json::Value::Object(data), json!({ "gender": "male", "name": "John", "age": "30" }));
/// ```
pub fn apply_from_form_data<D: FormDom>(dom: &D, form: &D::Element, existing: Map<String, Value>) -> Map<String, Value> {
	apply_from_form_data_with(dom, form, existing, |_, value| Value::String(value.as_str().to_owned()))
}

/// Like [`apply_from_form_data`], but `intercept` decides the stored value for each entry.
pub fn apply_from_form_data_with<D: FormDom>(
	dom: &D,
	form: &D::Element,
	existing: Map<String, Value>,
	intercept: impl Fn(&str, &FormDataEntryValue) -> Value,
) -> Map<String, Value> {
	dom.form_data(form).into_iter().fold(existing, |mut data, (name, value)| {
		let value = intercept(&name, &value);
		data.insert(name, value);
		data
	})
}

/// Deserializes `form`'s entries (as strings) into a `T`.
///
/// # Errors
///
/// [`Error::FormData`](`crate::Error::FormData`) iff the entries don't deserialize into `T`.
pub fn form_data_into<T: DeserializeOwned, D: FormDom>(dom: &D, form: &D::Element) -> Result<T> {
	let data = apply_from_form_data(dom, form, Map::new());
	Ok(serde_json::from_value(Value::Object(data))?)
}

/// What activating a [`FormSubmitter`] does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormSubmitterType {
	/// Nothing.
	Button,
	#[default]
	Submit,
	Reset,
}

/// A custom element that submits or resets its form, like `<button>` does.
pub trait FormSubmitter {
	fn submitter_type(&self) -> FormSubmitterType;
	fn name(&self) -> String;
	fn value(&self) -> String;
}

/// Handles a click on a [`FormSubmitter`] `element`.
///
/// After waiting one task so that the click can finish propagating, this resets or submits `element`'s form,
/// unless the click's default action was prevented in the meantime. On submission, the submitter's value
/// becomes `element`'s form value and `element` is recorded as the submit event's submitter.
#[instrument(skip(dom, submitter, event))]
pub async fn submit_on_click<D: FormDom, S: FormSubmitter + ?Sized>(dom: &D, element: &D::Element, submitter: &S, event: &D::Event) {
	let submitter_type = submitter.submitter_type();
	if submitter_type == FormSubmitterType::Button {
		return;
	}
	let form = match dom.form_of(element) {
		Some(form) => form,
		None => {
			trace!("Submitter isn't in a form.");
			return;
		}
	};

	next_task().await;

	if event.default_prevented() {
		trace!("Click was canceled.");
		return;
	}

	let result = match submitter_type {
		FormSubmitterType::Button => Ok(()),
		FormSubmitterType::Reset => dom.reset_form(&form),
		FormSubmitterType::Submit => dom
			.set_form_value(element, &submitter.value())
			.and_then(|()| dom.request_submit(&form, element)),
	};
	if let Err(error) = result {
		error!("Could not {:?} form: {}", submitter_type, error);
	}
}

/// Wires [`submit_on_click`] to `element`'s clicks. The handler runs on the browser's task queue.
#[cfg(target_arch = "wasm32")]
pub fn setup_form_submitter<D: FormDom, S: FormSubmitter + 'static>(
	dom: &D,
	element: &D::Element,
	submitter: std::rc::Rc<S>,
) -> Result<D::Listener> {
	let handler_dom = dom.clone();
	let handler_element = element.clone();
	dom.add_event_listener(
		element,
		"click",
		crate::dom::ListenerOptions::new(),
		std::rc::Rc::new(move |event: &D::Event| {
			let (dom, element, submitter, event) = (handler_dom.clone(), handler_element.clone(), submitter.clone(), event.clone());
			wasm_bindgen_futures::spawn_local(async move { submit_on_click(&dom, &element, &*submitter, &event).await });
		}),
	)
}

/// Resolves after the current task, like `setTimeout(…, 0)`.
#[cfg(target_arch = "wasm32")]
fn next_task() -> impl Future<Output = ()> {
	gloo_timers::future::TimeoutFuture::new(0)
}

/// Resolves on the second poll, letting whatever else the executor runs go first.
#[cfg(not(target_arch = "wasm32"))]
fn next_task() -> impl Future<Output = ()> {
	YieldOnce(false)
}

#[cfg_attr(target_arch = "wasm32", allow(dead_code))]
struct YieldOnce(bool);
impl Future for YieldOnce {
	type Output = ();

	fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
		if self.0 {
			Poll::Ready(())
		} else {
			self.0 = true;
			cx.waker().wake_by_ref();
			Poll::Pending
		}
	}
}
