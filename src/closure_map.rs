//! Keeps event listener closures alive while they are registered with the browser.

use core::cell::{Cell, RefCell};
use hashbrown::HashMap;
use js_sys::Function;
use tracing::{trace, warn};
use wasm_bindgen::{closure::Closure, JsCast};

type ListenerClosure = Closure<dyn FnMut(web_sys::Event)>;

thread_local! {
	static CLOSURE_MAP: RefCell<HashMap<u64, ListenerClosure>> = RefCell::default();
	static NEXT_ID: Cell<u64> = Cell::new(0);
}

/// Stores `closure` and returns its key together with the JavaScript function to register.
pub(crate) fn publish(closure: ListenerClosure) -> (u64, Function) {
	let id = NEXT_ID.with(|next_id| {
		let id = next_id.get();
		next_id.set(id + 1);
		id
	});
	let function = closure.as_ref().unchecked_ref::<Function>().clone();
	CLOSURE_MAP.with(|closure_map| closure_map.borrow_mut().insert(id, closure));
	trace!(id, "Published closure.");
	(id, function)
}

/// Drops the closure stored under `id`.
///
/// The matching JavaScript function must not be called afterwards, so remove the listener first.
pub(crate) fn unpublish(id: u64) {
	let closure = CLOSURE_MAP.with(|closure_map| closure_map.borrow_mut().remove(&id));
	match closure {
		Some(closure) => {
			drop(closure);
			trace!(id, "Unpublished closure.");
		}
		None => warn!(id, "Tried to unpublish a closure that isn't published."),
	}
}

/// Looks up the JavaScript function published under `id`.
pub(crate) fn function(id: u64) -> Option<Function> {
	CLOSURE_MAP.with(|closure_map| closure_map.borrow().get(&id).map(|closure| closure.as_ref().unchecked_ref::<Function>().clone()))
}

pub(crate) fn len() -> usize {
	CLOSURE_MAP.with(|closure_map| closure_map.borrow().len())
}
