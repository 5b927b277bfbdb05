#![cfg(target_arch = "wasm32")]

use std::{cell::RefCell, rc::Rc, sync::Once};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_component_utils::{
	config::RouterConfig,
	history::{History, WebHistory},
	router::{NavigationChannel, SearchParamsHandling, ROUTER_NAVIGATE_EVENT},
};
use web_sys::{window, CustomEvent};

wasm_bindgen_test_configure!(run_in_browser);

static LOG_INIT: Once = Once::new();

#[wasm_bindgen_test]
fn navigation_is_announced_on_window() {
	LOG_INIT.call_once(tracing_wasm::set_as_global_default);
	let window = window().unwrap();

	let details = Rc::new(RefCell::new(Vec::new()));
	let listener = Closure::<dyn FnMut(web_sys::Event)>::new({
		let details = Rc::clone(&details);
		move |event: web_sys::Event| {
			let detail = event.dyn_into::<CustomEvent>().unwrap().detail();
			let path = js_sys::Reflect::get(&detail, &JsValue::from_str("path")).unwrap();
			details.borrow_mut().push(path.as_string().unwrap());
		}
	});
	window
		.add_event_listener_with_callback(ROUTER_NAVIGATE_EVENT, listener.as_ref().unchecked_ref())
		.unwrap();

	let channel = NavigationChannel::web(RouterConfig::default());
	channel.navigate("/web-router-test?a=1");
	assert_eq!(*details.borrow(), ["/web-router-test?a=1"]);
	assert_eq!(WebHistory.location().path(), "/web-router-test?a=1");

	window
		.remove_event_listener_with_callback(ROUTER_NAVIGATE_EVENT, listener.as_ref().unchecked_ref())
		.unwrap();
}

#[wasm_bindgen_test]
fn preserved_search_params_reach_the_browser() {
	LOG_INIT.call_once(tracing_wasm::set_as_global_default);

	let channel = NavigationChannel::web(RouterConfig::default());
	channel.navigate("/web-router-preserve?lang=en");
	channel.set_search_params_handling(SearchParamsHandling::Preserve);
	channel.navigate("/other?page=2");

	let location = WebHistory.location();
	assert_eq!(location.pathname, "/other");
	assert_eq!(location.search, "?lang=en&page=2");
}
