//! Client-side navigation.
//!
//! [`NavigationChannel`] wraps a [`History`] and broadcasts every navigation it performs to its subscribers,
//! synchronously and in subscription order, before [`navigate`](`NavigationChannel::navigate`) returns.
//! Routers [`connect`](`NavigationChannel::connect`) to it instead of relying on ***popstate***,
//! which doesn't fire for programmatic history changes.
//!
//! ```
//! use web_component_utils::{history::MemoryHistory, router::{NavigationChannel, SearchParamsHandling}};
//! use std::{cell::RefCell, rc::Rc};
//!
//! let channel = NavigationChannel::new(MemoryHistory::new("https://example.com/?foo=bar").unwrap());
//! channel.set_search_params_handling(SearchParamsHandling::Preserve);
//!
//! let visited = Rc::new(RefCell::new(Vec::new()));
//! channel.connect({
//! 	let visited = Rc::clone(&visited);
//! 	move |path: &str| visited.borrow_mut().push(path.to_owned())
//! });
//!
//! channel.navigate("/foo.html?bar=123");
//! assert_eq!(*visited.borrow(), ["/foo.html?foo=bar&bar=123"]);
//! assert_eq!(channel.current_path(), "/foo.html?foo=bar&bar=123");
//! ```

mod pattern;

pub use pattern::{UrlPattern, UrlPatternResult};

use crate::{
	config::RouterConfig,
	history::{History, Location},
	redact, Error, Result,
};
use core::{
	cell::{Cell, RefCell},
	fmt::{self, Debug, Display, Formatter},
	str::FromStr,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::rc::{Rc, Weak};
use thiserror::Error;
use tracing::{error, instrument, trace, trace_span, warn};
use url::{form_urlencoded, Url};

/// The name of the [***CustomEvent***](https://developer.mozilla.org/en-US/docs/Web/API/CustomEvent)
/// a web-backed channel dispatches on `window` for each navigation.
pub const ROUTER_NAVIGATE_EVENT: &str = "router:navigate";

/// A navigation intent, as broadcast to subscribers and stored as history state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NavigateEvent {
	pub path: String,
}
impl NavigateEvent {
	#[must_use]
	pub fn to_state(&self) -> Value {
		json!({ "path": self.path })
	}
}

/// How the current location's query is treated when navigating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchParamsHandling {
	/// Navigate to the given path verbatim.
	#[default]
	Replace,
	/// Keep the current query parameters, letting the target's parameters override them.
	Preserve,
}
impl SearchParamsHandling {
	#[must_use]
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Replace => "replace",
			Self::Preserve => "preserve",
		}
	}
}
impl Display for SearchParamsHandling {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Error)]
#[error("unknown search params handling {0:?}, expected `replace` or `preserve`")]
pub struct ParseSearchParamsHandlingError(String);

impl FromStr for SearchParamsHandling {
	type Err = ParseSearchParamsHandlingError;

	fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
		match s {
			"replace" => Ok(Self::Replace),
			"preserve" => Ok(Self::Preserve),
			other => Err(ParseSearchParamsHandlingError(other.to_owned())),
		}
	}
}

/// Anything that can be navigated to.
///
/// [`Url`]s are reduced to their pathname, search and hash first.
pub trait IntoPath {
	fn into_path(self) -> String;
}
impl IntoPath for &str {
	fn into_path(self) -> String {
		self.to_owned()
	}
}
impl IntoPath for String {
	fn into_path(self) -> String {
		self
	}
}
impl IntoPath for &String {
	fn into_path(self) -> String {
		self.clone()
	}
}
impl IntoPath for &Url {
	fn into_path(self) -> String {
		Location::from_url(self).path()
	}
}
impl IntoPath for Url {
	fn into_path(self) -> String {
		(&self).into_path()
	}
}

/// A router that can be [`connect`](`NavigationChannel::connect`)ed to a [`NavigationChannel`].
pub trait Navigator {
	fn goto(&self, path: &str);
}
impl<F: Fn(&str)> Navigator for F {
	fn goto(&self, path: &str) {
		self(path);
	}
}

type Listener = Rc<dyn Fn(&NavigateEvent)>;

#[derive(Default)]
struct Subscribers {
	next_id: Cell<u64>,
	listeners: RefCell<Vec<(u64, Listener)>>,
}

/// Returned by [`NavigationChannel::subscribe`].
///
/// Dropping this handle does **not** unsubscribe, same as with ***addEventListener***.
#[derive(Debug)]
#[must_use = "a subscription can only be cancelled through its handle"]
pub struct Subscription {
	subscribers: Weak<Subscribers>,
	id: u64,
}
impl Subscription {
	pub fn unsubscribe(self) {
		if let Some(subscribers) = self.subscribers.upgrade() {
			subscribers.listeners.borrow_mut().retain(|(id, _)| *id != self.id);
		}
	}

	#[must_use]
	pub fn is_active(&self) -> bool {
		self.subscribers
			.upgrade()
			.map_or(false, |subscribers| subscribers.listeners.borrow().iter().any(|(id, _)| *id == self.id))
	}
}

struct Inner<H> {
	history: H,
	search_params_handling: Cell<SearchParamsHandling>,
	redirect_param: String,
	subscribers: Rc<Subscribers>,
	window_events: bool,
}

/// A handle to a navigation bus over a [`History`]. Clones share the same bus.
pub struct NavigationChannel<H>(Rc<Inner<H>>);
impl<H> Clone for NavigationChannel<H> {
	fn clone(&self) -> Self {
		Self(Rc::clone(&self.0))
	}
}
impl<H: Debug> Debug for NavigationChannel<H> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("NavigationChannel")
			.field("history", &self.0.history)
			.field("search_params_handling", &self.0.search_params_handling.get())
			.field("redirect_param", &self.0.redirect_param)
			.field("subscriber_count", &self.0.subscribers.listeners.borrow().len())
			.finish()
	}
}

impl<H: History> NavigationChannel<H> {
	#[must_use]
	pub fn new(history: H) -> Self {
		Self::with_config(history, RouterConfig::default())
	}

	#[must_use]
	pub fn with_config(history: H, config: RouterConfig) -> Self {
		Self::build(history, config, false)
	}

	fn build(history: H, config: RouterConfig, window_events: bool) -> Self {
		Self(Rc::new(Inner {
			history,
			search_params_handling: Cell::new(config.search_params_handling),
			redirect_param: config.redirect_param,
			subscribers: Rc::default(),
			window_events,
		}))
	}

	#[must_use]
	pub fn history(&self) -> &H {
		&self.0.history
	}

	/// Sets the strategy [`navigate`](`NavigationChannel::navigate`) and [`redirect`](`NavigationChannel::redirect`) use from now on.
	pub fn set_search_params_handling(&self, strategy: SearchParamsHandling) {
		trace!(%strategy, "Setting search params handling.");
		self.0.search_params_handling.set(strategy);
	}

	#[must_use]
	pub fn search_params_handling(&self) -> SearchParamsHandling {
		self.0.search_params_handling.get()
	}

	#[must_use]
	pub fn location(&self) -> Location {
		self.0.history.location()
	}

	/// The current pathname, search and hash.
	#[must_use]
	pub fn current_path(&self) -> String {
		self.location().path()
	}

	/// Applies `strategy` to `path`.
	///
	/// With [`SearchParamsHandling::Preserve`], the result is the target's pathname followed by the merged query.
	/// The target's hash is dropped. If the target can't be resolved, it is returned verbatim.
	#[must_use]
	pub fn handle_search_params(&self, path: impl IntoPath, strategy: SearchParamsHandling) -> String {
		let path = path.into_path();
		match strategy {
			SearchParamsHandling::Replace => path,
			SearchParamsHandling::Preserve => merge_search_params(&self.location(), &path).unwrap_or_else(|error| {
				warn!("Could not merge search params into {:?}: {}", redact(&path), error);
				path
			}),
		}
	}

	/// Applies the current strategy to `path`.
	#[must_use]
	pub fn effective_path(&self, path: impl IntoPath) -> String {
		self.handle_search_params(path, self.search_params_handling())
	}

	/// Pushes a history entry for `path` and notifies all subscribers.
	#[instrument(skip(self, path))]
	pub fn navigate(&self, path: impl IntoPath) {
		let event = NavigateEvent {
			path: self.effective_path(path),
		};
		if let Err(error) = self.0.history.push_state(&event.to_state(), &event.path) {
			error!("Could not push {:?}: {}", redact(&event.path), error);
			return;
		}
		self.broadcast(&event);
	}

	/// Replaces the current history entry with `to` and notifies all subscribers.
	///
	/// A non-empty `from_path` is stored in the query parameter `param_name`,
	/// which defaults to the configured [`RouterConfig::redirect_param`].
	///
	/// Always returns `false`, so route guards can `return channel.redirect(…)` to cancel their navigation.
	#[instrument(skip(self, to, from_path))]
	pub fn redirect(&self, to: impl IntoPath, from_path: Option<&str>, param_name: Option<&str>) -> bool {
		let target = self.effective_path(to);
		let path = match resolve(&self.location().origin, &target) {
			Ok(mut url) => {
				if let Some(from_path) = from_path.filter(|from_path| !from_path.is_empty()) {
					let mut params: Vec<(String, String)> = url.query_pairs().into_owned().collect();
					set_param(&mut params, param_name.unwrap_or(&self.0.redirect_param), from_path);
					url.set_query(Some(&serialize_query(&params)));
				}
				url.into_path()
			}
			Err(error) => {
				warn!("Could not resolve redirect target {:?}: {}", redact(&target), error);
				target
			}
		};

		let event = NavigateEvent { path };
		if let Err(error) = self.0.history.replace_state(&event.to_state(), &event.path) {
			error!("Could not replace the current entry with {:?}: {}", redact(&event.path), error);
			return false;
		}
		self.broadcast(&event);
		false
	}

	/// Calls `listener` with each subsequent navigation.
	pub fn subscribe(&self, listener: impl Fn(&NavigateEvent) + 'static) -> Subscription {
		let subscribers = &self.0.subscribers;
		let id = subscribers.next_id.get();
		subscribers.next_id.set(id + 1);
		subscribers.listeners.borrow_mut().push((id, Rc::new(listener)));
		Subscription {
			subscribers: Rc::downgrade(subscribers),
			id,
		}
	}

	/// Funnels each subsequent navigation into `router`.
	pub fn connect(&self, router: impl Navigator + 'static) -> Subscription {
		self.subscribe(move |event| router.goto(&event.path))
	}

	#[must_use]
	pub fn subscriber_count(&self) -> usize {
		self.0.subscribers.listeners.borrow().len()
	}

	fn broadcast(&self, event: &NavigateEvent) {
		let span = trace_span!("broadcast", path = redact(&event.path));
		let _enter = span.enter();

		// Listeners may subscribe, unsubscribe or navigate again while this runs.
		let snapshot = self.0.subscribers.listeners.borrow().clone();
		for (id, listener) in snapshot {
			let subscribed = self.0.subscribers.listeners.borrow().iter().any(|(subscribed, _)| *subscribed == id);
			if subscribed {
				listener(event);
			}
		}

		if self.0.window_events {
			#[cfg(target_arch = "wasm32")]
			if let Err(error) = web::dispatch_window_event(event) {
				error!("Could not dispatch `{}` on `window`: {}", ROUTER_NAVIGATE_EVENT, error);
			}
		}
	}
}

#[cfg(target_arch = "wasm32")]
impl NavigationChannel<crate::history::WebHistory> {
	/// A channel over `window.history` that additionally dispatches each navigation as
	/// `CustomEvent("router:navigate", { detail: { path } })` on `window`.
	#[must_use]
	pub fn web(config: RouterConfig) -> Self {
		Self::build(crate::history::WebHistory, config, true)
	}
}

#[cfg(target_arch = "wasm32")]
mod web {
	use super::{NavigateEvent, ROUTER_NAVIGATE_EVENT};
	use crate::{Error, Result};
	use wasm_bindgen::JsValue;

	pub(super) fn dispatch_window_event(event: &NavigateEvent) -> Result<()> {
		let window = web_sys::window().ok_or_else(|| Error::Dom("no `window`".to_owned()))?;
		let detail = js_sys::Object::new();
		js_sys::Reflect::set(&detail, &JsValue::from_str("path"), &JsValue::from_str(&event.path)).map_err(|error| Error::Dom(format!("{:?}", error)))?;

		let init = web_sys::CustomEventInit::new();
		init.set_detail(&detail);
		let event = web_sys::CustomEvent::new_with_event_init_dict(ROUTER_NAVIGATE_EVENT, &init).map_err(|error| Error::Dom(format!("{:?}", error)))?;
		window.dispatch_event(&event).map_err(|error| Error::Dom(format!("{:?}", error)))?;
		Ok(())
	}
}

/// A route as understood by [`match_route`].
#[derive(Debug, Clone)]
pub enum Route {
	/// Matches paths equal to `path` if `exact`, otherwise paths starting with it.
	///
	/// Prefix matching doesn't respect segment boundaries (`/foo` matches `/fooooo`) and compares queries textually.
	Literal { path: String, exact: bool },
	Pattern(UrlPattern),
}

/// Whether `current_path`, resolved against `origin`, matches `route`.
#[must_use]
pub fn match_route(current_path: &str, route: &Route, origin: &str) -> bool {
	match route {
		Route::Literal { path, exact: true } => current_path == path,
		Route::Literal { path, exact: false } => current_path.starts_with(path.as_str()),
		Route::Pattern(pattern) => match resolve(origin, current_path) {
			Ok(url) => pattern.test(&url),
			Err(error) => {
				warn!("Could not resolve {:?} for route matching: {}", redact(current_path), error);
				false
			}
		},
	}
}

/// Resolves `path` against `origin`, like `new URL(path, origin)`.
fn resolve(origin: &str, path: &str) -> Result<Url> {
	Url::parse(origin)
		.and_then(|base| base.join(path))
		.map_err(|source| Error::InvalidUrl { input: path.to_owned(), source })
}

/// Merges `location`'s query with `path`'s, the latter taking precedence.
///
/// Returns `path`'s pathname followed by the merged query, if any.
pub fn merge_search_params(location: &Location, path: &str) -> Result<String> {
	let search = location.search.strip_prefix('?').unwrap_or(&location.search);
	let mut params: Vec<(String, String)> = form_urlencoded::parse(search.as_bytes()).into_owned().collect();

	let url = resolve(&location.origin, path)?;
	for (key, value) in url.query_pairs() {
		set_param(&mut params, &key, &value);
	}

	let query = serialize_query(&params);
	Ok(if query.is_empty() {
		url.path().to_owned()
	} else {
		format!("{}?{}", url.path(), query)
	})
}

/// [***URLSearchParams.set***](https://developer.mozilla.org/en-US/docs/Web/API/URLSearchParams/set):
/// replaces the first entry with `key` in place and drops the others, or appends.
fn set_param(params: &mut Vec<(String, String)>, key: &str, value: &str) {
	let mut found = false;
	params.retain_mut(|(k, v)| {
		if k != key {
			return true;
		}
		if found {
			return false;
		}
		found = true;
		value.clone_into(v);
		true
	});
	if !found {
		params.push((key.to_owned(), value.to_owned()));
	}
}

fn serialize_query(params: &[(String, String)]) -> String {
	form_urlencoded::Serializer::new(String::new()).extend_pairs(params).finish()
}
