//! Session history, as far as navigation needs it.

use crate::{redact, Error, Result};
use core::cell::RefCell;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::rc::Rc;
use tracing::{instrument, trace};
use url::Url;

/// The parts of [***Location***](https://developer.mozilla.org/en-US/docs/Web/API/Location) navigation cares about.
///
/// `search` and `hash` include their leading `?`/`#` and are empty when absent, like in browsers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
	pub origin: String,
	pub pathname: String,
	pub search: String,
	pub hash: String,
}
impl Default for Location {
	fn default() -> Self {
		Self {
			origin: "null".to_owned(),
			pathname: "/".to_owned(),
			search: String::new(),
			hash: String::new(),
		}
	}
}
impl Location {
	pub fn parse(href: &str) -> Result<Self> {
		Url::parse(href)
			.map(|url| Self::from_url(&url))
			.map_err(|source| Error::InvalidUrl { input: href.to_owned(), source })
	}

	#[must_use]
	pub fn from_url(url: &Url) -> Self {
		Self {
			origin: url.origin().ascii_serialization(),
			pathname: url.path().to_owned(),
			search: url.query().filter(|query| !query.is_empty()).map(|query| format!("?{}", query)).unwrap_or_default(),
			hash: url.fragment().filter(|fragment| !fragment.is_empty()).map(|fragment| format!("#{}", fragment)).unwrap_or_default(),
		}
	}

	/// Pathname, search and hash, i.e. what is usually passed around as the "path" of a route.
	#[must_use]
	pub fn path(&self) -> String {
		format!("{}{}{}", self.pathname, self.search, self.hash)
	}

	#[must_use]
	pub fn href(&self) -> String {
		format!("{}{}", self.origin, self.path())
	}

	/// Resolves `path` against this location, like `new URL(path, location.href)`.
	pub fn join(&self, path: &str) -> Result<Url> {
		let href = self.href();
		Url::parse(&href)
			.and_then(|base| base.join(path))
			.map_err(|source| Error::InvalidUrl { input: path.to_owned(), source })
	}
}

/// [***History***](https://developer.mozilla.org/en-US/docs/Web/API/History)-like state stack.
///
/// `url` arguments may be relative and are resolved against the current location.
/// Cross-origin URLs are rejected, as in browsers.
pub trait History {
	fn location(&self) -> Location;
	fn push_state(&self, state: &Value, url: &str) -> Result<()>;
	fn replace_state(&self, state: &Value, url: &str) -> Result<()>;
}

impl<H: History + ?Sized> History for Rc<H> {
	fn location(&self) -> Location {
		(**self).location()
	}

	fn push_state(&self, state: &Value, url: &str) -> Result<()> {
		(**self).push_state(state, url)
	}

	fn replace_state(&self, state: &Value, url: &str) -> Result<()> {
		(**self).replace_state(state, url)
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
	pub location: Location,
	pub state: Value,
}

/// An in-memory history stack.
///
/// Clones share the same stack.
#[derive(Debug, Clone)]
pub struct MemoryHistory(Rc<RefCell<Stack>>);

#[derive(Debug)]
struct Stack {
	entries: Vec<HistoryEntry>,
	index: usize,
}

impl MemoryHistory {
	/// Starts a history with a single entry at `href`, which must be absolute.
	pub fn new(href: &str) -> Result<Self> {
		Ok(Self(Rc::new(RefCell::new(Stack {
			entries: vec![HistoryEntry {
				location: Location::parse(href)?,
				state: Value::Null,
			}],
			index: 0,
		}))))
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.0.borrow().entries.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.borrow().entries.is_empty()
	}

	#[must_use]
	pub fn entries(&self) -> Vec<HistoryEntry> {
		self.0.borrow().entries.clone()
	}

	/// The state of the current entry.
	#[must_use]
	pub fn state(&self) -> Value {
		let stack = self.0.borrow();
		stack.entries[stack.index].state.clone()
	}

	/// Steps back one entry. Returns whether that was possible.
	pub fn back(&self) -> bool {
		let mut stack = self.0.borrow_mut();
		if stack.index == 0 {
			return false;
		}
		stack.index -= 1;
		true
	}

	pub fn forward(&self) -> bool {
		let mut stack = self.0.borrow_mut();
		if stack.index + 1 >= stack.entries.len() {
			return false;
		}
		stack.index += 1;
		true
	}

	fn resolve(&self, url: &str) -> Result<Location> {
		let current = self.location();
		let next = Location::from_url(&current.join(url)?);
		if next.origin != current.origin {
			return Err(Error::History(format!("cross-origin URL {:?} is not allowed in this history", redact(url))));
		}
		Ok(next)
	}
}

impl History for MemoryHistory {
	fn location(&self) -> Location {
		let stack = self.0.borrow();
		stack.entries[stack.index].location.clone()
	}

	#[instrument(skip(self, state, url), fields(url = redact(url)))]
	fn push_state(&self, state: &Value, url: &str) -> Result<()> {
		let location = self.resolve(url)?;
		let mut stack = self.0.borrow_mut();
		let next = stack.index + 1;
		stack.entries.truncate(next);
		stack.entries.push(HistoryEntry {
			location,
			state: state.clone(),
		});
		stack.index = next;
		trace!("Pushed entry {}.", next);
		Ok(())
	}

	#[instrument(skip(self, state, url), fields(url = redact(url)))]
	fn replace_state(&self, state: &Value, url: &str) -> Result<()> {
		let location = self.resolve(url)?;
		let mut stack = self.0.borrow_mut();
		let index = stack.index;
		stack.entries[index] = HistoryEntry {
			location,
			state: state.clone(),
		};
		Ok(())
	}
}

#[cfg(target_arch = "wasm32")]
pub use web::WebHistory;

#[cfg(target_arch = "wasm32")]
mod web {
	use super::{History, Location};
	use crate::{Error, Result};
	use serde_json::Value;
	use tracing::error;
	use wasm_bindgen::JsValue;

	/// The browser's `window.history`.
	#[derive(Debug, Clone, Copy, Default)]
	pub struct WebHistory;

	fn history() -> Result<web_sys::History> {
		web_sys::window()
			.ok_or_else(|| Error::History("no `window`".to_owned()))?
			.history()
			.map_err(|error| Error::History(format!("{:?}", error)))
	}

	fn to_js(state: &Value) -> Result<JsValue> {
		js_sys::JSON::parse(&state.to_string()).map_err(|error| Error::History(format!("state is not serializable: {:?}", error)))
	}

	impl History for WebHistory {
		fn location(&self) -> Location {
			let href = web_sys::window().map(|window| window.location().href());
			match href {
				Some(Ok(href)) => Location::parse(&href).unwrap_or_else(|error| {
					error!("Could not parse the current location: {}", error);
					Location::default()
				}),
				Some(Err(error)) => {
					error!("Could not read the current location: {:?}", error);
					Location::default()
				}
				None => {
					error!("No `window` to read the location from.");
					Location::default()
				}
			}
		}

		fn push_state(&self, state: &Value, url: &str) -> Result<()> {
			history()?
				.push_state_with_url(&to_js(state)?, "", Some(url))
				.map_err(|error| Error::History(format!("{:?}", error)))
		}

		fn replace_state(&self, state: &Value, url: &str) -> Result<()> {
			history()?
				.replace_state_with_url(&to_js(state)?, "", Some(url))
				.map_err(|error| Error::History(format!("{:?}", error)))
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn location_parts_match_browser_conventions() {
		let location = Location::parse("https://example.com/foo.html?bar=1#top").unwrap();
		assert_eq!(location.origin, "https://example.com");
		assert_eq!(location.pathname, "/foo.html");
		assert_eq!(location.search, "?bar=1");
		assert_eq!(location.hash, "#top");
		assert_eq!(location.path(), "/foo.html?bar=1#top");

		let bare = Location::parse("https://example.com/?#").unwrap();
		assert_eq!(bare.search, "");
		assert_eq!(bare.hash, "");
	}

	#[test]
	fn push_truncates_forward_entries() {
		let history = MemoryHistory::new("https://example.com/").unwrap();
		history.push_state(&json!({ "path": "/a" }), "/a").unwrap();
		history.push_state(&json!({ "path": "/b" }), "/b").unwrap();
		assert!(history.back());
		history.push_state(&json!({ "path": "/c" }), "/c").unwrap();

		let paths: Vec<_> = history.entries().into_iter().map(|entry| entry.location.pathname).collect();
		assert_eq!(paths, ["/", "/a", "/c"]);
		assert!(!history.forward());
		assert_eq!(history.state(), json!({ "path": "/c" }));
	}

	#[test]
	fn replace_keeps_length() {
		let history = MemoryHistory::new("https://example.com/start").unwrap();
		history.replace_state(&json!(null), "other?x=1").unwrap();
		assert_eq!(history.len(), 1);
		assert_eq!(history.location().path(), "/other?x=1");
	}

	#[test]
	fn cross_origin_urls_are_rejected() {
		let history = MemoryHistory::new("https://example.com/").unwrap();
		assert!(matches!(history.push_state(&Value::Null, "https://evil.example/"), Err(Error::History(_))));
		assert_eq!(history.len(), 1);
	}
}
