//! Turns an element into a link to a client-side route.
//!
//! Anchors get an `href`, so hovering, copying and opening in a new tab keep working.
//! Any other element gets `data-href` and an ARIA `role` (`link` unless overridden).
//! Unless [`LinkOptions::native`] is set, clicks are intercepted in the capture phase and turned into a
//! [`NavigationChannel::navigate`] call instead of a page load.

use crate::{
	directive::{Directive, Part, PartType, Rendered},
	dom::{Dom, DomEvent, EventHandler, ListenerOptions},
	history::History,
	redact,
	router::NavigationChannel,
	Result,
};
use core::fmt::{self, Debug, Formatter};
use std::rc::Rc;
use tracing::{error, trace};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkOptions {
	/// The ARIA role of non-anchor elements. Defaults to `link`.
	pub role: Option<String>,
	/// Leave clicks to the browser.
	pub native: bool,
}
impl LinkOptions {
	#[must_use]
	pub fn with_role(self, role: &str) -> Self {
		Self {
			role: Some(role.to_owned()),
			..self
		}
	}

	#[must_use]
	pub fn with_native(self, native: bool) -> Self {
		Self { native, ..self }
	}
}

/// The `link` directive. Its parameters are the target path (`None` does nothing) and [`LinkOptions`].
pub struct Link<D: Dom, H> {
	dom: D,
	channel: NavigationChannel<H>,
	path: Option<String>,
	options: LinkOptions,
	element: Option<D::Element>,
	applied: Option<Applied<D>>,
}

/// The effects currently in place, so they can be undone exactly.
struct Applied<D: Dom> {
	element: D::Element,
	attributes: Vec<(&'static str, String)>,
	listener: Option<D::Listener>,
}

impl<D: Dom, H> Debug for Link<D, H> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Link")
			.field("path", &self.path.as_deref().map(redact))
			.field("options", &self.options)
			.field("element", &self.element)
			.field("applied", &self.applied.is_some())
			.finish_non_exhaustive()
	}
}

impl<D: Dom, H: History + 'static> Link<D, H> {
	/// # Errors
	///
	/// [`Error::InvalidPart`](`crate::Error::InvalidPart`) unless `part` is an element part.
	pub fn new(dom: D, channel: NavigationChannel<H>, part: &Part<D::Element>) -> Result<Self> {
		part.expect_type("link", &[PartType::Element], "bind it to the element that should navigate, as in `<a ${link(…)}>`")?;
		Ok(Self {
			dom,
			channel,
			path: None,
			options: LinkOptions::default(),
			element: None,
			applied: None,
		})
	}

	fn apply(&mut self) {
		if self.applied.is_some() {
			return;
		}
		let (path, element) = match (&self.path, &self.element) {
			(Some(path), Some(element)) => (path.clone(), element.clone()),
			_ => return,
		};

		let attributes = if self.dom.is_anchor(&element) {
			vec![("href", path.clone())]
		} else {
			vec![
				("data-href", path.clone()),
				("role", self.options.role.clone().unwrap_or_else(|| "link".to_owned())),
			]
		};
		for (name, value) in &attributes {
			if let Err(error) = self.dom.set_attribute(&element, name, value) {
				error!("Could not set `{}` on {:?}: {}", name, element, error);
			}
		}

		let listener = if self.options.native {
			None
		} else {
			let channel = self.channel.clone();
			let handler: EventHandler<D> = Rc::new(move |event: &D::Event| {
				event.prevent_default();
				channel.navigate(path.as_str());
			});
			match self.dom.add_event_listener(&element, "click", ListenerOptions::new().with_capture(true), handler) {
				Ok(listener) => Some(listener),
				Err(error) => {
					error!("Could not intercept clicks on {:?}: {}", element, error);
					None
				}
			}
		};

		trace!("Applied link.");
		self.applied = Some(Applied {
			element,
			attributes,
			listener,
		});
	}

	fn remove(&mut self) {
		let applied = match self.applied.take() {
			Some(applied) => applied,
			None => return,
		};

		for (name, value) in &applied.attributes {
			// Leave the attribute alone if someone else has written it since.
			if self.dom.get_attribute(&applied.element, name).as_deref() != Some(value.as_str()) {
				continue;
			}
			if let Err(error) = self.dom.remove_attribute(&applied.element, name) {
				error!("Could not remove `{}` from {:?}: {}", name, applied.element, error);
			}
		}
		if let Some(listener) = applied.listener {
			if let Err(error) = self.dom.remove_event_listener(listener) {
				error!("Could not remove click listener: {}", error);
			}
		}
		trace!("Removed link.");
	}
}

impl<D: Dom, H: History + 'static> Directive for Link<D, H> {
	type Element = D::Element;
	type Params = (Option<String>, LinkOptions);
	type Output = ();

	fn update(&mut self, part: &Part<D::Element>, params: Self::Params, connected: bool) -> Rendered<()> {
		let (path, options) = params;
		if path != self.path || options != self.options || self.element.as_ref() != Some(&part.element) {
			trace!(path = ?path.as_deref().map(redact), ?options, "Link changed.");
			self.remove();
			self.path = path;
			self.options = options;
			self.element = Some(part.element.clone());
		}
		if connected {
			self.apply();
		}
		Rendered::Nothing
	}

	fn disconnected(&mut self) {
		self.remove();
	}

	fn reconnected(&mut self) {
		self.apply();
	}
}
