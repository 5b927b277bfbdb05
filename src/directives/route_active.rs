//! Reflects whether the current location matches a route.
//!
//! Bound to a boolean attribute or property, the directive renders the match result, but only when it changed.
//! Bound to an element, it additionally toggles a class (`active` by default) on that element.

use crate::{
	directive::{Directive, Part, PartType, Rendered},
	dom::Dom,
	history::History,
	redact,
	router::{match_route, NavigationChannel, Route, UrlPattern},
	Result,
};
use core::fmt::{self, Debug, Formatter};
use tracing::{error, trace, warn};

/// The `route_active` directive. Its parameters are the route pattern and an optional class name.
pub struct RouteActive<D: Dom, H> {
	dom: D,
	channel: NavigationChannel<H>,
	element: Option<D::Element>,
	active: bool,
	/// The last route and its compiled pattern, `None` if it didn't compile.
	compiled: Option<(String, Option<UrlPattern>)>,
}

impl<D: Dom, H> Debug for RouteActive<D, H> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("RouteActive")
			.field("element", &self.element)
			.field("active", &self.active)
			.field("route", &self.compiled.as_ref().map(|(route, _)| route))
			.finish_non_exhaustive()
	}
}

impl<D: Dom, H: History> RouteActive<D, H> {
	/// # Errors
	///
	/// [`Error::InvalidPart`](`crate::Error::InvalidPart`) unless `part` is a boolean attribute, property or element part.
	pub fn new(dom: D, channel: NavigationChannel<H>, part: &Part<D::Element>) -> Result<Self> {
		part.expect_type(
			"route_active",
			&[PartType::Property, PartType::BooleanAttribute, PartType::Element],
			"use it with a boolean attribute or property to receive the result, or directly on the element to toggle a class",
		)?;
		Ok(Self {
			dom,
			channel,
			element: (part.part_type == PartType::Element).then(|| part.element.clone()),
			active: false,
			compiled: None,
		})
	}

	/// Whether the current pathname matches `route`. Invalid patterns never match.
	#[must_use]
	pub fn is_route_active(&self, route: &str) -> bool {
		compile(route).map_or(false, |pattern| self.matches(pattern))
	}

	fn matches(&self, pattern: UrlPattern) -> bool {
		let location = self.channel.location();
		match_route(&location.pathname, &Route::Pattern(pattern), &location.origin)
	}

	/// Compiles `route` unless it is the same as last time.
	fn compiled(&mut self, route: &str) -> Option<&UrlPattern> {
		if self.compiled.as_ref().map_or(true, |(compiled, _)| compiled != route) {
			self.compiled = Some((route.to_owned(), compile(route)));
		}
		self.compiled.as_ref().and_then(|(_, pattern)| pattern.as_ref())
	}
}

fn compile(route: &str) -> Option<UrlPattern> {
	UrlPattern::new(route)
		.map_err(|error| warn!("Treating route as inactive: {}", error))
		.ok()
}

impl<D: Dom, H: History> Directive for RouteActive<D, H> {
	type Element = D::Element;
	type Params = (String, Option<String>);
	type Output = bool;

	fn update(&mut self, _part: &Part<D::Element>, params: Self::Params, connected: bool) -> Rendered<bool> {
		let (route, class) = params;
		let pattern = self.compiled(&route).cloned();
		let active = pattern.map_or(false, |pattern| self.matches(pattern));

		if let (Some(element), true) = (&self.element, connected) {
			let class = class.as_deref().unwrap_or("active");
			if let Err(error) = self.dom.toggle_class(element, class, active) {
				error!("Could not toggle class `{}` on {:?}: {}", class, element, error);
			}
		}

		if active == self.active {
			return Rendered::NoChange;
		}
		trace!(route = redact(&route), active, "Route activity changed.");
		self.active = active;
		Rendered::Value(active)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		directive::Binding,
		dom::memory::{MemoryDom, NodeId},
		history::MemoryHistory,
		Error,
	};

	fn channel(href: &str) -> NavigationChannel<MemoryHistory> {
		NavigationChannel::new(MemoryHistory::new(href).unwrap())
	}

	fn bind(dom: &MemoryDom, channel: &NavigationChannel<MemoryHistory>, part: Part<NodeId>) -> Binding<RouteActive<MemoryDom, MemoryHistory>> {
		let directive = RouteActive::new(dom.clone(), channel.clone(), &part).unwrap();
		Binding::new(part, directive)
	}

	#[test]
	fn boolean_parts_receive_changes_only() {
		let dom = MemoryDom::new();
		let channel = channel("https://example.com/home");
		let button = dom.create_element("button");
		let mut binding = bind(&dom, &channel, Part::boolean_attribute(button, "disabled"));
		let params = || ("/home".to_owned(), None);

		assert_eq!(binding.render(params()), Rendered::Value(true));
		assert_eq!(binding.render(params()), Rendered::NoChange);

		channel.navigate("/elsewhere");
		assert_eq!(binding.render(params()), Rendered::Value(false));
		assert_eq!(binding.render(params()), Rendered::NoChange);
		assert!(!dom.has_class(&button, "active"));
	}

	#[test]
	fn inactive_first_render_is_no_change() {
		let dom = MemoryDom::new();
		let channel = channel("https://example.com/");
		let button = dom.create_element("button");
		let mut binding = bind(&dom, &channel, Part::property(button, "selected"));
		assert_eq!(binding.render(("/home".to_owned(), None)), Rendered::NoChange);
	}

	#[test]
	fn element_parts_toggle_the_class() {
		let dom = MemoryDom::new();
		let channel = channel("https://example.com/users/42?tab=posts");
		let anchor = dom.create_element("a");
		let mut binding = bind(&dom, &channel, Part::element(anchor));

		assert_eq!(binding.render(("/users/:id".to_owned(), Some("current".to_owned()))), Rendered::Value(true));
		assert!(dom.has_class(&anchor, "current"));

		channel.navigate("/users");
		binding.render(("/users/:id".to_owned(), Some("current".to_owned())));
		assert!(!dom.has_class(&anchor, "current"));
	}

	#[test]
	fn exact_routes_do_not_match_subpaths() {
		let dom = MemoryDom::new();
		let channel = channel("https://example.com/home/settings");
		let anchor = dom.create_element("a");
		let mut binding = bind(&dom, &channel, Part::element(anchor));

		assert_eq!(binding.render(("/home".to_owned(), None)), Rendered::NoChange);
		assert!(!dom.has_class(&anchor, "active"));
	}

	#[test]
	fn classes_are_left_alone_while_disconnected() {
		let dom = MemoryDom::new();
		let channel = channel("https://example.com/home");
		let anchor = dom.create_element("a");
		let mut binding = bind(&dom, &channel, Part::element(anchor));
		binding.set_connected(false);

		assert_eq!(binding.render(("/home".to_owned(), None)), Rendered::Value(true));
		assert!(!dom.has_class(&anchor, "active"));
	}

	#[test]
	fn invalid_patterns_are_inactive() {
		let dom = MemoryDom::new();
		let channel = channel("https://example.com/home");
		let anchor = dom.create_element("a");
		let mut binding = bind(&dom, &channel, Part::element(anchor));

		assert_eq!(binding.render(("/home/:".to_owned(), None)), Rendered::NoChange);
		assert!(!dom.has_class(&anchor, "active"));
	}

	#[test]
	fn routes_are_compiled_once_per_change() {
		let dom = MemoryDom::new();
		let channel = channel("https://example.com/home");
		let anchor = dom.create_element("a");
		let mut binding = bind(&dom, &channel, Part::element(anchor));

		let logs = crate::captured_logs::captured_logs(|| {
			for _ in 0..3 {
				binding.render(("/home/:".to_owned(), None));
			}
		});
		assert_eq!(logs.matches("Treating route as inactive").count(), 1, "{}", logs);

		assert_eq!(binding.render(("/home".to_owned(), None)), Rendered::Value(true));
		let cached = binding.directive().and_then(|directive| directive.compiled.as_ref()).map(|(route, _)| route.as_str());
		assert_eq!(cached, Some("/home"));

		channel.navigate("/away");
		assert_eq!(binding.render(("/home".to_owned(), None)), Rendered::Value(false));
	}

	#[test]
	fn other_parts_are_rejected_at_construction() {
		let dom = MemoryDom::new();
		let channel = channel("https://example.com/");
		let div = dom.create_element("div");

		for part in [Part::attribute(div, "title"), Part::child(div), Part::event(div, "click")] {
			assert!(matches!(
				RouteActive::new(dom.clone(), channel.clone(), &part),
				Err(Error::InvalidPart {
					directive: "route_active",
					..
				})
			));
		}
	}
}
