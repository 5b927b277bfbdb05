#![doc(html_root_url = "https://docs.rs/web-component-utils/0.0.1")]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Helpers for building web components: attribute converters, reactive directives
//! ([`link`](`directives::link`), [`route_active`](`directives::route_active`), [`slot_filled`](`directives::slot_filled`)),
//! a client-side [navigation channel](`router::NavigationChannel`) and small date, form and console utilities.
//!
//! Everything operates on the [`dom::Dom`] and [`history::History`] abstractions.
//! In the browser, use [`dom::web::WebDom`] and [`history::WebHistory`] (`wasm32` only).
//! Elsewhere, [`dom::memory::MemoryDom`] and [`history::MemoryHistory`] stand in.
//!
//! # Logging
//!
//! This crate logs through [`tracing`]. Paths, query strings and attribute values can contain personal data,
//! so they are redacted from log messages unless the `dangerous-logging` feature is enabled.

#[cfg(target_arch = "wasm32")]
mod closure_map;

pub mod config;
pub mod converters;
pub mod directive;
pub mod directives;
pub mod dom;
mod error;
pub mod history;
pub mod router;
pub mod utils;

pub use error::{Error, Result};

#[cfg(test)]
mod captured_logs;

/// Replaces `value` with a placeholder unless the `dangerous-logging` feature is enabled.
pub(crate) fn redact(value: &str) -> &str {
	if cfg!(feature = "dangerous-logging") {
		value
	} else {
		"<redacted>"
	}
}
