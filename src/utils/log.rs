//! A small console wrapper with inline `<code>` styling.
//!
//! ```
//! use web_component_utils::utils::log::{Console, CODE_STYLE, RESET_STYLE};
//!
//! let formatted = Console::f("Call <code>goto()</code> instead.");
//! assert_eq!(formatted.message, "Call %cgoto()%c instead.");
//! assert_eq!(formatted.styles, [CODE_STYLE, RESET_STYLE]);
//! assert_eq!(formatted.plain(), "Call goto() instead.");
//! ```

use tracing::Level;

pub const CODE_STYLE: &str = "font-family: monospace; color: #f4f4f4; background: #212121; padding: 2px 4px; border-radius: 4px;";
pub const RESET_STYLE: &str = "all: unset";

/// A console message with `%c` style markers and one style per marker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Formatted {
	pub message: String,
	pub styles: Vec<String>,
}
impl Formatted {
	/// The message without style markers.
	#[must_use]
	pub fn plain(&self) -> String {
		self.message.replace("%c", "")
	}

	/// `[message, styles…]`, as passed to `console.log`.
	#[must_use]
	pub fn into_args(self) -> Vec<String> {
		let mut args = Vec::with_capacity(1 + self.styles.len());
		args.push(self.message);
		args.extend(self.styles);
		args
	}
}
impl From<&str> for Formatted {
	fn from(message: &str) -> Self {
		message.to_owned().into()
	}
}
impl From<String> for Formatted {
	fn from(message: String) -> Self {
		Self { message, styles: Vec::new() }
	}
}

/// Where [`Console`] writes to.
pub trait ConsoleSink {
	fn write(&self, level: Level, message: &Formatted);
}

/// Emits [`tracing`] events without styling.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;
impl ConsoleSink for TracingSink {
	fn write(&self, level: Level, message: &Formatted) {
		let message = message.plain();
		match level {
			Level::ERROR => tracing::error!("{}", message),
			Level::WARN => tracing::warn!("{}", message),
			Level::INFO => tracing::info!("{}", message),
			Level::DEBUG => tracing::debug!("{}", message),
			Level::TRACE => tracing::trace!("{}", message),
		}
	}
}

/// Writes to the browser's console, with styles.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct WebConsoleSink;
#[cfg(target_arch = "wasm32")]
impl ConsoleSink for WebConsoleSink {
	fn write(&self, level: Level, message: &Formatted) {
		let args: js_sys::Array = message.clone().into_args().into_iter().map(wasm_bindgen::JsValue::from).collect();
		match level {
			Level::ERROR => web_sys::console::error(&args),
			Level::WARN => web_sys::console::warn(&args),
			Level::INFO => web_sys::console::info(&args),
			Level::DEBUG | Level::TRACE => web_sys::console::log(&args),
		}
	}
}

/// Console wrapper with a level filter.
///
/// [`Console::log`] writes at [`Level::DEBUG`].
#[derive(Debug, Clone)]
pub struct Console<S = TracingSink> {
	sink: S,
	max_level: Level,
}
impl Default for Console {
	fn default() -> Self {
		Self::new(TracingSink)
	}
}
impl Console {
	/// Replaces `<code>` and `</code>` in `template` with `%c` markers and collects the matching styles.
	#[must_use]
	pub fn f(template: &str) -> Formatted {
		const TAGS: [(&str, &str); 2] = [("<code>", CODE_STYLE), ("</code>", RESET_STYLE)];

		let mut formatted = Formatted::default();
		let mut rest = template;
		loop {
			let next = TAGS
				.iter()
				.filter_map(|&(tag, style)| rest.find(tag).map(|index| (index, tag, style)))
				.min_by_key(|&(index, ..)| index);
			match next {
				Some((index, tag, style)) => {
					formatted.message.push_str(&rest[..index]);
					formatted.message.push_str("%c");
					formatted.styles.push(style.to_owned());
					rest = &rest[index + tag.len()..];
				}
				None => {
					formatted.message.push_str(rest);
					return formatted;
				}
			}
		}
	}
}
impl<S: ConsoleSink> Console<S> {
	pub fn new(sink: S) -> Self {
		Self { sink, max_level: Level::TRACE }
	}

	/// Drops messages more verbose than `max_level`.
	#[must_use]
	pub fn with_max_level(self, max_level: Level) -> Self {
		Self { max_level, ..self }
	}

	#[must_use]
	pub fn max_level(&self) -> Level {
		self.max_level
	}

	#[must_use]
	pub fn sink(&self) -> &S {
		&self.sink
	}

	pub fn error(&self, message: impl Into<Formatted>) {
		self.write(Level::ERROR, message.into());
	}

	pub fn warn(&self, message: impl Into<Formatted>) {
		self.write(Level::WARN, message.into());
	}

	pub fn info(&self, message: impl Into<Formatted>) {
		self.write(Level::INFO, message.into());
	}

	pub fn log(&self, message: impl Into<Formatted>) {
		self.write(Level::DEBUG, message.into());
	}

	fn write(&self, level: Level, message: Formatted) {
		if level <= self.max_level {
			self.sink.write(level, &message);
		}
	}
}
