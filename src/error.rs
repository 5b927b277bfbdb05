use crate::directive::PartType;
use thiserror::Error;

/// Errors raised by this crate.
///
/// Only [`Error::InvalidPart`] is ever surfaced to callers of the directives.
/// The remaining variants come from the DOM and history backends and are
/// usually logged and discarded, since all DOM mutations are best effort.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
	/// A directive was attached to a template position it can't operate on.
	#[error("the `{directive}` directive can't be bound to {part_type:?} parts: {usage}")]
	InvalidPart {
		directive: &'static str,
		part_type: PartType,
		usage: &'static str,
	},

	/// The input is redacted from the message unless the `dangerous-logging` feature is enabled.
	#[error("invalid URL {:?}: {source}", crate::redact(.input))]
	InvalidUrl {
		input: String,
		#[source]
		source: url::ParseError,
	},

	#[error("invalid URL pattern {pattern:?}: {reason}")]
	InvalidPattern { pattern: String, reason: String },

	/// The history backend refused a state change.
	#[error("history operation failed: {0}")]
	History(String),

	/// A DOM call threw or referenced a missing node.
	#[error("DOM operation failed: {0}")]
	Dom(String),

	/// Form data didn't fit the requested type.
	#[error("form data doesn't match the expected shape: {0}")]
	FormData(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, Error>;

