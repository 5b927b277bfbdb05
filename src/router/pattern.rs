//! A subset of [***URLPattern***](https://developer.mozilla.org/en-US/docs/Web/API/URL_Pattern_API), compiled to [`regex`].
//!
//! Supported per component (pathname, search, hash):
//!
//! - literal text, with `\` escaping the next character,
//! - named groups `:name`, optionally with a custom regex `:name(\d+)`,
//! - unnamed regex groups `(…)` and the wildcard `*`, numbered from `0` in order of appearance,
//! - non-capturing groups `{…}`,
//! - the modifiers `?`, `+` and `*` after any group.
//!
//! In the pathname, a `/` right before a modified group belongs to that group, so `/users/:id?` matches `/users`.
//! A pattern without `?search` or `#hash` part matches any search or hash.
//! An absolute pattern (`https://host/path`) additionally requires the exact origin.

use crate::{Error, Result};
use core::str::FromStr;
use hashbrown::HashMap;
use regex::Regex;
use url::Url;

#[derive(Debug, Clone)]
pub struct UrlPattern {
	source: String,
	origin: Option<String>,
	pathname: Component,
	search: Option<Component>,
	hash: Option<Component>,
}

/// Captured groups per component, keyed by group name (or index for unnamed groups).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlPatternResult {
	pub pathname: HashMap<String, String>,
	pub search: HashMap<String, String>,
	pub hash: HashMap<String, String>,
}

#[derive(Debug, Clone)]
struct Component {
	regex: Regex,
	/// (regex group name, public name)
	groups: Vec<(String, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Modifier {
	None,
	Optional,
	OneOrMore,
	ZeroOrMore,
}

#[derive(Debug)]
enum Part {
	Fixed(String),
	Group {
		name: Option<String>,
		regex: String,
		modifier: Modifier,
		prefix: String,
		suffix: String,
	},
}

impl UrlPattern {
	pub fn new(pattern: &str) -> Result<Self> {
		let invalid = |reason: String| Error::InvalidPattern {
			pattern: pattern.to_owned(),
			reason,
		};

		let (origin, rest) = split_origin(pattern);
		let (pathname, search, hash) = split_components(rest).map_err(invalid)?;
		let pathname = if pathname.is_empty() { "/" } else { pathname };

		Ok(Self {
			source: pattern.to_owned(),
			origin: origin.map(|origin| origin.trim_end_matches('/').to_owned()),
			pathname: Component::compile(pathname, "[^/]+?", Some('/')).map_err(invalid)?,
			search: search.map(|search| Component::compile(search, ".+?", None)).transpose().map_err(invalid)?,
			hash: hash.map(|hash| Component::compile(hash, ".+?", None)).transpose().map_err(invalid)?,
		})
	}

	#[must_use]
	pub fn as_str(&self) -> &str {
		&self.source
	}

	#[must_use]
	pub fn test(&self, url: &Url) -> bool {
		self.exec(url).is_some()
	}

	/// Matches `url` and returns the captured groups.
	#[must_use]
	pub fn exec(&self, url: &Url) -> Option<UrlPatternResult> {
		if let Some(origin) = &self.origin {
			if *origin != url.origin().ascii_serialization() {
				return None;
			}
		}

		let pathname = self.pathname.exec(url.path())?;
		let search = match &self.search {
			Some(search) => search.exec(url.query().unwrap_or(""))?,
			None => HashMap::new(),
		};
		let hash = match &self.hash {
			Some(hash) => hash.exec(url.fragment().unwrap_or(""))?,
			None => HashMap::new(),
		};
		Some(UrlPatternResult { pathname, search, hash })
	}
}

impl FromStr for UrlPattern {
	type Err = Error;

	fn from_str(pattern: &str) -> Result<Self> {
		Self::new(pattern)
	}
}

fn split_origin(pattern: &str) -> (Option<&str>, &str) {
	match pattern.find("://") {
		Some(scheme_end) if pattern[..scheme_end].chars().all(|c| c.is_ascii_alphanumeric() || "+-.".contains(c)) && scheme_end > 0 => {
			let authority = scheme_end + 3;
			match pattern[authority..].find(|c: char| c == '/' || c == '?' || c == '#') {
				Some(path_start) => (Some(&pattern[..authority + path_start]), &pattern[authority + path_start..]),
				None => (Some(pattern), ""),
			}
		}
		_ => (None, pattern),
	}
}

/// Splits at the first `?` that isn't a modifier and the first `#`, ignoring escaped characters and regex groups.
fn split_components(pattern: &str) -> core::result::Result<(&str, Option<&str>, Option<&str>), String> {
	let mut search_start = None;
	let mut hash_start = None;
	let mut after_group = false;
	let mut chars = pattern.char_indices().peekable();

	while let Some((i, c)) = chars.next() {
		match c {
			'\\' => {
				chars.next();
				after_group = false;
			}
			'(' => {
				skip_regex(&mut chars)?;
				after_group = true;
			}
			':' => {
				while chars.peek().map_or(false, |&(_, c)| is_name_char(c)) {
					chars.next();
				}
				after_group = true;
			}
			'*' | '}' => after_group = true,
			'?' if after_group => after_group = false,
			'?' if search_start.is_none() && hash_start.is_none() => {
				search_start = Some(i);
				after_group = false;
			}
			'#' if hash_start.is_none() => {
				hash_start = Some(i);
				after_group = false;
			}
			_ => after_group = false,
		}
	}

	let path_end = search_start.or(hash_start).unwrap_or(pattern.len());
	let search = search_start.map(|start| &pattern[start + 1..hash_start.unwrap_or(pattern.len())]);
	let hash = hash_start.map(|start| &pattern[start + 1..]);
	Ok((&pattern[..path_end], search, hash))
}

fn skip_regex(chars: &mut core::iter::Peekable<core::str::CharIndices<'_>>) -> core::result::Result<String, String> {
	let mut depth = 1;
	let mut regex = String::new();
	while let Some((_, c)) = chars.next() {
		match c {
			'\\' => {
				regex.push(c);
				if let Some((_, escaped)) = chars.next() {
					regex.push(escaped);
				}
				continue;
			}
			'(' => depth += 1,
			')' => {
				depth -= 1;
				if depth == 0 {
					return Ok(regex);
				}
			}
			_ => (),
		}
		regex.push(c);
	}
	Err("unterminated regex group".to_owned())
}

fn is_name_start(c: char) -> bool {
	c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_name_char(c: char) -> bool {
	is_name_start(c) || c.is_ascii_digit()
}

impl Component {
	fn compile(source: &str, segment: &str, delimiter: Option<char>) -> core::result::Result<Self, String> {
		let parts = parse(source, segment, delimiter)?;

		let mut groups = Vec::new();
		let mut expression = String::from("^");
		for part in parts {
			match part {
				Part::Fixed(text) => expression.push_str(&regex::escape(&text)),
				Part::Group {
					name,
					regex,
					modifier,
					prefix,
					suffix,
				} => {
					let open = match &name {
						Some(name) => {
							let regex_name = format!("g{}", groups.len());
							let open = format!("(?P<{}>", regex_name);
							groups.push((regex_name, name.clone()));
							open
						}
						None => "(?:".to_owned(),
					};
					let (prefix, suffix) = (regex::escape(&prefix), regex::escape(&suffix));
					let group = match modifier {
						Modifier::None => format!("{}{}{}){}", prefix, open, regex, suffix),
						Modifier::Optional => format!("(?:{}{}{}){})?", prefix, open, regex, suffix),
						Modifier::OneOrMore => format!("{p}{o}(?:{r})(?:{s}{p}(?:{r}))*){s}", p = prefix, o = open, r = regex, s = suffix),
						Modifier::ZeroOrMore => format!("(?:{p}{o}(?:{r})(?:{s}{p}(?:{r}))*){s})?", p = prefix, o = open, r = regex, s = suffix),
					};
					expression.push_str(&group);
				}
			}
		}
		expression.push('$');

		let regex = Regex::new(&expression).map_err(|error| error.to_string())?;
		Ok(Self { regex, groups })
	}

	fn exec(&self, input: &str) -> Option<HashMap<String, String>> {
		let captures = self.regex.captures(input)?;
		Some(
			self.groups
				.iter()
				.filter_map(|(regex_name, name)| captures.name(regex_name).map(|value| (name.clone(), value.as_str().to_owned())))
				.collect(),
		)
	}
}

fn parse(source: &str, segment: &str, delimiter: Option<char>) -> core::result::Result<Vec<Part>, String> {
	let mut index = 0;
	let mut parts = Vec::new();
	let mut fixed = String::new();
	let mut chars = source.char_indices().peekable();

	while let Some((_, c)) = chars.next() {
		let group = match c {
			'\\' => {
				let (_, escaped) = chars.next().ok_or("trailing escape")?;
				fixed.push(escaped);
				continue;
			}
			':' | '(' | '*' => parse_group(c, &mut chars, segment, &mut index)?,
			'{' => {
				let mut prefix = String::new();
				let mut inner = None;
				let mut suffix = String::new();
				loop {
					let (_, c) = chars.next().ok_or("unterminated `{` group")?;
					match c {
						'}' => break,
						'\\' => {
							let (_, escaped) = chars.next().ok_or("trailing escape")?;
							(if inner.is_some() { &mut suffix } else { &mut prefix }).push(escaped);
						}
						':' | '(' | '*' if inner.is_none() => inner = Some(parse_group(c, &mut chars, segment, &mut index)?),
						':' | '(' | '*' => return Err("only one group is allowed inside `{…}`".to_owned()),
						c => (if inner.is_some() { &mut suffix } else { &mut prefix }).push(c),
					}
				}
				let modifier = parse_modifier(&mut chars);
				match inner {
					Some(Part::Group {
						name,
						regex,
						modifier: Modifier::None,
						..
					}) => Part::Group {
						name,
						regex,
						modifier,
						prefix,
						suffix,
					},
					Some(_) => return Err("modifiers inside `{…}` are not supported".to_owned()),
					None => Part::Group {
						name: None,
						regex: String::new(),
						modifier,
						prefix,
						suffix,
					},
				}
			}
			c => {
				fixed.push(c);
				continue;
			}
		};

		let group = match group {
			Part::Group {
				name,
				regex,
				modifier,
				prefix,
				suffix,
			} if prefix.is_empty() && modifier != Modifier::None && delimiter.map_or(false, |d| fixed.ends_with(d)) => {
				// The preceding delimiter becomes optional along with the group.
				let prefix = fixed.pop().map(String::from).unwrap_or_default();
				Part::Group {
					name,
					regex,
					modifier,
					prefix,
					suffix,
				}
			}
			group => group,
		};

		if !fixed.is_empty() {
			parts.push(Part::Fixed(core::mem::take(&mut fixed)));
		}
		parts.push(group);
	}

	if !fixed.is_empty() {
		parts.push(Part::Fixed(fixed));
	}
	Ok(parts)
}

/// Parses a `:name(regex)`, `(regex)` or `*` group whose first character was already consumed.
fn parse_group(
	first: char,
	chars: &mut core::iter::Peekable<core::str::CharIndices<'_>>,
	segment: &str,
	index: &mut usize,
) -> core::result::Result<Part, String> {
	let (name, regex) = match first {
		':' => {
			let mut name = String::new();
			while let Some(&(_, c)) = chars.peek() {
				if (name.is_empty() && is_name_start(c)) || (!name.is_empty() && is_name_char(c)) {
					name.push(c);
					chars.next();
				} else {
					break;
				}
			}
			if name.is_empty() {
				return Err("`:` must be followed by a group name".to_owned());
			}
			let regex = if chars.peek().map(|&(_, c)| c) == Some('(') {
				chars.next();
				skip_regex(chars)?
			} else {
				segment.to_owned()
			};
			(name, regex)
		}
		'(' => {
			let regex = skip_regex(chars)?;
			let name = index.to_string();
			*index += 1;
			(name, regex)
		}
		_ => {
			let name = index.to_string();
			*index += 1;
			(name, ".*".to_owned())
		}
	};
	if regex.is_empty() {
		return Err(format!("group {:?} has an empty regex", name));
	}

	Ok(Part::Group {
		name: Some(name),
		regex,
		modifier: parse_modifier(chars),
		prefix: String::new(),
		suffix: String::new(),
	})
}

fn parse_modifier(chars: &mut core::iter::Peekable<core::str::CharIndices<'_>>) -> Modifier {
	let modifier = match chars.peek().map(|&(_, c)| c) {
		Some('?') => Modifier::Optional,
		Some('+') => Modifier::OneOrMore,
		Some('*') => Modifier::ZeroOrMore,
		_ => return Modifier::None,
	};
	chars.next();
	modifier
}
