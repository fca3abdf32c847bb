//! Route template grammar.
//!
//! ```text
//! template    = segment (" " segment)*
//! segment     = literal | placeholder
//! placeholder = "{" name "?"? (":" constraint)? "?"? "}"
//! name        = (alnum | "_" | "-")+
//! ```
//!
//! # Invariants
//!
//! - A template has at least one segment.
//! - Parameter names are unique within a template, compared case-insensitively.
//! - Optional segments are only followed by optional segments.
//! - [`RouteTemplate`]'s `Display` output parses back to an equal template.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::error::TemplateError;
use crate::segment::{ConstraintKind, Segment};

#[cfg(test)]
mod tests;

/// Immutable, parsed segment sequence plus its canonical text.
///
/// Clones share the segment slice.
#[derive(Debug, Clone)]
pub struct RouteTemplate {
	segments: Arc<[Segment]>,
	text: Arc<str>,
	required: usize,
}

impl RouteTemplate {
	/// Parses a template from its textual form.
	pub fn parse(input: &str) -> Result<Self, TemplateError> {
		let mut segments = Vec::new();
		for (position, raw) in split_with_offsets(input) {
			segments.push(parse_segment(raw, position)?);
		}
		Self::from_segments(segments)
	}

	/// Validates a segment sequence and computes its canonical text.
	pub fn from_segments(segments: Vec<Segment>) -> Result<Self, TemplateError> {
		if segments.is_empty() {
			return Err(TemplateError::Empty);
		}

		let mut seen = FxHashSet::default();
		let mut saw_optional = false;
		for segment in &segments {
			match segment {
				Segment::Literal(value) => {
					if value.is_empty() || value.contains(char::is_whitespace) {
						return Err(TemplateError::InvalidName {
							name: value.clone(),
							position: 0,
						});
					}
					if value.contains(['{', '}']) {
						return Err(TemplateError::BraceInLiteral {
							literal: value.clone(),
							position: 0,
						});
					}
				}
				Segment::Dynamic { name, kind, .. } => {
					if !is_valid_name(name) {
						return Err(TemplateError::InvalidName {
							name: name.clone(),
							position: 0,
						});
					}
					if let ConstraintKind::Custom(custom) = kind
						&& !ConstraintKind::from_name(custom).is_custom()
					{
						return Err(TemplateError::ReservedConstraint { name: custom.clone() });
					}
					if !seen.insert(name.to_lowercase()) {
						return Err(TemplateError::DuplicateParameter { name: name.clone() });
					}
				}
			}
			if segment.is_optional() {
				saw_optional = true;
			} else if saw_optional {
				return Err(TemplateError::RequiredAfterOptional {
					segment: segment.to_string(),
				});
			}
		}

		let required = segments.iter().filter(|s| !s.is_optional()).count();
		let text = segments
			.iter()
			.map(ToString::to_string)
			.collect::<Vec<_>>()
			.join(" ");

		Ok(Self {
			segments: Arc::from(segments),
			text: Arc::from(text),
			required,
		})
	}

	pub fn segments(&self) -> &[Segment] {
		&self.segments
	}

	pub fn len(&self) -> usize {
		self.segments.len()
	}

	pub fn is_empty(&self) -> bool {
		self.segments.is_empty()
	}

	/// Number of non-optional segments, literals included.
	pub fn required_count(&self) -> usize {
		self.required
	}

	/// Canonical text; also the rendered usage string.
	pub fn text(&self) -> &str {
		&self.text
	}

	/// Index of the last literal segment, where command aliases apply.
	pub fn terminal_literal_index(&self) -> Option<usize> {
		self.segments.iter().rposition(Segment::is_literal)
	}

	/// Leading run of literal segments, e.g. `git remote` for `git remote add {name}`.
	pub fn literal_path(&self) -> Vec<&str> {
		self.segments.iter().map_while(Segment::as_literal).collect()
	}

	/// Names of all dynamic segments in order.
	pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
		self.segments.iter().filter_map(Segment::name)
	}

	/// Key under which two templates are considered structurally identical.
	///
	/// Literals compare case-insensitively and parameter names are ignored, so
	/// `user {id:int}` and `USER {n:int}` share a signature.
	pub fn signature(&self) -> String {
		let mut out = String::with_capacity(self.text.len());
		for (i, segment) in self.segments.iter().enumerate() {
			if i > 0 {
				out.push(' ');
			}
			match segment {
				Segment::Literal(value) => out.push_str(&value.to_lowercase()),
				Segment::Dynamic { kind, optional, .. } => {
					out.push_str("{:");
					out.push_str(&kind.name().to_lowercase());
					if *optional {
						out.push('?');
					}
					out.push('}');
				}
			}
		}
		out
	}
}

impl PartialEq for RouteTemplate {
	fn eq(&self, other: &Self) -> bool {
		self.segments == other.segments
	}
}

impl Eq for RouteTemplate {}

impl fmt::Display for RouteTemplate {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.text)
	}
}

impl FromStr for RouteTemplate {
	type Err = TemplateError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

fn split_with_offsets(input: &str) -> impl Iterator<Item = (usize, &str)> {
	input
		.split(char::is_whitespace)
		.scan(0usize, |offset, part| {
			let start = *offset;
			*offset += part.len() + 1;
			Some((start, part))
		})
		.filter(|(_, part)| !part.is_empty())
}

fn parse_segment(raw: &str, position: usize) -> Result<Segment, TemplateError> {
	let Some(body) = raw.strip_prefix('{') else {
		if raw.contains(['{', '}']) {
			return Err(TemplateError::BraceInLiteral {
				literal: raw.to_string(),
				position,
			});
		}
		return Ok(Segment::Literal(raw.to_string()));
	};

	let Some(body) = body.strip_suffix('}') else {
		return Err(TemplateError::Unterminated { position });
	};

	let (head, constraint) = match body.split_once(':') {
		Some((head, constraint)) => (head, Some(constraint)),
		None => (body, None),
	};

	let mut optional = false;
	let name = match head.strip_suffix('?') {
		Some(name) => {
			optional = true;
			name
		}
		None => head,
	};
	if !is_valid_name(name) {
		return Err(TemplateError::InvalidName {
			name: name.to_string(),
			position,
		});
	}

	let kind = match constraint {
		None => ConstraintKind::String,
		Some(constraint) => {
			let constraint = match constraint.strip_suffix('?') {
				Some(stripped) => {
					optional = true;
					stripped
				}
				None => constraint,
			};
			if constraint.is_empty() {
				return Err(TemplateError::EmptyConstraint {
					position: position + 1 + head.len(),
				});
			}
			if !is_valid_name(constraint) {
				return Err(TemplateError::InvalidName {
					name: constraint.to_string(),
					position: position + 1 + head.len(),
				});
			}
			ConstraintKind::from_name(constraint)
		}
	};

	Ok(Segment::Dynamic {
		name: name.to_string(),
		kind,
		optional,
	})
}

fn is_valid_name(name: &str) -> bool {
	!name.is_empty()
		&& name
			.chars()
			.all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}
