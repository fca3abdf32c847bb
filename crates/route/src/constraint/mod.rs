//! Constraint evaluation for dynamic segments.
//!
//! # Role
//!
//! Decides whether a single token satisfies a segment. Evaluation is pure and
//! total: malformed tokens evaluate to `false`, never to a panic or an error.
//!
//! # Invariants
//!
//! - Built-in kinds parse with explicit grammars and fixed format allow-lists,
//!   so results do not depend on locale or environment.
//! - A custom kind that is not registered evaluates to `false`; registries
//!   reject such templates before they can be served.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::segment::{ConstraintKind, Segment};

mod grammar;
#[cfg(test)]
mod tests;

pub use grammar::{parse_int, parse_long};

/// User-supplied predicate for a custom constraint kind.
pub type ConstraintPredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Named custom constraint predicates.
///
/// Names are matched case-insensitively.
#[derive(Clone, Default)]
pub struct ConstraintRegistry {
	predicates: FxHashMap<String, ConstraintPredicate>,
}

impl ConstraintRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a predicate. Returns `false` without replacing when the name is taken.
	pub fn insert(&mut self, name: &str, predicate: ConstraintPredicate) -> bool {
		let key = name.to_lowercase();
		if self.predicates.contains_key(&key) {
			return false;
		}
		self.predicates.insert(key, predicate);
		true
	}

	pub fn contains(&self, name: &str) -> bool {
		self.predicates.contains_key(&name.to_lowercase())
	}

	pub fn get(&self, name: &str) -> Option<&ConstraintPredicate> {
		self.predicates.get(&name.to_lowercase())
	}

	pub fn len(&self) -> usize {
		self.predicates.len()
	}

	pub fn is_empty(&self) -> bool {
		self.predicates.is_empty()
	}
}

impl fmt::Debug for ConstraintRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut names: Vec<_> = self.predicates.keys().collect();
		names.sort();
		f.debug_struct("ConstraintRegistry").field("names", &names).finish()
	}
}

/// Per-evaluation inputs beyond the segment and token.
#[derive(Debug, Clone, Copy)]
pub struct MatchOptions<'a> {
	pub constraints: &'a ConstraintRegistry,
}

impl<'a> MatchOptions<'a> {
	pub fn new(constraints: &'a ConstraintRegistry) -> Self {
		Self { constraints }
	}
}

/// Returns whether `token` satisfies `segment`.
///
/// Literals compare case-insensitively; dynamics defer to [`kind_matches`].
pub fn is_match(segment: &Segment, token: &str, options: &MatchOptions<'_>) -> bool {
	match segment {
		Segment::Literal(value) => literal_eq(value, token),
		Segment::Dynamic { kind, .. } => kind_matches(kind, token, options),
	}
}

/// Evaluates a constraint kind against a token.
pub fn kind_matches(kind: &ConstraintKind, token: &str, options: &MatchOptions<'_>) -> bool {
	match kind {
		ConstraintKind::String => true,
		ConstraintKind::Alpha => !token.is_empty() && token.chars().all(char::is_alphabetic),
		ConstraintKind::Bool => {
			token.eq_ignore_ascii_case("true") || token.eq_ignore_ascii_case("false")
		}
		ConstraintKind::Email => grammar::is_email(token),
		ConstraintKind::Uri => grammar::is_uri(token),
		ConstraintKind::Url => grammar::is_url(token),
		ConstraintKind::Urn => grammar::is_urn(token),
		ConstraintKind::Time => grammar::is_time(token),
		ConstraintKind::Date => grammar::is_date(token),
		ConstraintKind::DateTime => grammar::is_datetime(token),
		ConstraintKind::DateTimeOffset => grammar::is_datetime_offset(token),
		ConstraintKind::TimeSpan => grammar::is_timespan(token),
		ConstraintKind::Guid => uuid::Uuid::parse_str(token).is_ok(),
		ConstraintKind::Long => parse_long(token).is_some(),
		ConstraintKind::Int => parse_int(token).is_some(),
		ConstraintKind::Custom(name) => options
			.constraints
			.get(name)
			.is_some_and(|predicate| predicate(token)),
	}
}

/// Case-insensitive literal comparison used by every resolver.
pub fn literal_eq(literal: &str, token: &str) -> bool {
	literal.eq_ignore_ascii_case(token) || literal.to_lowercase() == token.to_lowercase()
}

/// Case-insensitive prefix test used by abbreviation and completion.
pub fn literal_starts_with(literal: &str, prefix: &str) -> bool {
	literal.to_lowercase().starts_with(&prefix.to_lowercase())
}
