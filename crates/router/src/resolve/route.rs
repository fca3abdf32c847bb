//! Best-route selection with structured failure diagnostics.
//!
//! # Role
//!
//! Walks every candidate template against the tokens, keeping the
//! highest-scoring success. When nothing matches, the closest constraint
//! violation and the closest incomplete invocation are reported instead.
//!
//! # Invariants
//!
//! - A [`RouteMatch`] only captures names of its template's dynamic segments.
//! - Equal scores resolve to the earliest candidate in slice order.
//! - Aliases substitute only for the template's final literal segment.

use std::sync::Arc;

use kestrel_route::{LITERAL_SCORE, MatchOptions, Segment, kind_matches};
use tracing::trace;

use crate::defs::{RouteDefinition, TemplateEntry};
use crate::values::CapturedValues;


/// A successful resolution.
#[derive(Debug, Clone)]
pub struct RouteMatch {
	pub route: Arc<RouteDefinition>,
	pub values: CapturedValues,
	/// Tokens beyond the template's last segment.
	pub remaining: Vec<String>,
	pub score: i32,
}

impl RouteMatch {
	/// Number of input tokens bound to template segments.
	/// Saturates at zero when `total` is shorter than the input that matched.
	pub fn consumed(&self, total: usize) -> usize {
		total.saturating_sub(self.remaining.len())
	}
}

impl PartialEq for RouteMatch {
	fn eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.route, &other.route)
			&& self.values == other.values
			&& self.remaining == other.remaining
			&& self.score == other.score
	}
}

/// A token rejected by a dynamic segment's constraint.
#[derive(Debug, Clone)]
pub struct ConstraintFailure {
	pub route: Arc<RouteDefinition>,
	pub segment: Segment,
	pub token: String,
	/// Score accumulated before the failing segment.
	pub score: i32,
	pub segment_index: usize,
}

impl ConstraintFailure {
	fn rank(&self) -> (i32, usize, usize) {
		(self.score, self.segment_index, self.route.template.len())
	}
}

impl PartialEq for ConstraintFailure {
	fn eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.route, &other.route)
			&& self.segment == other.segment
			&& self.token == other.token
			&& self.score == other.score
			&& self.segment_index == other.segment_index
	}
}

/// A command path that matched but stopped short of required arguments.
#[derive(Debug, Clone)]
pub struct MissingArgumentsFailure {
	pub route: Arc<RouteDefinition>,
	/// Required segments after the last provided token, literals included.
	pub missing: Vec<Segment>,
	pub matched_count: usize,
	pub score: i32,
}

impl MissingArgumentsFailure {
	fn rank(&self) -> (i32, usize, usize) {
		(self.score, self.matched_count, self.route.template.len())
	}
}

impl PartialEq for MissingArgumentsFailure {
	fn eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.route, &other.route)
			&& self.missing == other.missing
			&& self.matched_count == other.matched_count
			&& self.score == other.score
	}
}

/// Outcome of [`resolve_with_diagnostics`].
#[derive(Debug, Clone, Default)]
pub struct ResolutionResult {
	pub matched: Option<RouteMatch>,
	pub constraint_failure: Option<ConstraintFailure>,
	pub missing_arguments: Option<MissingArgumentsFailure>,
}

enum Walk {
	Matched(RouteMatch),
	Constraint(ConstraintFailure),
	Missing(MissingArgumentsFailure),
	NoMatch,
}

/// Returns the best match, if any.
pub fn resolve<S: AsRef<str>>(
	routes: &[Arc<RouteDefinition>],
	tokens: &[S],
	options: &MatchOptions<'_>,
) -> Option<RouteMatch> {
	resolve_with_diagnostics(routes, tokens, options).matched
}

/// Returns the best match, or the best failure of each kind when none matched.
pub fn resolve_with_diagnostics<S: AsRef<str>>(
	routes: &[Arc<RouteDefinition>],
	tokens: &[S],
	options: &MatchOptions<'_>,
) -> ResolutionResult {
	let mut result = ResolutionResult::default();

	for route in routes {
		match walk(route, tokens, options) {
			Walk::Matched(m) => {
				if result.matched.as_ref().is_none_or(|best| m.score > best.score) {
					result.matched = Some(m);
				}
			}
			Walk::Constraint(f) => {
				if result
					.constraint_failure
					.as_ref()
					.is_none_or(|best| f.rank() > best.rank())
				{
					result.constraint_failure = Some(f);
				}
			}
			Walk::Missing(f) => {
				if result
					.missing_arguments
					.as_ref()
					.is_none_or(|best| f.rank() > best.rank())
				{
					result.missing_arguments = Some(f);
				}
			}
			Walk::NoMatch => {}
		}
	}

	if result.matched.is_some() {
		result.constraint_failure = None;
		result.missing_arguments = None;
	}

	trace!(
		tokens = tokens.len(),
		matched = result.matched.as_ref().map(|m| m.route.template.text()),
		score = result.matched.as_ref().map(|m| m.score),
		"resolved route"
	);
	result
}

fn walk<S: AsRef<str>>(
	route: &Arc<RouteDefinition>,
	tokens: &[S],
	options: &MatchOptions<'_>,
) -> Walk {
	let template = &route.template;
	if tokens.len() < template.required_count() {
		return walk_incomplete(route, tokens, options);
	}

	let mut values = CapturedValues::new();
	let mut score = 0;
	for (index, segment) in template.segments().iter().enumerate() {
		// Only optional segments can lack a token here.
		let Some(token) = tokens.get(index).map(AsRef::as_ref) else {
			break;
		};
		match segment {
			Segment::Literal(_) => {
				if !route.literal_matches(index, token) {
					return Walk::NoMatch;
				}
				score += LITERAL_SCORE;
			}
			Segment::Dynamic { name, kind, .. } => {
				if !kind_matches(kind, token, options) {
					return Walk::Constraint(ConstraintFailure {
						route: Arc::clone(route),
						segment: segment.clone(),
						token: token.to_string(),
						score,
						segment_index: index,
					});
				}
				values.insert(name, token);
				score += segment.match_score();
			}
		}
	}

	let remaining = tokens
		.get(template.len()..)
		.unwrap_or_default()
		.iter()
		.map(|t| t.as_ref().to_string())
		.collect();
	Walk::Matched(RouteMatch {
		route: Arc::clone(route),
		values,
		remaining,
		score,
	})
}

/// Input shorter than the required segment count.
fn walk_incomplete<S: AsRef<str>>(
	route: &Arc<RouteDefinition>,
	tokens: &[S],
	options: &MatchOptions<'_>,
) -> Walk {
	if tokens.is_empty() {
		return Walk::NoMatch;
	}

	let segments = route.template.segments();
	let mut score = 0;
	for (index, token) in tokens.iter().enumerate() {
		let token = token.as_ref();
		let segment = &segments[index];
		match segment {
			Segment::Literal(_) => {
				if !route.literal_matches(index, token) {
					return Walk::NoMatch;
				}
			}
			Segment::Dynamic { kind, .. } => {
				if !kind_matches(kind, token, options) {
					return Walk::Constraint(ConstraintFailure {
						route: Arc::clone(route),
						segment: segment.clone(),
						token: token.to_string(),
						score,
						segment_index: index,
					});
				}
			}
		}
		score += segment.match_score();
	}

	// Optional segments only trail required ones.
	let missing: Vec<Segment> = segments[tokens.len()..]
		.iter()
		.take_while(|s| !s.is_optional())
		.cloned()
		.collect();

	Walk::Missing(MissingArgumentsFailure {
		route: Arc::clone(route),
		missing,
		matched_count: tokens.len(),
		score,
	})
}
