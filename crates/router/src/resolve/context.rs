//! Context matching and validation.
//!
//! A context is entered when the input is exactly its path, and traversed
//! when a longer input passes through it. Traversed contexts are validated
//! shortest-first before a route is accepted.

use std::sync::Arc;

use kestrel_route::{MatchOptions, Segment};

use crate::defs::{ContextDefinition, TemplateEntry};
use crate::values::CapturedValues;


#[derive(Debug, Clone)]
pub struct ContextMatch {
	pub context: Arc<ContextDefinition>,
	pub values: CapturedValues,
	/// Tokens covered by the context's template.
	pub consumed: usize,
}

impl PartialEq for ContextMatch {
	fn eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.context, &other.context)
			&& self.values == other.values
			&& self.consumed == other.consumed
	}
}

/// The first context in a chain whose validation refused the input.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextRejection {
	pub rejected: ContextMatch,
	/// Contexts validated before the rejection, shortest first.
	pub validated: Vec<ContextMatch>,
}

/// Runs context validation on behalf of the router.
///
/// Hosts that need to observe or wrap validation (auditing, prompting)
/// implement this; [`DirectInvoker`] calls the registered predicate.
pub trait ContextInvoker {
	fn validate(&mut self, matched: &ContextMatch) -> bool;
}

/// Calls each context's validation predicate directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectInvoker;

impl ContextInvoker for DirectInvoker {
	fn validate(&mut self, matched: &ContextMatch) -> bool {
		matched.context.validate(&matched.values)
	}
}

/// Matches `context` against the first `template.len()` tokens.
fn match_context<S: AsRef<str>>(
	context: &Arc<ContextDefinition>,
	tokens: &[S],
	options: &MatchOptions<'_>,
) -> Option<(ContextMatch, i32)> {
	let segments = context.template.segments();
	if tokens.len() < segments.len() {
		return None;
	}

	let mut values = CapturedValues::new();
	let mut score = 0;
	for (index, (segment, token)) in segments.iter().zip(tokens).enumerate() {
		let token = token.as_ref();
		if !context.segment_matches(index, token, options) {
			return None;
		}
		if let Segment::Dynamic { name, .. } = segment {
			values.insert(name, token);
		}
		score += segment.match_score();
	}

	Some((
		ContextMatch {
			context: Arc::clone(context),
			values,
			consumed: segments.len(),
		},
		score,
	))
}

/// The context whose template covers `tokens` exactly.
///
/// Several candidates are ranked by match score, then registration order.
pub fn resolve_exact<S: AsRef<str>>(
	contexts: &[Arc<ContextDefinition>],
	tokens: &[S],
	options: &MatchOptions<'_>,
) -> Option<ContextMatch> {
	let mut best: Option<(ContextMatch, i32)> = None;
	for context in contexts.iter().filter(|c| c.template.len() == tokens.len()) {
		if let Some((candidate, score)) = match_context(context, tokens, options)
			&& best.as_ref().is_none_or(|(_, top)| score > *top)
		{
			best = Some((candidate, score));
		}
	}
	best.map(|(m, _)| m)
}

/// Every context that `tokens` passes through, shortest first.
pub fn resolve_prefixes<S: AsRef<str>>(
	contexts: &[Arc<ContextDefinition>],
	tokens: &[S],
	options: &MatchOptions<'_>,
) -> Vec<ContextMatch> {
	let mut matches: Vec<ContextMatch> = contexts
		.iter()
		.filter_map(|context| match_context(context, tokens, options))
		.map(|(m, _)| m)
		.collect();
	matches.sort_by_key(|m| m.consumed);
	matches
}

/// Validates `chain` in order, stopping at the first rejection.
pub fn validate_chain(
	chain: Vec<ContextMatch>,
	invoker: &mut dyn ContextInvoker,
) -> Result<Vec<ContextMatch>, ContextRejection> {
	let mut validated = Vec::with_capacity(chain.len());
	for matched in chain {
		if !invoker.validate(&matched) {
			return Err(ContextRejection {
				rejected: matched,
				validated,
			});
		}
		validated.push(matched);
	}
	Ok(validated)
}
