//! Abbreviation expansion for literal tokens.
//!
//! `sh st` becomes `show status` when each abbreviation has exactly one
//! candidate among the literals reachable at its position.

use kestrel_route::{MatchOptions, Segment, literal_eq, literal_starts_with};
use smallvec::SmallVec;
use tracing::trace;

use crate::defs::TemplateEntry;
use crate::graph::ActiveRoutingGraph;


/// An abbreviation matching more than one literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmbiguousPrefix {
	pub token: String,
	pub position: usize,
	/// Matching literals in first-registered order.
	pub candidates: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixResolution {
	/// Input with unique abbreviations expanded. Positions at and after an
	/// ambiguity are left as typed.
	pub tokens: Vec<String>,
	pub ambiguous: Option<AmbiguousPrefix>,
}

/// Expands unique literal prefixes left to right, halting at the first
/// ambiguity.
pub fn resolve_unique_prefixes<S: AsRef<str>>(
	graph: &ActiveRoutingGraph,
	tokens: &[S],
) -> PrefixResolution {
	let options = graph.match_options();
	let entries = graph.visible_entries();
	let mut resolved = super::owned_tokens(tokens);

	for position in 0..resolved.len() {
		let token = resolved[position].as_str();
		if token.is_empty()
			|| spells_hidden_literal(graph, &resolved[..position], position, token, &options)
		{
			continue;
		}

		let mut candidates: SmallVec<[&str; 8]> = SmallVec::new();
		for entry in &entries {
			let template = entry.template();
			let Some(Segment::Literal(value)) = template.segments().get(position) else {
				continue;
			};
			if !entry.prefix_matches(&resolved[..position], &options) {
				continue;
			}
			push_unique(&mut candidates, value);
			if template.terminal_literal_index() == Some(position) {
				for alias in entry.aliases() {
					push_unique(&mut candidates, alias);
				}
			}
		}

		if candidates.iter().any(|c| literal_eq(c, token)) {
			continue;
		}
		let matching: SmallVec<[&str; 8]> = candidates
			.into_iter()
			.filter(|c| literal_starts_with(c, token))
			.collect();

		match matching.as_slice() {
			[] => {}
			[only] => {
				trace!(position, from = token, to = *only, "expanded abbreviation");
				resolved[position] = (*only).to_string();
			}
			many => {
				let ambiguous = AmbiguousPrefix {
					token: token.to_string(),
					position,
					candidates: many.iter().map(|c| c.to_string()).collect(),
				};
				return PrefixResolution {
					tokens: resolved,
					ambiguous: Some(ambiguous),
				};
			}
		}
	}

	PrefixResolution {
		tokens: resolved,
		ambiguous: None,
	}
}

/// Hidden routes are never abbreviation targets, but typing one of their
/// literals in full keeps it as typed.
fn spells_hidden_literal(
	graph: &ActiveRoutingGraph,
	preceding: &[String],
	position: usize,
	token: &str,
	options: &MatchOptions<'_>,
) -> bool {
	graph
		.routes()
		.iter()
		.filter(|route| route.is_hidden())
		.any(|route| route.literal_matches(position, token) && route.prefix_matches(preceding, options))
}

fn push_unique<'a>(candidates: &mut SmallVec<[&'a str; 8]>, value: &'a str) {
	if !candidates.iter().any(|c| literal_eq(c, value)) {
		candidates.push(value);
	}
}
