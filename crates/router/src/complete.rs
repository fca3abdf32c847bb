//! Next-token candidates for line editors.

use kestrel_route::{ConstraintKind, Segment, literal_eq, literal_starts_with};

use crate::graph::ActiveRoutingGraph;
use crate::options::CompletionOptions;


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompletionKind {
	Literal,
	Alias,
	/// A declared value or boolean for a parameter.
	Value,
	/// Usage hint such as `{id:int}`; not meant to be inserted.
	Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
	pub value: String,
	pub kind: CompletionKind,
	pub description: Option<String>,
}

/// Candidates for the token after `preceding`, filtered by `partial`.
pub fn complete<S: AsRef<str>>(
	graph: &ActiveRoutingGraph,
	preceding: &[S],
	partial: &str,
	options: &CompletionOptions,
) -> Vec<Completion> {
	let match_options = graph.match_options();
	let preceding = crate::resolve::owned_tokens(preceding);
	let position = preceding.len();
	let mut out: Vec<Completion> = Vec::new();

	for entry in graph.visible_entries() {
		let template = entry.template();
		let Some(segment) = template.segments().get(position) else {
			continue;
		};
		if !entry.prefix_matches(&preceding, &match_options) {
			continue;
		}

		let is_terminal = template.terminal_literal_index() == Some(position);
		let description = is_terminal
			.then(|| entry.description())
			.flatten()
			.map(str::to_string);

		match segment {
			Segment::Literal(value) => {
				if literal_starts_with(value, partial) {
					push(&mut out, value, CompletionKind::Literal, description.clone());
				}
				if is_terminal {
					for alias in entry.aliases() {
						if literal_starts_with(alias, partial) {
							push(&mut out, alias, CompletionKind::Alias, description.clone());
						}
					}
				}
			}
			Segment::Dynamic { name, kind, .. } => {
				for value in entry.completions_for(name) {
					if literal_starts_with(value, partial) {
						push(&mut out, value, CompletionKind::Value, None);
					}
				}
				if *kind == ConstraintKind::Bool {
					for value in ["true", "false"] {
						if literal_starts_with(value, partial) {
							push(&mut out, value, CompletionKind::Value, None);
						}
					}
				}
				if partial.is_empty() && options.include_placeholders {
					push(&mut out, &segment.to_string(), CompletionKind::Placeholder, None);
				}
			}
		}
	}

	out
}

fn push(out: &mut Vec<Completion>, value: &str, kind: CompletionKind, description: Option<String>) {
	if out.iter().any(|c| literal_eq(&c.value, value)) {
		return;
	}
	out.push(Completion {
		value: value.to_string(),
		kind,
		description,
	});
}
