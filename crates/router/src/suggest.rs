//! "Did you mean" suggestions for unresolved input.

use strsim::levenshtein;

use crate::graph::ActiveRoutingGraph;
use crate::options::SuggestionOptions;


#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
	/// The route's leading literal path, e.g. `remote add`.
	pub text: String,
	pub distance: usize,
}

/// Compares each visible route's leading literal path with the same number
/// of input tokens.
pub fn suggest<S: AsRef<str>>(
	graph: &ActiveRoutingGraph,
	tokens: &[S],
	options: &SuggestionOptions,
) -> Vec<Suggestion> {
	if tokens.is_empty() || options.limit == 0 {
		return Vec::new();
	}

	let mut suggestions: Vec<Suggestion> = Vec::new();
	for route in graph.routes().iter().filter(|r| !r.command.hidden) {
		let path = route.template.literal_path();
		let width = path.len().min(tokens.len());
		if width == 0 {
			continue;
		}

		let typed = tokens[..width]
			.iter()
			.map(|t| t.as_ref().to_lowercase())
			.collect::<Vec<_>>()
			.join(" ");
		let known = path[..width].join(" ").to_lowercase();
		let distance = levenshtein(&typed, &known);
		if distance > options.max_distance {
			continue;
		}

		let text = path.join(" ");
		match suggestions.iter_mut().find(|s| s.text.eq_ignore_ascii_case(&text)) {
			Some(existing) => existing.distance = existing.distance.min(distance),
			None => suggestions.push(Suggestion { text, distance }),
		}
	}

	suggestions.sort_by(|a, b| a.distance.cmp(&b.distance).then_with(|| a.text.cmp(&b.text)));
	suggestions.truncate(options.limit);
	suggestions
}
