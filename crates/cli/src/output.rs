//! Plain-text rendering of dispatch outcomes and completions.

use std::fmt::Write;

use kestrel_router::{CapturedValues, Completion, CompletionKind, Dispatch, Segment};

/// Whether `outcome` should exit successfully.
pub fn is_success(outcome: &Dispatch) -> bool {
	matches!(outcome, Dispatch::Matched { .. } | Dispatch::EnteredContext { .. })
}

pub fn render_dispatch(outcome: &Dispatch) -> String {
	let mut out = String::new();
	match outcome {
		Dispatch::Matched { route, contexts, .. } => {
			let _ = writeln!(out, "matched `{}`", route.route.template);
			if !route.route.command.description.is_empty() {
				let _ = writeln!(out, "  {}", route.route.command.description);
			}
			render_values(&mut out, &route.values);
			if !route.remaining.is_empty() {
				let _ = writeln!(out, "  remaining: {}", route.remaining.join(" "));
			}
			for context in contexts {
				let _ = writeln!(out, "  within `{}`", context.context.template);
			}
		}
		Dispatch::EnteredContext { context, .. } => {
			let _ = writeln!(out, "entered `{}`", context.context.template);
			if let Some(description) = &context.context.description {
				let _ = writeln!(out, "  {description}");
			}
			render_values(&mut out, &context.values);
		}
		Dispatch::Ambiguous(ambiguous) => {
			let _ = writeln!(
				out,
				"ambiguous `{}` at position {}: {}",
				ambiguous.token,
				ambiguous.position,
				ambiguous.candidates.join(", ")
			);
		}
		Dispatch::ConstraintFailed(failure) => {
			let _ = writeln!(
				out,
				"`{}` is not valid for {} in `{}`",
				failure.token, failure.segment, failure.route.template
			);
		}
		Dispatch::MissingArguments(failure) => {
			let _ = writeln!(
				out,
				"missing {} for `{}`",
				join_segments(&failure.missing),
				failure.route.template
			);
		}
		Dispatch::ContextRejected(rejection) => {
			let _ = writeln!(out, "context `{}` refused entry", rejection.rejected.context.template);
			render_values(&mut out, &rejection.rejected.values);
		}
		Dispatch::Unknown { tokens, suggestions } => {
			if tokens.is_empty() {
				let _ = writeln!(out, "no input");
			} else {
				let _ = writeln!(out, "unknown command `{}`", tokens.join(" "));
			}
			for suggestion in suggestions {
				let _ = writeln!(out, "  did you mean `{}`?", suggestion.text);
			}
		}
	}
	out
}

/// One line per completion: value, kind, and optional description, tab separated.
pub fn render_completions(completions: &[Completion]) -> String {
	let mut out = String::new();
	for completion in completions {
		let _ = write!(out, "{}\t{}", completion.value, kind_label(completion.kind));
		if let Some(description) = &completion.description {
			let _ = write!(out, "\t{description}");
		}
		out.push('\n');
	}
	out
}

fn kind_label(kind: CompletionKind) -> &'static str {
	match kind {
		CompletionKind::Literal => "literal",
		CompletionKind::Alias => "alias",
		CompletionKind::Value => "value",
		CompletionKind::Placeholder => "placeholder",
	}
}

fn render_values(out: &mut String, values: &CapturedValues) {
	for (name, value) in values.iter() {
		let _ = writeln!(out, "  {name} = {value}");
	}
}

fn join_segments(segments: &[Segment]) -> String {
	segments.iter().map(Segment::to_string).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use kestrel_router::{
		CallerScope, Channel, Command, DirectInvoker, ModuleId, Router, RoutingRegistry,
	};
	use pretty_assertions::assert_eq;

	use super::*;

	fn router() -> Router {
		let registry = Arc::new(RoutingRegistry::new());
		registry
			.register_context("project {name}", Some("Work inside a project"), None, ModuleId::ALWAYS)
			.unwrap();
		registry
			.register_route("project {name} build", Command::new("Build a project"), ModuleId::ALWAYS)
			.unwrap();
		registry
			.register_route("copy {src} {dst}", Command::default(), ModuleId::ALWAYS)
			.unwrap();
		registry
			.register_route("user {id:int}", Command::new("Show a user").alias("u"), ModuleId::ALWAYS)
			.unwrap();
		Router::new(registry)
	}

	fn dispatch(tokens: &[&str]) -> Dispatch {
		router()
			.view(&CallerScope::root(), Channel::Cli)
			.dispatch(tokens, &mut DirectInvoker)
	}

	#[test]
	fn matched_lists_values_and_contexts() {
		let outcome = dispatch(&["project", "web", "build", "--release"]);
		assert!(is_success(&outcome));
		assert_eq!(
			render_dispatch(&outcome),
			"matched `project {name} build`\n  Build a project\n  name = web\n  remaining: --release\n  within `project {name}`\n"
		);
	}

	#[test]
	fn entered_context_is_a_success() {
		let outcome = dispatch(&["project", "web"]);
		assert!(is_success(&outcome));
		assert_eq!(
			render_dispatch(&outcome),
			"entered `project {name}`\n  Work inside a project\n  name = web\n"
		);
	}

	#[test]
	fn failures_describe_the_route() {
		let outcome = dispatch(&["user", "abc"]);
		assert!(!is_success(&outcome));
		assert_eq!(render_dispatch(&outcome), "`abc` is not valid for {id:int} in `user {id:int}`\n");

		assert_eq!(
			render_dispatch(&dispatch(&["copy", "a"])),
			"missing {dst} for `copy {src} {dst}`\n"
		);
	}

	#[test]
	fn unknown_lists_suggestions() {
		assert_eq!(
			render_dispatch(&dispatch(&["usr", "7"])),
			"unknown command `usr 7`\n  did you mean `user`?\n"
		);
		assert_eq!(render_dispatch(&dispatch(&[])), "no input\n");
	}

	#[test]
	fn completions_are_tab_separated() {
		let completions = router()
			.view(&CallerScope::root(), Channel::Cli)
			.complete::<&str>(&[], "u");
		assert_eq!(render_completions(&completions), "user\tliteral\tShow a user\nu\talias\tShow a user\n");
	}
}
