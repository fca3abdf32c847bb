//! Caller-facing entry point.
//!
//! # Role
//!
//! [`Router`] pairs a [`RoutingRegistry`] with a [`GraphCache`] and
//! [`RouterOptions`]. [`Router::view`] pins the active graph for one caller,
//! and [`RouterView::dispatch`] runs abbreviation, route resolution, and
//! context validation in order, returning one [`Dispatch`] outcome.
//!
//! # Invariants
//!
//! - A view resolves against exactly one graph version for its lifetime.
//! - Context validation only runs for matched routes and entered contexts.

use std::sync::Arc;

use tracing::debug;

use crate::complete::{self, Completion};
use crate::graph::{ActiveRoutingGraph, GraphCache};
use crate::module::{CallerScope, Channel, ScopeId};
use crate::options::RouterOptions;
use crate::registry::RoutingRegistry;
use crate::resolve::context::{self, ContextInvoker, ContextMatch, ContextRejection};
use crate::resolve::prefix::{self, AmbiguousPrefix, PrefixResolution};
use crate::resolve::route::{
	self, ConstraintFailure, MissingArgumentsFailure, ResolutionResult, RouteMatch,
};
use crate::resolve::owned_tokens;
use crate::suggest::{self, Suggestion};


/// Terminal outcome of [`RouterView::dispatch`].
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
	/// A route matched and every traversed context validated.
	Matched {
		route: RouteMatch,
		/// Traversed contexts, shortest first.
		contexts: Vec<ContextMatch>,
		/// Input after abbreviation expansion.
		tokens: Vec<String>,
	},
	/// The input is exactly a context path.
	EnteredContext {
		context: ContextMatch,
		/// Validated chain ending with `context`.
		chain: Vec<ContextMatch>,
		/// Input after abbreviation expansion.
		tokens: Vec<String>,
	},
	Ambiguous(AmbiguousPrefix),
	ConstraintFailed(ConstraintFailure),
	MissingArguments(MissingArgumentsFailure),
	ContextRejected(ContextRejection),
	Unknown {
		tokens: Vec<String>,
		suggestions: Vec<Suggestion>,
	},
}

impl Dispatch {
	/// Short lowercase label for logs and CLI output.
	pub fn label(&self) -> &'static str {
		match self {
			Self::Matched { .. } => "matched",
			Self::EnteredContext { .. } => "entered-context",
			Self::Ambiguous(_) => "ambiguous",
			Self::ConstraintFailed(_) => "constraint-failed",
			Self::MissingArguments(_) => "missing-arguments",
			Self::ContextRejected(_) => "context-rejected",
			Self::Unknown { .. } => "unknown",
		}
	}
}

#[derive(Debug, Default)]
pub struct Router {
	registry: Arc<RoutingRegistry>,
	cache: GraphCache,
	options: RouterOptions,
}

impl Router {
	pub fn new(registry: Arc<RoutingRegistry>) -> Self {
		Self::with_options(registry, RouterOptions::default())
	}

	pub fn with_options(registry: Arc<RoutingRegistry>, options: RouterOptions) -> Self {
		Self {
			registry,
			cache: GraphCache::new(),
			options,
		}
	}

	pub fn registry(&self) -> &Arc<RoutingRegistry> {
		&self.registry
	}

	pub fn cache(&self) -> &GraphCache {
		&self.cache
	}

	pub fn options(&self) -> &RouterOptions {
		&self.options
	}

	/// Binds the current active graph for `scope` on `channel`.
	pub fn view(&self, scope: &CallerScope, channel: Channel) -> RouterView<'_> {
		RouterView {
			graph: self.cache.get_or_compute(&self.registry, scope, channel),
			options: &self.options,
		}
	}

	/// Drops cached graphs for a finished session.
	pub fn release_scope(&self, scope: ScopeId) -> usize {
		self.cache.release_scope(scope)
	}
}

/// Resolution against one pinned [`ActiveRoutingGraph`].
#[derive(Debug, Clone)]
pub struct RouterView<'r> {
	graph: Arc<ActiveRoutingGraph>,
	options: &'r RouterOptions,
}

impl RouterView<'_> {
	pub fn graph(&self) -> &Arc<ActiveRoutingGraph> {
		&self.graph
	}

	pub fn resolve<S: AsRef<str>>(&self, tokens: &[S]) -> Option<RouteMatch> {
		route::resolve(self.graph.routes(), tokens, &self.graph.match_options())
	}

	pub fn resolve_with_diagnostics<S: AsRef<str>>(&self, tokens: &[S]) -> ResolutionResult {
		route::resolve_with_diagnostics(self.graph.routes(), tokens, &self.graph.match_options())
	}

	pub fn resolve_unique_prefixes<S: AsRef<str>>(&self, tokens: &[S]) -> PrefixResolution {
		prefix::resolve_unique_prefixes(&self.graph, tokens)
	}

	pub fn resolve_context<S: AsRef<str>>(&self, tokens: &[S]) -> Option<ContextMatch> {
		context::resolve_exact(self.graph.contexts(), tokens, &self.graph.match_options())
	}

	/// Validates every context `tokens` passes through.
	pub fn validate_contexts_for_path<S: AsRef<str>>(
		&self,
		tokens: &[S],
		invoker: &mut dyn ContextInvoker,
	) -> Result<Vec<ContextMatch>, ContextRejection> {
		let chain = context::resolve_prefixes(self.graph.contexts(), tokens, &self.graph.match_options());
		context::validate_chain(chain, invoker)
	}

	/// Validates the contexts enclosing a matched route. Only tokens the route
	/// consumed are considered.
	pub fn validate_contexts_for_match<S: AsRef<str>>(
		&self,
		matched: &RouteMatch,
		tokens: &[S],
		invoker: &mut dyn ContextInvoker,
	) -> Result<Vec<ContextMatch>, ContextRejection> {
		let consumed = matched.consumed(tokens.len());
		self.validate_contexts_for_path(&tokens[..consumed], invoker)
	}

	pub fn complete<S: AsRef<str>>(&self, preceding: &[S], partial: &str) -> Vec<Completion> {
		complete::complete(&self.graph, preceding, partial, &self.options.completion)
	}

	pub fn suggest<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<Suggestion> {
		suggest::suggest(&self.graph, tokens, &self.options.suggestions)
	}

	/// Runs the full resolution flow for one input.
	pub fn dispatch<S: AsRef<str>>(&self, tokens: &[S], invoker: &mut dyn ContextInvoker) -> Dispatch {
		let outcome = self.dispatch_inner(owned_tokens(tokens), invoker);
		debug!(
			outcome = outcome.label(),
			channel = %self.graph.channel(),
			version = self.graph.version(),
			"dispatched input"
		);
		outcome
	}

	fn dispatch_inner(&self, tokens: Vec<String>, invoker: &mut dyn ContextInvoker) -> Dispatch {
		if tokens.is_empty() {
			return Dispatch::Unknown {
				tokens,
				suggestions: Vec::new(),
			};
		}

		let tokens = if self.options.prefix_matching {
			let expanded = self.resolve_unique_prefixes(&tokens);
			if let Some(ambiguous) = expanded.ambiguous {
				return Dispatch::Ambiguous(ambiguous);
			}
			expanded.tokens
		} else {
			tokens
		};

		let result = self.resolve_with_diagnostics(&tokens);
		if let Some(route) = result.matched {
			return match self.validate_contexts_for_match(&route, &tokens, invoker) {
				Ok(contexts) => Dispatch::Matched {
					route,
					contexts,
					tokens,
				},
				Err(rejection) => Dispatch::ContextRejected(rejection),
			};
		}

		if let Some(context) = self.resolve_context(&tokens) {
			return match self.validate_contexts_for_path(&tokens, invoker) {
				Ok(chain) => Dispatch::EnteredContext {
					context,
					chain,
					tokens,
				},
				Err(rejection) => Dispatch::ContextRejected(rejection),
			};
		}

		match best_diagnostic(result.constraint_failure, result.missing_arguments) {
			Some(outcome) => outcome,
			None => {
				let suggestions = self.suggest(&tokens);
				Dispatch::Unknown {
					tokens,
					suggestions,
				}
			}
		}
	}
}

/// Picks the higher-scoring diagnostic; a constraint failure wins ties.
fn best_diagnostic(
	constraint: Option<ConstraintFailure>,
	missing: Option<MissingArgumentsFailure>,
) -> Option<Dispatch> {
	match (constraint, missing) {
		(Some(constraint), Some(missing)) if missing.score > constraint.score => {
			Some(Dispatch::MissingArguments(missing))
		}
		(Some(constraint), _) => Some(Dispatch::ConstraintFailed(constraint)),
		(None, Some(missing)) => Some(Dispatch::MissingArguments(missing)),
		(None, None) => None,
	}
}
