//! Per-caller filtered views of the registry.
//!
//! # Role
//!
//! An [`ActiveRoutingGraph`] is the set of routes and contexts visible to one
//! caller scope on one channel at one registry version. [`GraphCache`] keeps
//! the latest graph per (scope, channel) and recomputes it when the registry
//! version moves.
//!
//! # Invariants
//!
//! - Members of [`ModuleId::ALWAYS`] are always included.
//! - Within the graph, one definition per template signature survives: the
//!   most recently registered, placed at the earliest registration's position.
//! - A graph is never served for a version other than the one it was built at.

mod cache;

use std::sync::Arc;

use indexmap::IndexMap;
use kestrel_route::{ConstraintRegistry, MatchOptions};
use rustc_hash::{FxBuildHasher, FxHashSet};
use tracing::debug;

pub use cache::{CacheStats, GraphCache};

use crate::defs::{ContextDefinition, RouteDefinition, TemplateEntry};
use crate::module::{CallerScope, Channel, ModuleId, PresenceContext, ScopeId};
use crate::registry::RegistrySnapshot;


#[derive(Debug)]
pub struct ActiveRoutingGraph {
	version: u64,
	scope: ScopeId,
	channel: Channel,
	routes: Vec<Arc<RouteDefinition>>,
	contexts: Vec<Arc<ContextDefinition>>,
	constraints: Arc<ConstraintRegistry>,
}

impl ActiveRoutingGraph {
	/// Filters `snapshot` to the modules present for `scope` on `channel`.
	pub fn compute(snapshot: &RegistrySnapshot, scope: &CallerScope, channel: Channel) -> Self {
		let cx = PresenceContext::new(scope, channel);
		let mut present: FxHashSet<ModuleId> = snapshot
			.modules
			.iter()
			.filter(|module| module.is_present(&cx))
			.map(|module| module.id)
			.collect();
		present.insert(ModuleId::ALWAYS);

		let routes = dedup_by_signature(&snapshot.routes, &present);
		let contexts = dedup_by_signature(&snapshot.contexts, &present);

		debug!(
			%channel,
			scope = %scope.id,
			version = snapshot.version,
			modules = present.len(),
			routes = routes.len(),
			contexts = contexts.len(),
			"computed active routing graph"
		);

		Self {
			version: snapshot.version,
			scope: scope.id,
			channel,
			routes,
			contexts,
			constraints: Arc::clone(&snapshot.constraints),
		}
	}

	pub fn version(&self) -> u64 {
		self.version
	}

	pub fn scope(&self) -> ScopeId {
		self.scope
	}

	pub fn channel(&self) -> Channel {
		self.channel
	}

	pub fn routes(&self) -> &[Arc<RouteDefinition>] {
		&self.routes
	}

	pub fn contexts(&self) -> &[Arc<ContextDefinition>] {
		&self.contexts
	}

	pub fn constraints(&self) -> &ConstraintRegistry {
		&self.constraints
	}

	pub fn match_options(&self) -> MatchOptions<'_> {
		MatchOptions::new(&self.constraints)
	}

	/// Non-hidden routes and all contexts, in registration order.
	pub fn visible_entries(&self) -> Vec<&dyn TemplateEntry> {
		let mut entries: Vec<&dyn TemplateEntry> = self
			.routes
			.iter()
			.filter(|route| !route.is_hidden())
			.map(|route| route.as_ref() as &dyn TemplateEntry)
			.chain(self.contexts.iter().map(|c| c.as_ref() as &dyn TemplateEntry))
			.collect();
		entries.sort_by_key(|entry| entry.ordinal());
		entries
	}
}

fn dedup_by_signature<T: TemplateEntry>(
	definitions: &[Arc<T>],
	present: &FxHashSet<ModuleId>,
) -> Vec<Arc<T>> {
	let mut by_signature: IndexMap<String, Arc<T>, FxBuildHasher> = IndexMap::default();
	for definition in definitions.iter().filter(|d| present.contains(&d.module())) {
		// Re-inserting keeps the original slot and replaces the value.
		by_signature.insert(definition.template().signature(), Arc::clone(definition));
	}
	by_signature.into_values().collect()
}
