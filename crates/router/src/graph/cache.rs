use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use super::ActiveRoutingGraph;
use crate::module::{CallerScope, Channel, ScopeId};
use crate::registry::RoutingRegistry;

type Bucket = Arc<Mutex<Option<Arc<ActiveRoutingGraph>>>>;

/// Hit and miss counts since construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
	pub hits: u64,
	pub misses: u64,
	pub buckets: usize,
}

/// Latest [`ActiveRoutingGraph`] per (scope, channel).
///
/// Recomputation runs without holding any lock; only installing the result
/// takes the bucket mutex, and an older graph never replaces a newer one.
#[derive(Debug, Default)]
pub struct GraphCache {
	buckets: RwLock<FxHashMap<(ScopeId, Channel), Bucket>>,
	hits: AtomicU64,
	misses: AtomicU64,
}

impl GraphCache {
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the graph for the registry's current version, computing it
	/// when the cached one is missing or stale.
	pub fn get_or_compute(
		&self,
		registry: &RoutingRegistry,
		scope: &CallerScope,
		channel: Channel,
	) -> Arc<ActiveRoutingGraph> {
		let snapshot = registry.snapshot();
		let bucket = self.bucket(scope.id, channel);

		{
			let slot = bucket.lock();
			if let Some(graph) = slot.as_ref()
				&& graph.version() == snapshot.version
			{
				self.hits.fetch_add(1, Ordering::Relaxed);
				trace!(scope = %scope.id, %channel, version = snapshot.version, "graph cache hit");
				return Arc::clone(graph);
			}
		}

		self.misses.fetch_add(1, Ordering::Relaxed);
		let graph = Arc::new(ActiveRoutingGraph::compute(&snapshot, scope, channel));

		let mut slot = bucket.lock();
		match slot.as_ref() {
			Some(existing) if existing.version() > graph.version() => {
				debug!(
					scope = %scope.id,
					%channel,
					cached = existing.version(),
					computed = graph.version(),
					"kept newer cached graph"
				);
			}
			_ => *slot = Some(Arc::clone(&graph)),
		}
		graph
	}

	/// Drops every cached graph for `scope`.
	pub fn release_scope(&self, scope: ScopeId) -> usize {
		let mut buckets = self.buckets.write();
		let before = buckets.len();
		buckets.retain(|(id, _), _| *id != scope);
		let released = before - buckets.len();
		debug!(%scope, released, "released scope graphs");
		released
	}

	pub fn clear(&self) {
		self.buckets.write().clear();
	}

	pub fn stats(&self) -> CacheStats {
		CacheStats {
			hits: self.hits.load(Ordering::Relaxed),
			misses: self.misses.load(Ordering::Relaxed),
			buckets: self.buckets.read().len(),
		}
	}

	fn bucket(&self, scope: ScopeId, channel: Channel) -> Bucket {
		if let Some(bucket) = self.buckets.read().get(&(scope, channel)) {
			return Arc::clone(bucket);
		}
		Arc::clone(self.buckets.write().entry((scope, channel)).or_default())
	}
}
