//! Route, context, module, and constraint registration.
//!
//! # Role
//!
//! Owns the authoritative definition set. Every mutation builds a new
//! [`RegistrySnapshot`] from the current one and publishes it with a
//! compare-and-swap, so readers never observe a half-applied registration and
//! concurrent writers retry instead of losing updates.
//!
//! # Invariants
//!
//! - Each successful mutation increments [`RegistrySnapshot::version`] by one.
//! - A failed registration publishes nothing.
//! - Within a module, no two routes (or two contexts) share a signature.
//! - Routes and contexts only reference registered modules and constraints.

use std::sync::Arc;

use arc_swap::ArcSwap;
use kestrel_route::{
	ConstraintKind, ConstraintPredicate, ConstraintRegistry, RouteTemplate, TemplateBuilder,
	TemplateError,
};
use tracing::debug;

use crate::command::Command;
use crate::defs::{ContextDefinition, ContextValidator, RouteDefinition};
use crate::error::RegistrationError;
use crate::module::{ModuleDefinition, ModuleId, PresencePredicate};

#[cfg(test)]
mod tests;

/// Immutable registry state at one version.
#[derive(Debug, Clone, Default)]
pub struct RegistrySnapshot {
	pub version: u64,
	pub routes: Arc<[Arc<RouteDefinition>]>,
	pub contexts: Arc<[Arc<ContextDefinition>]>,
	pub modules: Arc<[Arc<ModuleDefinition>]>,
	pub constraints: Arc<ConstraintRegistry>,
	next_ordinal: u64,
}

impl RegistrySnapshot {
	pub fn module(&self, id: ModuleId) -> Option<&Arc<ModuleDefinition>> {
		self.modules.iter().find(|module| module.id == id)
	}

	pub fn has_module(&self, id: ModuleId) -> bool {
		id.is_always() || self.module(id).is_some()
	}

	fn check_module(&self, module: ModuleId) -> Result<(), RegistrationError> {
		if self.has_module(module) {
			Ok(())
		} else {
			Err(RegistrationError::UnknownModule { module })
		}
	}

	fn check_constraints(&self, template: &RouteTemplate) -> Result<(), RegistrationError> {
		let missing = template
			.segments()
			.iter()
			.filter_map(|segment| segment.kind())
			.find(|kind| kind.is_custom() && !self.constraints.contains(kind.name()));
		match missing {
			Some(kind) => Err(RegistrationError::UnknownConstraint {
				template: template.text().to_string(),
				name: kind.name().to_string(),
			}),
			None => Ok(()),
		}
	}

	/// Successor snapshot sharing everything not replaced by the caller.
	fn next(&self) -> Self {
		Self {
			version: self.version + 1,
			..self.clone()
		}
	}

	fn take_ordinal(&mut self) -> u64 {
		let ordinal = self.next_ordinal;
		self.next_ordinal += 1;
		ordinal
	}
}

/// Anything that can be turned into a [`RouteTemplate`].
pub trait IntoTemplate {
	fn into_template(self) -> Result<RouteTemplate, TemplateError>;
}

impl IntoTemplate for RouteTemplate {
	fn into_template(self) -> Result<RouteTemplate, TemplateError> {
		Ok(self)
	}
}

impl IntoTemplate for &RouteTemplate {
	fn into_template(self) -> Result<RouteTemplate, TemplateError> {
		Ok(self.clone())
	}
}

impl IntoTemplate for &str {
	fn into_template(self) -> Result<RouteTemplate, TemplateError> {
		RouteTemplate::parse(self)
	}
}

impl IntoTemplate for &String {
	fn into_template(self) -> Result<RouteTemplate, TemplateError> {
		RouteTemplate::parse(self)
	}
}

impl IntoTemplate for TemplateBuilder {
	fn into_template(self) -> Result<RouteTemplate, TemplateError> {
		self.build()
	}
}

/// Thread-safe registry publishing versioned snapshots.
#[derive(Debug, Default)]
pub struct RoutingRegistry {
	snap: ArcSwap<RegistrySnapshot>,
}

impl RoutingRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Current snapshot. Holding it pins that version.
	pub fn snapshot(&self) -> Arc<RegistrySnapshot> {
		self.snap.load_full()
	}

	pub fn version(&self) -> u64 {
		self.snap.load().version
	}

	/// Registers a command route.
	pub fn register_route(
		&self,
		template: impl IntoTemplate,
		command: Command,
		module: ModuleId,
	) -> Result<Arc<RouteDefinition>, RegistrationError> {
		let template = template.into_template()?;
		if let Some(token) = command.option_collision() {
			return Err(RegistrationError::OptionCollision {
				template: template.text().to_string(),
				token,
			});
		}
		let signature = template.signature();

		let (route, version) = self.publish(|old| {
			old.check_module(module)?;
			old.check_constraints(&template)?;
			if old
				.routes
				.iter()
				.any(|r| r.module == module && r.template.signature() == signature)
			{
				return Err(RegistrationError::DuplicateTemplate {
					template: template.text().to_string(),
					module,
				});
			}

			let mut next = old.next();
			let route = Arc::new(RouteDefinition {
				template: template.clone(),
				command: command.clone(),
				module,
				ordinal: next.take_ordinal(),
			});
			next.routes = append(&old.routes, Arc::clone(&route));
			Ok((next, route))
		})?;

		debug!(template = %route.template, %module, version, "registered route");
		Ok(route)
	}

	/// Registers a context. `validation` runs against the captured values
	/// whenever the context is entered or traversed.
	pub fn register_context(
		&self,
		template: impl IntoTemplate,
		description: Option<&str>,
		validation: Option<ContextValidator>,
		module: ModuleId,
	) -> Result<Arc<ContextDefinition>, RegistrationError> {
		let template = template.into_template()?;
		let signature = template.signature();

		let (context, version) = self.publish(|old| {
			old.check_module(module)?;
			old.check_constraints(&template)?;
			if old
				.contexts
				.iter()
				.any(|c| c.module == module && c.template.signature() == signature)
			{
				return Err(RegistrationError::DuplicateTemplate {
					template: template.text().to_string(),
					module,
				});
			}

			let mut next = old.next();
			let context = Arc::new(ContextDefinition {
				template: template.clone(),
				validation: validation.clone(),
				description: description.map(str::to_string),
				module,
				ordinal: next.take_ordinal(),
			});
			next.contexts = append(&old.contexts, Arc::clone(&context));
			Ok((next, context))
		})?;

		debug!(template = %context.template, %module, version, "registered context");
		Ok(context)
	}

	/// Registers a module and returns its id.
	pub fn register_module(
		&self,
		name: &str,
		presence: PresencePredicate,
	) -> Result<ModuleId, RegistrationError> {
		let (id, version) = self.publish(|old| {
			if old.modules.iter().any(|m| m.name.eq_ignore_ascii_case(name)) {
				return Err(RegistrationError::DuplicateModule {
					name: name.to_string(),
				});
			}
			let id = ModuleId::from_raw(old.modules.len() as u32 + 1);
			let mut next = old.next();
			next.modules = append(
				&old.modules,
				Arc::new(ModuleDefinition {
					id,
					name: name.to_string(),
					presence: Arc::clone(&presence),
				}),
			);
			Ok((next, id))
		})?;

		debug!(module = name, %id, version, "registered module");
		Ok(id)
	}

	/// Replaces a module's presence predicate.
	pub fn set_module_presence(
		&self,
		id: ModuleId,
		presence: PresencePredicate,
	) -> Result<(), RegistrationError> {
		let ((), version) = self.publish(|old| {
			let Some(index) = old.modules.iter().position(|m| m.id == id) else {
				return Err(RegistrationError::UnknownModule { module: id });
			};
			let mut modules = old.modules.to_vec();
			modules[index] = Arc::new(ModuleDefinition {
				presence: Arc::clone(&presence),
				..(*modules[index]).clone()
			});
			let mut next = old.next();
			next.modules = Arc::from(modules);
			Ok((next, ()))
		})?;

		debug!(module = %id, version, "replaced module presence");
		Ok(())
	}

	/// Registers a named custom constraint predicate.
	pub fn register_constraint(
		&self,
		name: &str,
		predicate: ConstraintPredicate,
	) -> Result<(), RegistrationError> {
		if !ConstraintKind::from_name(name).is_custom() {
			return Err(RegistrationError::ReservedConstraint {
				name: name.to_string(),
			});
		}

		let ((), version) = self.publish(|old| {
			let mut constraints = (*old.constraints).clone();
			if !constraints.insert(name, Arc::clone(&predicate)) {
				return Err(RegistrationError::DuplicateConstraint {
					name: name.to_string(),
				});
			}
			let mut next = old.next();
			next.constraints = Arc::new(constraints);
			Ok((next, ()))
		})?;

		debug!(constraint = name, version, "registered constraint");
		Ok(())
	}

	/// Bumps the version without changing definitions, forcing every cached
	/// graph to be recomputed. Hosts call this when state read by presence
	/// predicates changes.
	pub fn invalidate(&self) -> u64 {
		let version = self
			.publish(|old| Ok((old.next(), ())))
			.map_or_else(|_| self.version(), |((), version)| version);
		debug!(version, "invalidated routing graphs");
		version
	}

	/// Builds a successor from the current snapshot and installs it with CAS,
	/// retrying on contention. `build` may run more than once.
	fn publish<R>(
		&self,
		build: impl Fn(&RegistrySnapshot) -> Result<(RegistrySnapshot, R), RegistrationError>,
	) -> Result<(R, u64), RegistrationError> {
		loop {
			let old = self.snap.load_full();
			let (next, result) = build(&old)?;
			let version = next.version;
			let next = Arc::new(next);

			let prev = self.snap.compare_and_swap(&old, next);
			if Arc::ptr_eq(&prev, &old) {
				return Ok((result, version));
			}
		}
	}
}

fn append<T>(items: &Arc<[Arc<T>]>, item: Arc<T>) -> Arc<[Arc<T>]> {
	let mut items = items.to_vec();
	items.push(item);
	Arc::from(items)
}
