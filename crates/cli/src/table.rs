//! TOML route tables.
//!
//! ```toml
//! [[module]]
//! name = "admin"
//! requires_state = "admin"
//! channels = ["interactive", "session"]
//!
//! [[constraint]]
//! name = "env"
//! values = ["dev", "staging", "prod"]
//!
//! [[context]]
//! template = "project {name}"
//! description = "Work inside a project"
//! deny = { name = ["archived"] }
//!
//! [[route]]
//! template = "deploy {target:env}"
//! description = "Deploy the current build"
//! aliases = ["ship"]
//! module = "admin"
//! completions = { target = ["staging", "prod"] }
//! options = [{ name = "force", short = "f" }]
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use kestrel_router::{
	CapturedValues, Channel, Command, ContextValidator, ModuleId, OptionSpec, PresencePredicate,
	RegistrationError, RoutingRegistry, presence,
};
use rustc_hash::FxHashMap;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum TableError {
	#[error("failed to read route table {}: {source}", path.display())]
	Read {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("invalid route table: {0}")]
	Parse(#[from] toml::de::Error),
	#[error("`{entry}` refers to undeclared module `{module}`")]
	UndeclaredModule { entry: String, module: String },
	#[error("unknown channel `{0}` (expected cli, interactive, or session)")]
	UnknownChannel(String),
	#[error("failed to register `{entry}`: {source}")]
	Register {
		entry: String,
		#[source]
		source: RegistrationError,
	},
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteTable {
	#[serde(default, rename = "module")]
	pub modules: Vec<ModuleEntry>,
	#[serde(default, rename = "constraint")]
	pub constraints: Vec<ConstraintEntry>,
	#[serde(default, rename = "context")]
	pub contexts: Vec<ContextEntry>,
	#[serde(default, rename = "route")]
	pub routes: Vec<RouteEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleEntry {
	pub name: String,
	/// Present only when the caller's session state has this key.
	#[serde(default)]
	pub requires_state: Option<String>,
	/// Present only on these channels. Empty means every channel.
	#[serde(default)]
	pub channels: Vec<String>,
	#[serde(default = "enabled")]
	pub enabled: bool,
}

/// A custom constraint accepting a fixed, case-insensitive set of values.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConstraintEntry {
	pub name: String,
	pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContextEntry {
	pub template: String,
	#[serde(default)]
	pub description: Option<String>,
	#[serde(default)]
	pub module: Option<String>,
	/// Parameter name to values that refuse entry.
	#[serde(default)]
	pub deny: FxHashMap<String, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteEntry {
	pub template: String,
	#[serde(default)]
	pub description: String,
	#[serde(default)]
	pub aliases: Vec<String>,
	#[serde(default)]
	pub hidden: bool,
	#[serde(default)]
	pub module: Option<String>,
	#[serde(default)]
	pub completions: FxHashMap<String, Vec<String>>,
	#[serde(default)]
	pub options: Vec<OptionEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionEntry {
	pub name: String,
	#[serde(default)]
	pub short: Option<char>,
	#[serde(default)]
	pub aliases: Vec<String>,
	#[serde(default)]
	pub description: String,
	#[serde(default)]
	pub value: bool,
}

fn enabled() -> bool {
	true
}

impl RouteTable {
	pub fn parse(text: &str) -> Result<Self, TableError> {
		Ok(toml::from_str(text)?)
	}

	pub fn load(path: &Path) -> Result<Self, TableError> {
		let text = std::fs::read_to_string(path).map_err(|source| TableError::Read {
			path: path.to_path_buf(),
			source,
		})?;
		Self::parse(&text)
	}

	/// Registers every entry, in the order modules, constraints, contexts,
	/// routes.
	pub fn install(&self, registry: &RoutingRegistry) -> Result<(), TableError> {
		let mut modules: FxHashMap<String, ModuleId> = FxHashMap::default();
		for entry in &self.modules {
			let id = registry
				.register_module(&entry.name, entry.presence()?)
				.map_err(|source| TableError::Register {
					entry: entry.name.clone(),
					source,
				})?;
			modules.insert(entry.name.to_lowercase(), id);
		}

		for entry in &self.constraints {
			let allowed: Vec<String> = entry.values.iter().map(|v| v.to_lowercase()).collect();
			registry
				.register_constraint(
					&entry.name,
					Arc::new(move |token: &str| allowed.contains(&token.to_lowercase())),
				)
				.map_err(|source| TableError::Register {
					entry: entry.name.clone(),
					source,
				})?;
		}

		let module_id = |entry: &str, name: &Option<String>| match name {
			None => Ok(ModuleId::ALWAYS),
			Some(name) => modules
				.get(&name.to_lowercase())
				.copied()
				.ok_or_else(|| TableError::UndeclaredModule {
					entry: entry.to_string(),
					module: name.clone(),
				}),
		};

		for entry in &self.contexts {
			let module = module_id(&entry.template, &entry.module)?;
			registry
				.register_context(
					entry.template.as_str(),
					entry.description.as_deref(),
					entry.validator(),
					module,
				)
				.map_err(|source| TableError::Register {
					entry: entry.template.clone(),
					source,
				})?;
		}

		for entry in &self.routes {
			let module = module_id(&entry.template, &entry.module)?;
			registry
				.register_route(entry.template.as_str(), entry.command(), module)
				.map_err(|source| TableError::Register {
					entry: entry.template.clone(),
					source,
				})?;
		}

		debug!(
			modules = self.modules.len(),
			constraints = self.constraints.len(),
			contexts = self.contexts.len(),
			routes = self.routes.len(),
			"installed route table"
		);
		Ok(())
	}
}

impl ModuleEntry {
	fn presence(&self) -> Result<PresencePredicate, TableError> {
		if !self.enabled {
			return Ok(presence::never());
		}
		let channels = self
			.channels
			.iter()
			.map(|raw| raw.parse::<Channel>().map_err(|_| TableError::UnknownChannel(raw.clone())))
			.collect::<Result<Vec<_>, _>>()?;
		let key = self.requires_state.clone();

		Ok(presence::when(move |cx| {
			(channels.is_empty() || channels.contains(&cx.channel))
				&& key.as_deref().is_none_or(|key| cx.state.contains(key))
		}))
	}
}

impl ContextEntry {
	fn validator(&self) -> Option<ContextValidator> {
		if self.deny.is_empty() {
			return None;
		}
		let deny = self.deny.clone();
		Some(Arc::new(move |values: &CapturedValues| {
			!deny.iter().any(|(param, denied)| {
				values
					.get(param)
					.is_some_and(|value| denied.iter().any(|d| d.eq_ignore_ascii_case(value)))
			})
		}))
	}
}

impl RouteEntry {
	fn command(&self) -> Command {
		let mut command = Command::new(self.description.as_str());
		command.aliases = self.aliases.clone();
		command.hidden = self.hidden;
		for (param, values) in &self.completions {
			command = command.complete(param, values.iter().cloned());
		}
		for option in &self.options {
			let mut spec = if option.value {
				OptionSpec::value(option.name.as_str())
			} else {
				OptionSpec::flag(option.name.as_str())
			};
			if let Some(short) = option.short {
				spec = spec.short(short);
			}
			for alias in &option.aliases {
				spec = spec.alias(alias.as_str());
			}
			command = command.option(spec.describe(option.description.as_str()));
		}
		command
	}
}
