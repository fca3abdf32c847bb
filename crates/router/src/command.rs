//! Command metadata attached to a route.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

/// What a route does once matched.
///
/// The router never executes anything; `user_data` carries whatever the host
/// needs to run the command (a handler, an id, a script path).
#[derive(Clone, Default)]
pub struct Command {
	pub description: String,
	/// Alternative spellings of the route's final literal segment.
	pub aliases: Vec<String>,
	/// Hidden commands resolve but are left out of completion and suggestions.
	pub hidden: bool,
	/// Declared completion values keyed by lowercase parameter name.
	pub completions: FxHashMap<String, Vec<String>>,
	pub options: Vec<OptionSpec>,
	pub user_data: Option<Arc<dyn Any + Send + Sync>>,
}

impl Command {
	pub fn new(description: impl Into<String>) -> Self {
		Self {
			description: description.into(),
			..Self::default()
		}
	}

	pub fn alias(mut self, alias: impl Into<String>) -> Self {
		self.aliases.push(alias.into());
		self
	}

	pub fn hidden(mut self) -> Self {
		self.hidden = true;
		self
	}

	/// Declares completion values for parameter `param`.
	pub fn complete<I, S>(mut self, param: &str, values: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.completions
			.entry(param.to_lowercase())
			.or_default()
			.extend(values.into_iter().map(Into::into));
		self
	}

	pub fn option(mut self, option: OptionSpec) -> Self {
		self.options.push(option);
		self
	}

	pub fn user_data<T: Any + Send + Sync>(mut self, data: T) -> Self {
		self.user_data = Some(Arc::new(data));
		self
	}

	/// Downcasts the attached user data.
	pub fn data<T: Any + Send + Sync>(&self) -> Option<&T> {
		self.user_data.as_deref()?.downcast_ref()
	}

	pub fn completions_for(&self, param: &str) -> &[String] {
		self.completions
			.get(&param.to_lowercase())
			.map_or(&[], Vec::as_slice)
	}

	/// Returns the first option token declared more than once, if any.
	pub fn option_collision(&self) -> Option<String> {
		let mut seen = rustc_hash::FxHashSet::default();
		self.options
			.iter()
			.flat_map(OptionSpec::tokens)
			.find(|token| !seen.insert(token.clone()))
	}
}

impl fmt::Debug for Command {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Command")
			.field("description", &self.description)
			.field("aliases", &self.aliases)
			.field("hidden", &self.hidden)
			.field("options", &self.options)
			.field("user_data", &self.user_data.is_some())
			.finish_non_exhaustive()
	}
}

/// A `--long` / `-s` option declared by a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSpec {
	pub name: String,
	pub short: Option<char>,
	pub aliases: Vec<String>,
	pub description: String,
	pub takes_value: bool,
}

impl OptionSpec {
	/// An option that is present or absent.
	pub fn flag(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			short: None,
			aliases: Vec::new(),
			description: String::new(),
			takes_value: false,
		}
	}

	/// An option followed by a value token.
	pub fn value(name: impl Into<String>) -> Self {
		Self {
			takes_value: true,
			..Self::flag(name)
		}
	}

	pub fn short(mut self, short: char) -> Self {
		self.short = Some(short);
		self
	}

	pub fn alias(mut self, alias: impl Into<String>) -> Self {
		self.aliases.push(alias.into());
		self
	}

	pub fn describe(mut self, description: impl Into<String>) -> Self {
		self.description = description.into();
		self
	}

	/// Every token that selects this option, e.g. `--force`, `-f`.
	pub fn tokens(&self) -> Vec<String> {
		std::iter::once(format!("--{}", self.name))
			.chain(self.short.map(|c| format!("-{c}")))
			.chain(self.aliases.iter().map(|alias| format!("--{alias}")))
			.collect()
	}
}
