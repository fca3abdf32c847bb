//! Registered route and context definitions.

use std::fmt;
use std::sync::Arc;

use kestrel_route::{MatchOptions, RouteTemplate, Segment, kind_matches, literal_eq};

use crate::command::Command;
use crate::module::ModuleId;
use crate::values::CapturedValues;

/// Accepts or rejects the values a context captured.
pub type ContextValidator = Arc<dyn Fn(&CapturedValues) -> bool + Send + Sync>;

/// A command route.
#[derive(Debug, Clone)]
pub struct RouteDefinition {
	pub template: RouteTemplate,
	pub command: Command,
	pub module: ModuleId,
	/// Position in global registration order.
	pub ordinal: u64,
}

/// A named scope that commands can be nested under, e.g. `project {name}`.
#[derive(Clone)]
pub struct ContextDefinition {
	pub template: RouteTemplate,
	pub validation: Option<ContextValidator>,
	pub description: Option<String>,
	pub module: ModuleId,
	pub ordinal: u64,
}

impl ContextDefinition {
	/// Runs the validation predicate; contexts without one always pass.
	pub fn validate(&self, values: &CapturedValues) -> bool {
		self.validation.as_ref().is_none_or(|validate| validate(values))
	}
}

impl fmt::Debug for ContextDefinition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ContextDefinition")
			.field("template", &self.template.text())
			.field("description", &self.description)
			.field("module", &self.module)
			.field("ordinal", &self.ordinal)
			.field("validation", &self.validation.is_some())
			.finish()
	}
}

/// Shared view over routes and contexts used by matching, abbreviation, and
/// completion.
pub trait TemplateEntry {
	fn template(&self) -> &RouteTemplate;

	fn module(&self) -> ModuleId;

	fn ordinal(&self) -> u64;

	/// Aliases accepted in place of the final literal segment.
	fn aliases(&self) -> &[String] {
		&[]
	}

	fn is_hidden(&self) -> bool {
		false
	}

	fn description(&self) -> Option<&str> {
		None
	}

	fn completions_for(&self, _param: &str) -> &[String] {
		&[]
	}

	/// Whether `token` satisfies the literal at `index`, honoring aliases at
	/// the terminal literal position.
	fn literal_matches(&self, index: usize, token: &str) -> bool {
		let template = self.template();
		let Some(Segment::Literal(value)) = template.segments().get(index) else {
			return false;
		};
		literal_eq(value, token)
			|| (template.terminal_literal_index() == Some(index)
				&& self.aliases().iter().any(|alias| literal_eq(alias, token)))
	}

	/// Whether `token` satisfies the segment at `index`.
	fn segment_matches(&self, index: usize, token: &str, options: &MatchOptions<'_>) -> bool {
		match self.template().segments().get(index) {
			Some(Segment::Literal(_)) => self.literal_matches(index, token),
			Some(Segment::Dynamic { kind, .. }) => kind_matches(kind, token, options),
			None => false,
		}
	}

	/// Whether every token in `tokens` satisfies the segment at its position.
	fn prefix_matches(&self, tokens: &[String], options: &MatchOptions<'_>) -> bool {
		tokens
			.iter()
			.enumerate()
			.all(|(index, token)| self.segment_matches(index, token, options))
	}
}

impl TemplateEntry for RouteDefinition {
	fn template(&self) -> &RouteTemplate {
		&self.template
	}

	fn module(&self) -> ModuleId {
		self.module
	}

	fn ordinal(&self) -> u64 {
		self.ordinal
	}

	fn aliases(&self) -> &[String] {
		&self.command.aliases
	}

	fn is_hidden(&self) -> bool {
		self.command.hidden
	}

	fn description(&self) -> Option<&str> {
		Some(self.command.description.as_str()).filter(|d| !d.is_empty())
	}

	fn completions_for(&self, param: &str) -> &[String] {
		self.command.completions_for(param)
	}
}

impl TemplateEntry for ContextDefinition {
	fn template(&self) -> &RouteTemplate {
		&self.template
	}

	fn module(&self) -> ModuleId {
		self.module
	}

	fn ordinal(&self) -> u64 {
		self.ordinal
	}

	fn description(&self) -> Option<&str> {
		self.description.as_deref()
	}
}
