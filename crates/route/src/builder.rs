//! Explicit template construction for callers that declare parameters in code.

use crate::error::TemplateError;
use crate::segment::{ConstraintKind, Segment};
use crate::template::RouteTemplate;

/// Builds a [`RouteTemplate`] segment by segment.
///
/// `TemplateBuilder::new().literal("user").param("id", ConstraintKind::Int)`
/// produces the same template as parsing `user {id:int}`.
#[derive(Debug, Default, Clone)]
pub struct TemplateBuilder {
	segments: Vec<Segment>,
}

impl TemplateBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends one literal token. Whitespace-separated words become separate literals.
	pub fn literal(mut self, value: &str) -> Self {
		self.segments
			.extend(value.split_whitespace().map(Segment::literal));
		self
	}

	/// Appends a required parameter.
	pub fn param(mut self, name: impl Into<String>, kind: ConstraintKind) -> Self {
		self.segments.push(Segment::dynamic(name, kind));
		self
	}

	/// Appends an optional parameter.
	pub fn optional(mut self, name: impl Into<String>, kind: ConstraintKind) -> Self {
		self.segments.push(Segment::optional(name, kind));
		self
	}

	pub fn build(self) -> Result<RouteTemplate, TemplateError> {
		RouteTemplate::from_segments(self.segments)
	}
}
