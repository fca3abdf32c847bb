//! Segment vocabulary shared by route and context templates.

use std::fmt;

/// Declared shape a dynamic segment's token must satisfy.
///
/// The set is closed apart from [`ConstraintKind::Custom`], which names a
/// predicate registered in a [`crate::ConstraintRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
	String,
	Alpha,
	Bool,
	Email,
	Uri,
	Url,
	Urn,
	Time,
	Date,
	DateTime,
	DateTimeOffset,
	TimeSpan,
	Guid,
	Long,
	Int,
	Custom(String),
}

impl ConstraintKind {
	/// Parses a constraint name as written after `:` in a template.
	///
	/// Built-in names are matched case-insensitively; anything else is a
	/// custom constraint whose name is kept verbatim.
	pub fn from_name(name: &str) -> Self {
		match name.to_ascii_lowercase().as_str() {
			"string" => Self::String,
			"alpha" => Self::Alpha,
			"bool" => Self::Bool,
			"email" => Self::Email,
			"uri" => Self::Uri,
			"url" => Self::Url,
			"urn" => Self::Urn,
			"time" => Self::Time,
			"date" => Self::Date,
			"datetime" => Self::DateTime,
			"datetimeoffset" => Self::DateTimeOffset,
			"timespan" => Self::TimeSpan,
			"guid" => Self::Guid,
			"long" => Self::Long,
			"int" => Self::Int,
			_ => Self::Custom(name.to_string()),
		}
	}

	/// Canonical lowercase name used by display formatting.
	pub fn name(&self) -> &str {
		match self {
			Self::String => "string",
			Self::Alpha => "alpha",
			Self::Bool => "bool",
			Self::Email => "email",
			Self::Uri => "uri",
			Self::Url => "url",
			Self::Urn => "urn",
			Self::Time => "time",
			Self::Date => "date",
			Self::DateTime => "datetime",
			Self::DateTimeOffset => "datetimeoffset",
			Self::TimeSpan => "timespan",
			Self::Guid => "guid",
			Self::Long => "long",
			Self::Int => "int",
			Self::Custom(name) => name,
		}
	}

	/// Tie-break bonus for a matched dynamic segment. Narrower kinds score higher.
	pub const fn specificity(&self) -> i32 {
		match self {
			Self::String => 0,
			Self::Alpha => 2,
			Self::Long => 3,
			Self::Int => 4,
			Self::Bool => 5,
			Self::Email
			| Self::Uri
			| Self::Url
			| Self::Urn
			| Self::Time
			| Self::Date
			| Self::DateTime
			| Self::DateTimeOffset
			| Self::TimeSpan => 6,
			Self::Custom(_) => 7,
			Self::Guid => 8,
		}
	}

	pub fn is_custom(&self) -> bool {
		matches!(self, Self::Custom(_))
	}
}

impl fmt::Display for ConstraintKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// One space-separated unit of a template.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
	/// Fixed token matched case-insensitively.
	Literal(String),
	/// Placeholder capturing one token.
	Dynamic {
		name: String,
		kind: ConstraintKind,
		optional: bool,
	},
}

impl Segment {
	pub fn literal(value: impl Into<String>) -> Self {
		Self::Literal(value.into())
	}

	pub fn dynamic(name: impl Into<String>, kind: ConstraintKind) -> Self {
		Self::Dynamic {
			name: name.into(),
			kind,
			optional: false,
		}
	}

	pub fn optional(name: impl Into<String>, kind: ConstraintKind) -> Self {
		Self::Dynamic {
			name: name.into(),
			kind,
			optional: true,
		}
	}

	pub fn is_literal(&self) -> bool {
		matches!(self, Self::Literal(_))
	}

	pub fn is_optional(&self) -> bool {
		matches!(self, Self::Dynamic { optional: true, .. })
	}

	pub fn as_literal(&self) -> Option<&str> {
		match self {
			Self::Literal(value) => Some(value),
			Self::Dynamic { .. } => None,
		}
	}

	/// Parameter name of a dynamic segment.
	pub fn name(&self) -> Option<&str> {
		match self {
			Self::Literal(_) => None,
			Self::Dynamic { name, .. } => Some(name),
		}
	}

	pub fn kind(&self) -> Option<&ConstraintKind> {
		match self {
			Self::Literal(_) => None,
			Self::Dynamic { kind, .. } => Some(kind),
		}
	}

	/// Score contributed when this segment matches a token.
	pub fn match_score(&self) -> i32 {
		match self {
			Self::Literal(_) => LITERAL_SCORE,
			Self::Dynamic { kind, .. } => DYNAMIC_SCORE + kind.specificity(),
		}
	}
}

/// Score for a matched literal segment.
pub const LITERAL_SCORE: i32 = 100;
/// Base score for a matched dynamic segment, before specificity.
pub const DYNAMIC_SCORE: i32 = 10;

impl fmt::Display for Segment {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Literal(value) => f.write_str(value),
			Self::Dynamic { name, kind, optional } => {
				f.write_str("{")?;
				f.write_str(name)?;
				if *kind != ConstraintKind::String {
					write!(f, ":{kind}")?;
				}
				if *optional {
					f.write_str("?")?;
				}
				f.write_str("}")
			}
		}
	}
}
