/// Template grammar violation, reported at registration time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
	#[error("template is empty")]
	Empty,
	#[error("unterminated placeholder at position {position}")]
	Unterminated { position: usize },
	#[error("invalid parameter name {name:?} at position {position}")]
	InvalidName { name: String, position: usize },
	#[error("empty constraint name at position {position}")]
	EmptyConstraint { position: usize },
	#[error("literal {literal:?} at position {position} contains a brace")]
	BraceInLiteral { literal: String, position: usize },
	#[error("duplicate parameter {name:?}")]
	DuplicateParameter { name: String },
	#[error("required segment {segment:?} follows an optional segment")]
	RequiredAfterOptional { segment: String },
	#[error("custom constraint {name:?} collides with a built-in constraint kind")]
	ReservedConstraint { name: String },
}

/// Input line could not be split into tokens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenizeError {
	#[error("unterminated {quote} quote starting at position {position}")]
	UnterminatedQuote { quote: char, position: usize },
	#[error("trailing backslash at end of input")]
	TrailingBackslash,
}
