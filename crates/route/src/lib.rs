//! Route template grammar and token evaluation for kestrel.
//!
//! This crate is the leaf of the routing stack: it parses templates such as
//! `user {id:int} rename {name?}` into [`RouteTemplate`]s, evaluates tokens
//! against segment constraints, and splits raw input lines into tokens. It
//! holds no mutable state.

pub mod builder;
pub mod constraint;
pub mod error;
pub mod segment;
pub mod template;
pub mod tokenize;

pub use builder::TemplateBuilder;
pub use constraint::{
	ConstraintPredicate, ConstraintRegistry, MatchOptions, is_match, kind_matches, literal_eq,
	literal_starts_with,
};
pub use error::{TemplateError, TokenizeError};
pub use segment::{ConstraintKind, DYNAMIC_SCORE, LITERAL_SCORE, Segment};
pub use template::RouteTemplate;
pub use tokenize::split_args;
