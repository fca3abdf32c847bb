//! Command route resolution for kestrel.
//!
//! Routes and contexts are registered once into a [`RoutingRegistry`]; each
//! mutation publishes a new immutable snapshot and bumps the registry version.
//! A [`Router`] filters the snapshot per caller scope and channel into a cached
//! [`ActiveRoutingGraph`] and resolves token sequences against it.
//!
//! # Flow
//!
//! ```text
//! tokens
//!     → graph::GraphCache          (module-gated view for scope + channel)
//!     → resolve::prefix            (expand abbreviations, may report ambiguity)
//!     → resolve::route             (best match or best diagnostic)
//!     → resolve::context           (validate enclosing scopes)
//!     → Dispatch
//! ```

pub mod command;
pub mod complete;
pub mod defs;
pub mod error;
pub mod graph;
pub mod module;
pub mod options;
pub mod registry;
pub mod resolve;
pub mod router;
pub mod suggest;
pub mod values;

pub use command::{Command, OptionSpec};
pub use complete::{Completion, CompletionKind};
pub use defs::{ContextDefinition, ContextValidator, RouteDefinition, TemplateEntry};
pub use error::{ConfigError, RegistrationError};
pub use graph::{ActiveRoutingGraph, CacheStats, GraphCache};
pub use kestrel_route::{ConstraintKind, RouteTemplate, Segment, TemplateBuilder};
pub use module::{
	CallerScope, Channel, ModuleDefinition, ModuleId, PresenceContext, PresenceError,
	PresencePredicate, ScopeId, SessionInfo, SessionState, presence,
};
pub use options::{CompletionOptions, RouterOptions, SuggestionOptions};
pub use registry::{IntoTemplate, RegistrySnapshot, RoutingRegistry};
pub use resolve::context::{ContextInvoker, ContextMatch, ContextRejection, DirectInvoker};
pub use resolve::prefix::{AmbiguousPrefix, PrefixResolution};
pub use resolve::route::{
	ConstraintFailure, MissingArgumentsFailure, ResolutionResult, RouteMatch,
};
pub use router::{Dispatch, Router, RouterView};
pub use suggest::Suggestion;
pub use values::CapturedValues;
