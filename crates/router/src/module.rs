//! Modules, caller scopes, and presence gating.
//!
//! # Role
//!
//! A module groups routes and contexts that appear or disappear together. Its
//! presence predicate is evaluated once per graph computation for a given
//! caller scope and channel.
//!
//! # Invariants
//!
//! - [`ModuleId::ALWAYS`] is implicitly registered and always present.
//! - A predicate that errors or panics marks its module absent for that graph.

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::str::FromStr;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::warn;

/// Identifier handed out by module registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ModuleId(u32);

impl ModuleId {
	/// The implicit module whose members are present everywhere.
	pub const ALWAYS: Self = Self(0);

	pub(crate) const fn from_raw(raw: u32) -> Self {
		Self(raw)
	}

	pub const fn as_u32(self) -> u32 {
		self.0
	}

	pub const fn is_always(self) -> bool {
		self.0 == 0
	}
}

impl fmt::Display for ModuleId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "module#{}", self.0)
	}
}

/// Surface through which input arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
	/// One-shot process invocation.
	Cli,
	/// Local interactive prompt.
	Interactive,
	/// Remote or hosted session.
	Session,
}

impl Channel {
	pub const ALL: [Channel; 3] = [Channel::Cli, Channel::Interactive, Channel::Session];

	pub fn name(self) -> &'static str {
		match self {
			Self::Cli => "cli",
			Self::Interactive => "interactive",
			Self::Session => "session",
		}
	}
}

impl fmt::Display for Channel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl FromStr for Channel {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Channel::ALL
			.into_iter()
			.find(|channel| channel.name().eq_ignore_ascii_case(s))
			.ok_or_else(|| format!("unknown channel `{s}` (expected cli, interactive, or session)"))
	}
}

/// Caller scope identifier. Graphs are cached per scope and channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ScopeId(u64);

impl ScopeId {
	/// Scope used when the caller has no session of its own.
	pub const ROOT: Self = Self(0);

	pub const fn new(raw: u64) -> Self {
		Self(raw)
	}

	pub const fn as_u64(self) -> u64 {
		self.0
	}
}

impl fmt::Display for ScopeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "scope#{}", self.0)
	}
}

/// Key/value state a caller carries between commands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
	values: FxHashMap<String, String>,
}

impl SessionState {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn get(&self, key: &str) -> Option<&str> {
		self.values.get(key).map(String::as_str)
	}

	pub fn contains(&self, key: &str) -> bool {
		self.values.contains_key(key)
	}

	pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
		self.values.insert(key.into(), value.into())
	}

	pub fn remove(&mut self, key: &str) -> Option<String> {
		self.values.remove(key)
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}
}

/// Descriptive facts about the caller's session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionInfo {
	pub session_id: Option<String>,
	pub client: Option<String>,
}

/// Everything a presence predicate may inspect about the caller.
#[derive(Debug, Clone, Default)]
pub struct CallerScope {
	pub id: ScopeId,
	pub state: SessionState,
	pub info: SessionInfo,
}

impl CallerScope {
	pub fn new(id: ScopeId) -> Self {
		Self {
			id,
			..Self::default()
		}
	}

	pub fn root() -> Self {
		Self::default()
	}

	pub fn with_state(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.state.set(key, value);
		self
	}
}

/// Borrowed view handed to presence predicates.
#[derive(Debug, Clone, Copy)]
pub struct PresenceContext<'a> {
	pub scope: ScopeId,
	pub channel: Channel,
	pub state: &'a SessionState,
	pub info: &'a SessionInfo,
}

impl<'a> PresenceContext<'a> {
	pub fn new(scope: &'a CallerScope, channel: Channel) -> Self {
		Self {
			scope: scope.id,
			channel,
			state: &scope.state,
			info: &scope.info,
		}
	}
}

pub type PresenceError = Box<dyn std::error::Error + Send + Sync>;

/// Decides whether a module is present for one caller scope and channel.
pub type PresencePredicate =
	Arc<dyn Fn(&PresenceContext<'_>) -> Result<bool, PresenceError> + Send + Sync>;

/// Stock presence predicates.
pub mod presence {
	use super::{Channel, PresenceContext, PresencePredicate};
	use std::sync::Arc;

	/// Present everywhere.
	pub fn always() -> PresencePredicate {
		Arc::new(|_| Ok(true))
	}

	/// Present nowhere.
	pub fn never() -> PresencePredicate {
		Arc::new(|_| Ok(false))
	}

	/// Wraps an infallible predicate.
	pub fn when<F>(f: F) -> PresencePredicate
	where
		F: Fn(&PresenceContext<'_>) -> bool + Send + Sync + 'static,
	{
		Arc::new(move |cx| Ok(f(cx)))
	}

	/// Present only on the listed channels.
	pub fn channels(channels: &[Channel]) -> PresencePredicate {
		let channels = channels.to_vec();
		when(move |cx| channels.contains(&cx.channel))
	}

	/// Present when the session state holds `key`.
	pub fn requires_state(key: impl Into<String>) -> PresencePredicate {
		let key = key.into();
		when(move |cx| cx.state.contains(&key))
	}
}

/// A registered module.
#[derive(Clone)]
pub struct ModuleDefinition {
	pub id: ModuleId,
	pub name: String,
	pub presence: PresencePredicate,
}

impl ModuleDefinition {
	/// Evaluates presence, treating errors and panics as absence.
	pub fn is_present(&self, cx: &PresenceContext<'_>) -> bool {
		match catch_unwind(AssertUnwindSafe(|| (self.presence)(cx))) {
			Ok(Ok(present)) => present,
			Ok(Err(error)) => {
				warn!(module = %self.name, scope = %cx.scope, channel = %cx.channel, %error, "presence predicate failed; module treated as absent");
				false
			}
			Err(_) => {
				warn!(module = %self.name, scope = %cx.scope, channel = %cx.channel, "presence predicate panicked; module treated as absent");
				false
			}
		}
	}
}

impl fmt::Debug for ModuleDefinition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ModuleDefinition")
			.field("id", &self.id)
			.field("name", &self.name)
			.finish_non_exhaustive()
	}
}
