//! Token resolution against an [`ActiveRoutingGraph`](crate::ActiveRoutingGraph).
//!
//! All resolvers are pure functions of the graph and the tokens.

pub mod context;
pub mod prefix;
pub mod route;

pub(crate) fn owned_tokens<S: AsRef<str>>(tokens: &[S]) -> Vec<String> {
	tokens.iter().map(|t| t.as_ref().to_string()).collect()
}
