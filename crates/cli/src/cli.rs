use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use kestrel_router::Channel;

#[derive(Parser, Debug)]
#[command(name = "kestrel")]
#[command(about = "Resolve, complete, and explore command route tables")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Route table to load
	#[arg(long, short = 'r', value_name = "PATH")]
	pub routes: PathBuf,

	/// Router options file
	#[arg(long, short = 'c', value_name = "PATH")]
	pub config: Option<PathBuf>,

	/// Channel the input arrives on (defaults to `interactive` for the REPL)
	#[arg(long, value_enum)]
	pub channel: Option<ChannelArg>,

	/// Caller scope id
	#[arg(long, default_value_t = 0)]
	pub scope: u64,

	/// Session state entry visible to module presence rules, as KEY=VALUE
	#[arg(long = "state", short = 's', value_name = "KEY=VALUE", value_parser = parse_state)]
	pub state: Vec<(String, String)>,

	/// Action to perform.
	#[command(subcommand)]
	pub command: Action,
}

/// Available actions.
#[derive(Subcommand, Debug)]
pub enum Action {
	/// Dispatch one input and print the outcome
	Resolve {
		/// Input tokens
		#[arg(trailing_var_arg = true, allow_hyphen_values = true)]
		tokens: Vec<String>,
	},
	/// List candidates for the last token
	Complete {
		/// Complete a fresh token after all given tokens
		#[arg(long)]
		next: bool,

		/// Preceding tokens followed by the partial token
		#[arg(trailing_var_arg = true, allow_hyphen_values = true)]
		tokens: Vec<String>,
	},
	/// Read inputs from stdin line by line
	Repl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChannelArg {
	Cli,
	Interactive,
	Session,
}

impl From<ChannelArg> for Channel {
	fn from(arg: ChannelArg) -> Self {
		match arg {
			ChannelArg::Cli => Channel::Cli,
			ChannelArg::Interactive => Channel::Interactive,
			ChannelArg::Session => Channel::Session,
		}
	}
}

fn parse_state(raw: &str) -> Result<(String, String), String> {
	match raw.split_once('=') {
		Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
		_ => Err(format!("expected KEY=VALUE, got `{raw}`")),
	}
}

#[cfg(test)]
mod tests {
	use clap::Parser;
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn parses_resolve_with_hyphenated_tokens() {
		let cli = Cli::try_parse_from([
			"kestrel", "--routes", "t.toml", "--state", "user=ada", "resolve", "push", "--force",
		])
		.unwrap();
		assert_eq!(cli.state, vec![("user".to_string(), "ada".to_string())]);
		let Action::Resolve { tokens } = cli.command else {
			panic!("expected resolve");
		};
		assert_eq!(tokens, vec!["push", "--force"]);
	}

	#[test]
	fn rejects_malformed_state() {
		assert!(Cli::try_parse_from(["kestrel", "-r", "t.toml", "-s", "=x", "repl"]).is_err());
		assert!(Cli::try_parse_from(["kestrel", "-r", "t.toml", "-s", "novalue", "repl"]).is_err());
	}

	#[test]
	fn channel_maps_onto_router_channel() {
		let cli = Cli::try_parse_from(["kestrel", "-r", "t.toml", "--channel", "session", "repl"]).unwrap();
		assert_eq!(cli.channel.map(Channel::from), Some(Channel::Session));
	}
}
