//! `kestrel` command-line front end.
//!
//! Loads a TOML route table into a [`RoutingRegistry`] and runs one-shot
//! resolution, completion, or a line-oriented REPL against it.

mod cli;
mod output;
mod table;

use std::io::{BufRead, Write};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use kestrel_route::split_args;
use kestrel_router::{
	CallerScope, Channel, DirectInvoker, Dispatch, Router, RouterOptions, RoutingRegistry, ScopeId,
};
use tracing::info;

use crate::cli::{Action, Cli};
use crate::table::RouteTable;

fn main() -> anyhow::Result<ExitCode> {
	let cli = Cli::parse();
	setup_tracing();

	let options = match &cli.config {
		Some(path) => RouterOptions::load(path)?,
		None => RouterOptions::default(),
	};
	let registry = Arc::new(RoutingRegistry::new());
	RouteTable::load(&cli.routes)?
		.install(&registry)
		.with_context(|| format!("failed to install {}", cli.routes.display()))?;
	info!(
		path = %cli.routes.display(),
		version = registry.version(),
		"route table loaded"
	);

	let router = Router::with_options(registry, options);
	let mut scope = CallerScope::new(ScopeId::new(cli.scope));
	for (key, value) in &cli.state {
		scope.state.set(key.as_str(), value.as_str());
	}

	match cli.command {
		Action::Resolve { tokens } => {
			let channel = cli.channel.map_or(Channel::Cli, Channel::from);
			let outcome = router
				.view(&scope, channel)
				.dispatch(&tokens, &mut DirectInvoker);
			print!("{}", output::render_dispatch(&outcome));
			Ok(exit_code(&outcome))
		}
		Action::Complete { next, mut tokens } => {
			let channel = cli.channel.map_or(Channel::Cli, Channel::from);
			let partial = if next { String::new() } else { tokens.pop().unwrap_or_default() };
			let completions = router.view(&scope, channel).complete(&tokens, &partial);
			print!("{}", output::render_completions(&completions));
			Ok(ExitCode::SUCCESS)
		}
		Action::Repl => {
			let channel = cli.channel.map_or(Channel::Interactive, Channel::from);
			repl(&router, &scope, channel)?;
			router.release_scope(scope.id);
			Ok(ExitCode::SUCCESS)
		}
	}
}

fn exit_code(outcome: &Dispatch) -> ExitCode {
	if output::is_success(outcome) {
		ExitCode::SUCCESS
	} else {
		ExitCode::from(1)
	}
}

/// Reads one input per line.
///
/// Entering a context makes its path the prefix for following lines; `..`
/// leaves the innermost context. `:complete <line>` lists candidates for the
/// last token of `<line>` (or a fresh token when `<line>` ends in a space),
/// and `:quit` exits.
fn repl(router: &Router, scope: &CallerScope, channel: Channel) -> anyhow::Result<()> {
	let stdin = std::io::stdin();
	let mut stdout = std::io::stdout().lock();
	let mut contexts: Vec<Vec<String>> = Vec::new();

	loop {
		let prefix = contexts.last().cloned().unwrap_or_default();
		if prefix.is_empty() {
			write!(stdout, "> ")?;
		} else {
			write!(stdout, "{}> ", prefix.join(" "))?;
		}
		stdout.flush()?;

		let mut line = String::new();
		if stdin.lock().read_line(&mut line)? == 0 {
			break;
		}
		let line = line.trim_end_matches(['\r', '\n']);
		let trimmed = line.trim();

		match trimmed {
			"" => continue,
			":quit" | ":q" => break,
			".." => {
				contexts.pop();
				continue;
			}
			_ => {}
		}

		if let Some(rest) = line.trim_start().strip_prefix(":complete") {
			let rest = rest.strip_prefix(' ').unwrap_or(rest);
			let mut tokens = match split_args(rest) {
				Ok(tokens) => tokens,
				Err(err) => {
					writeln!(stdout, "error: {err}")?;
					continue;
				}
			};
			let partial = if rest.is_empty() || rest.ends_with(char::is_whitespace) {
				String::new()
			} else {
				tokens.pop().unwrap_or_default()
			};
			let preceding: Vec<String> = prefix.iter().cloned().chain(tokens).collect();
			let completions = router.view(scope, channel).complete(&preceding, &partial);
			write!(stdout, "{}", output::render_completions(&completions))?;
			continue;
		}

		let tokens = match split_args(trimmed) {
			Ok(tokens) => tokens,
			Err(err) => {
				writeln!(stdout, "error: {err}")?;
				continue;
			}
		};
		let input: Vec<String> = prefix.iter().cloned().chain(tokens).collect();
		let outcome = router.view(scope, channel).dispatch(&input, &mut DirectInvoker);
		write!(stdout, "{}", output::render_dispatch(&outcome))?;
		if let Dispatch::EnteredContext { tokens, .. } = outcome {
			contexts.push(tokens);
		}
	}

	Ok(())
}

fn setup_tracing() {
	use tracing_subscriber::EnvFilter;
	use tracing_subscriber::prelude::*;

	let filter = EnvFilter::try_from_env("KESTREL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
	let layer = tracing_subscriber::fmt::layer()
		.with_writer(std::io::stderr)
		.with_target(true);

	tracing_subscriber::registry().with(filter).with(layer).init();
}
