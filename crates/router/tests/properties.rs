use std::sync::Arc;

use kestrel_router::{
	CallerScope, Channel, Command, ConstraintKind, DirectInvoker, Dispatch, ModuleId, RouteTemplate,
	Router, RoutingRegistry, Segment,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// A template segment paired with a token that satisfies it.
#[derive(Debug, Clone)]
struct Bound {
	segment: Segment,
	token: String,
}

fn literal() -> impl Strategy<Value = Bound> {
	"[a-z]{3,8}".prop_map(|word| Bound {
		segment: Segment::literal(word.clone()),
		token: word,
	})
}

fn guid_token() -> impl Strategy<Value = String> {
	any::<u128>().prop_map(|n| {
		let hex = format!("{n:032x}");
		format!("{}-{}-{}-{}-{}", &hex[..8], &hex[8..12], &hex[12..16], &hex[16..20], &hex[20..])
	})
}

fn dynamic(index: usize) -> impl Strategy<Value = Bound> {
	let name = format!("p{index}");
	prop_oneof![
		"[a-z0-9]{1,8}".prop_map(|t| (ConstraintKind::String, t)),
		"[a-zA-Z]{1,8}".prop_map(|t| (ConstraintKind::Alpha, t)),
		any::<i32>().prop_map(|n| (ConstraintKind::Int, n.to_string())),
		any::<i64>().prop_map(|n| (ConstraintKind::Long, n.to_string())),
		prop_oneof![Just("true"), Just("FALSE")].prop_map(|t| (ConstraintKind::Bool, t.to_string())),
		guid_token().prop_map(|t| (ConstraintKind::Guid, t)),
	]
	.prop_map(move |(kind, token)| Bound {
		segment: Segment::dynamic(name.clone(), kind),
		token,
	})
}

/// A route whose first segment is a literal, followed by a mix of literals
/// and dynamics with unique parameter names.
fn bound_route() -> impl Strategy<Value = Vec<Bound>> {
	(literal(), prop::collection::vec(prop::bool::ANY, 0..5)).prop_flat_map(|(head, shape)| {
		let tail: Vec<BoxedStrategy<Bound>> = shape
			.into_iter()
			.enumerate()
			.map(|(i, is_literal)| if is_literal { literal().boxed() } else { dynamic(i).boxed() })
			.collect();
		tail.prop_map(move |tail| {
			let mut all = vec![head.clone()];
			all.extend(tail);
			all
		})
	})
}

fn register(bound: &[Bound]) -> (Router, RouteTemplate) {
	let registry = Arc::new(RoutingRegistry::new());
	let template = RouteTemplate::from_segments(bound.iter().map(|b| b.segment.clone()).collect()).unwrap();
	registry
		.register_route(&template, Command::default(), ModuleId::ALWAYS)
		.unwrap();
	(Router::new(registry), template)
}

proptest! {
	#[test]
	fn substituted_skeleton_resolves_to_its_route(bound in bound_route()) {
		let (router, template) = register(&bound);
		let tokens: Vec<&str> = bound.iter().map(|b| b.token.as_str()).collect();

		let view = router.view(&CallerScope::root(), Channel::Cli);
		let matched = view.resolve(&tokens).expect("skeleton resolves");
		prop_assert_eq!(matched.route.template.text(), template.text());
		prop_assert!(matched.remaining.is_empty());
		for b in &bound {
			if let Some(name) = b.segment.name() {
				prop_assert_eq!(matched.values.get(name), Some(b.token.as_str()));
			}
		}
		prop_assert_eq!(matched.values.len(), template.parameter_names().count());
	}

	#[test]
	fn truncated_input_names_every_missing_segment(bound in bound_route(), cut in 1usize..6) {
		let cut = cut.min(bound.len());
		prop_assume!(cut < bound.len());

		let (router, _) = register(&bound);
		let tokens: Vec<&str> = bound[..cut].iter().map(|b| b.token.as_str()).collect();
		let result = router
			.view(&CallerScope::root(), Channel::Cli)
			.resolve_with_diagnostics(&tokens);

		prop_assert!(result.matched.is_none());
		let failure = result.missing_arguments.expect("missing arguments reported");
		let expected: Vec<Segment> = bound[cut..].iter().map(|b| b.segment.clone()).collect();
		prop_assert_eq!(failure.missing, expected);
		prop_assert_eq!(failure.matched_count, cut);
	}

	#[test]
	fn display_round_trips(bound in bound_route()) {
		let (_, template) = register(&bound);
		let reparsed = RouteTemplate::parse(&template.to_string()).unwrap();
		prop_assert_eq!(reparsed, template);
	}
}

#[test]
fn show_status_stats_ambiguity() {
	let registry = Arc::new(RoutingRegistry::new());
	registry
		.register_route("show status", Command::default(), ModuleId::ALWAYS)
		.unwrap();
	registry
		.register_route("show stats", Command::default(), ModuleId::ALWAYS)
		.unwrap();
	let router = Router::new(registry);
	let view = router.view(&CallerScope::root(), Channel::Interactive);

	let prefixes = view.resolve_unique_prefixes(&["sh", "st"]);
	assert_eq!(prefixes.tokens[0], "show");
	let ambiguous = prefixes.ambiguous.unwrap();
	assert_eq!(ambiguous.position, 1);
	assert_eq!(ambiguous.candidates, vec!["status", "stats"]);
}

#[test]
fn typed_overload_wins() {
	let registry = Arc::new(RoutingRegistry::new());
	registry
		.register_route("user {name}", Command::default(), ModuleId::ALWAYS)
		.unwrap();
	registry
		.register_route("user {id:int}", Command::default(), ModuleId::ALWAYS)
		.unwrap();
	let router = Router::new(registry);
	let matched = router
		.view(&CallerScope::root(), Channel::Cli)
		.resolve(&["user", "42"])
		.unwrap();
	assert_eq!(matched.route.template.text(), "user {id:int}");
}

#[test]
fn aliases_apply_only_at_their_own_terminal_literal() {
	let registry = Arc::new(RoutingRegistry::new());
	registry
		.register_route("deploy {env}", Command::new("deploy").alias("d"), ModuleId::ALWAYS)
		.unwrap();
	registry
		.register_route("service restart", Command::new("restart").alias("rs"), ModuleId::ALWAYS)
		.unwrap();
	registry
		.register_route("rs {x} status", Command::default(), ModuleId::ALWAYS)
		.unwrap();
	registry
		.register_route("service status", Command::default(), ModuleId::ALWAYS)
		.unwrap();
	let router = Router::new(registry);
	let view = router.view(&CallerScope::root(), Channel::Cli);

	let matched = view.resolve(&["d", "prod"]).unwrap();
	assert_eq!(matched.route.template.text(), "deploy {env}");
	assert_eq!(matched.values.get("env"), Some("prod"));

	assert_eq!(
		view.resolve(&["service", "rs"]).unwrap().route.template.text(),
		"service restart"
	);
	assert!(view.resolve(&["rs", "status"]).is_none());
}

#[test]
fn registration_refreshes_every_cached_channel() {
	let registry = Arc::new(RoutingRegistry::new());
	let router = Router::new(Arc::clone(&registry));
	let scope = CallerScope::root();
	for channel in Channel::ALL {
		assert!(router.view(&scope, channel).resolve(&["ping"]).is_none());
	}

	registry
		.register_route("ping", Command::default(), ModuleId::ALWAYS)
		.unwrap();
	for channel in Channel::ALL {
		assert!(router.view(&scope, channel).resolve(&["ping"]).is_some());
	}
}

#[test]
fn repeated_resolution_is_identical() {
	let registry = Arc::new(RoutingRegistry::new());
	registry
		.register_route("copy {src} {dst} {mode?}", Command::default(), ModuleId::ALWAYS)
		.unwrap();
	let router = Router::new(registry);
	let view = router.view(&CallerScope::root(), Channel::Cli);
	let tokens = ["copy", "a.txt", "b.txt", "fast", "--force"];
	assert_eq!(view.resolve(&tokens), view.resolve(&tokens));
	assert_eq!(
		view.dispatch(&tokens, &mut DirectInvoker),
		view.dispatch(&tokens, &mut DirectInvoker)
	);
}

#[test]
fn panicking_presence_hides_module() {
	fn broken(_: &kestrel_router::PresenceContext<'_>) -> Result<bool, kestrel_router::PresenceError> {
		panic!("presence predicate exploded")
	}

	let registry = Arc::new(RoutingRegistry::new());
	let module = registry.register_module("broken", Arc::new(broken)).unwrap();
	registry
		.register_route("explode", Command::default(), module)
		.unwrap();
	registry
		.register_route("safe", Command::default(), ModuleId::ALWAYS)
		.unwrap();
	let router = Router::new(registry);
	let view = router.view(&CallerScope::root(), Channel::Session);

	assert!(matches!(
		view.dispatch(&["explode"], &mut DirectInvoker),
		Dispatch::Unknown { .. }
	));
	assert!(view.resolve(&["safe"]).is_some());
}
