use std::sync::Arc;

use pretty_assertions::assert_eq;
use rstest::rstest;

use super::*;
use crate::command::OptionSpec;
use crate::module::presence;

#[test]
fn each_registration_bumps_version() {
	let registry = RoutingRegistry::new();
	assert_eq!(registry.version(), 0);

	registry
		.register_route("status", Command::new("show status"), ModuleId::ALWAYS)
		.unwrap();
	let admin = registry.register_module("admin", presence::always()).unwrap();
	registry
		.register_context("project {name}", None, None, admin)
		.unwrap();
	registry
		.register_constraint("slug", Arc::new(|t: &str| !t.is_empty()))
		.unwrap();
	assert_eq!(registry.version(), 4);

	let snap = registry.snapshot();
	assert_eq!(snap.routes.len(), 1);
	assert_eq!(snap.contexts.len(), 1);
	assert_eq!(snap.modules.len(), 1);
	assert_eq!(snap.constraints.len(), 1);
}

#[test]
fn ordinals_follow_registration_order_across_kinds() {
	let registry = RoutingRegistry::new();
	let a = registry
		.register_route("a", Command::default(), ModuleId::ALWAYS)
		.unwrap();
	let ctx = registry
		.register_context("ctx", None, None, ModuleId::ALWAYS)
		.unwrap();
	let b = registry
		.register_route("b", Command::default(), ModuleId::ALWAYS)
		.unwrap();
	assert!(a.ordinal < ctx.ordinal && ctx.ordinal < b.ordinal);
}

#[test]
fn duplicate_signature_in_same_module_is_rejected() {
	let registry = RoutingRegistry::new();
	registry
		.register_route("user {id:int}", Command::default(), ModuleId::ALWAYS)
		.unwrap();
	let before = registry.version();

	let err = registry
		.register_route("USER {other:int}", Command::default(), ModuleId::ALWAYS)
		.unwrap_err();
	assert_eq!(
		err,
		RegistrationError::DuplicateTemplate {
			template: "USER {other:int}".into(),
			module: ModuleId::ALWAYS,
		}
	);
	assert_eq!(registry.version(), before, "failed registration publishes nothing");
}

#[test]
fn same_signature_in_different_modules_is_allowed() {
	let registry = RoutingRegistry::new();
	let extra = registry.register_module("extra", presence::always()).unwrap();
	registry
		.register_route("deploy {env}", Command::default(), ModuleId::ALWAYS)
		.unwrap();
	registry
		.register_route("deploy {target}", Command::default(), extra)
		.unwrap();
	assert_eq!(registry.snapshot().routes.len(), 2);
}

#[test]
fn distinct_kinds_are_distinct_signatures() {
	let registry = RoutingRegistry::new();
	registry
		.register_route("get {id:int}", Command::default(), ModuleId::ALWAYS)
		.unwrap();
	registry
		.register_route("get {id:guid}", Command::default(), ModuleId::ALWAYS)
		.unwrap();
	assert_eq!(registry.snapshot().routes.len(), 2);
}

#[test]
fn unknown_module_is_rejected() {
	let registry = RoutingRegistry::new();
	let bogus = ModuleId::from_raw(7);
	assert_eq!(
		registry
			.register_route("x", Command::default(), bogus)
			.unwrap_err(),
		RegistrationError::UnknownModule { module: bogus }
	);
	assert_eq!(
		registry
			.set_module_presence(bogus, presence::never())
			.unwrap_err(),
		RegistrationError::UnknownModule { module: bogus }
	);
}

#[test]
fn unknown_custom_constraint_is_rejected_until_registered() {
	let registry = RoutingRegistry::new();
	let err = registry
		.register_route("open {slug:Slug}", Command::default(), ModuleId::ALWAYS)
		.unwrap_err();
	assert_eq!(
		err,
		RegistrationError::UnknownConstraint {
			template: "open {slug:Slug}".into(),
			name: "Slug".into(),
		}
	);

	registry
		.register_constraint("slug", Arc::new(|t: &str| t.chars().all(|c| c.is_ascii_lowercase() || c == '-')))
		.unwrap();
	registry
		.register_route("open {slug:Slug}", Command::default(), ModuleId::ALWAYS)
		.unwrap();
}

#[rstest]
#[case("int")]
#[case("GUID")]
#[case("DateTimeOffset")]
fn builtin_constraint_names_are_reserved(#[case] name: &str) {
	let registry = RoutingRegistry::new();
	assert_eq!(
		registry
			.register_constraint(name, Arc::new(|_: &str| true))
			.unwrap_err(),
		RegistrationError::ReservedConstraint { name: name.into() }
	);
}

#[test]
fn duplicate_constraint_and_module_names_are_rejected() {
	let registry = RoutingRegistry::new();
	registry
		.register_constraint("hex", Arc::new(|_: &str| true))
		.unwrap();
	assert_eq!(
		registry
			.register_constraint("HEX", Arc::new(|_: &str| true))
			.unwrap_err(),
		RegistrationError::DuplicateConstraint { name: "HEX".into() }
	);

	registry.register_module("git", presence::always()).unwrap();
	assert_eq!(
		registry
			.register_module("Git", presence::always())
			.unwrap_err(),
		RegistrationError::DuplicateModule { name: "Git".into() }
	);
}

#[test]
fn option_collision_is_rejected() {
	let registry = RoutingRegistry::new();
	let command = Command::new("push")
		.option(OptionSpec::flag("force").short('f'))
		.option(OptionSpec::flag("follow").short('f'));
	assert_eq!(
		registry
			.register_route("push", command, ModuleId::ALWAYS)
			.unwrap_err(),
		RegistrationError::OptionCollision {
			template: "push".into(),
			token: "-f".into(),
		}
	);
}

#[test]
fn template_errors_surface_through_registration() {
	let registry = RoutingRegistry::new();
	assert!(matches!(
		registry.register_route("user {id", Command::default(), ModuleId::ALWAYS),
		Err(RegistrationError::Template(TemplateError::Unterminated { .. }))
	));
	assert_eq!(registry.version(), 0);
}

#[test]
fn set_module_presence_replaces_predicate() {
	let registry = RoutingRegistry::new();
	let id = registry.register_module("beta", presence::never()).unwrap();
	registry.set_module_presence(id, presence::always()).unwrap();

	let snap = registry.snapshot();
	let module = snap.module(id).unwrap();
	let scope = crate::module::CallerScope::root();
	let cx = crate::module::PresenceContext::new(&scope, crate::module::Channel::Cli);
	assert!(module.is_present(&cx));
	assert_eq!(module.name, "beta");
}

#[test]
fn held_snapshot_is_unaffected_by_later_registration() {
	let registry = RoutingRegistry::new();
	registry
		.register_route("a", Command::default(), ModuleId::ALWAYS)
		.unwrap();
	let pinned = registry.snapshot();
	registry
		.register_route("b", Command::default(), ModuleId::ALWAYS)
		.unwrap();
	assert_eq!(pinned.routes.len(), 1);
	assert_eq!(registry.snapshot().routes.len(), 2);
}

#[test]
fn invalidate_bumps_version_only() {
	let registry = RoutingRegistry::new();
	registry
		.register_route("a", Command::default(), ModuleId::ALWAYS)
		.unwrap();
	assert_eq!(registry.invalidate(), 2);
	assert_eq!(registry.snapshot().routes.len(), 1);
}

#[test]
fn concurrent_registration_loses_nothing() {
	let registry = RoutingRegistry::new();
	std::thread::scope(|s| {
		for t in 0..4 {
			let registry = &registry;
			s.spawn(move || {
				for i in 0..25 {
					registry
						.register_route(
							format!("cmd{t} sub{i}").as_str(),
							Command::default(),
							ModuleId::ALWAYS,
						)
						.unwrap();
				}
			});
		}
	});
	let snap = registry.snapshot();
	assert_eq!(snap.routes.len(), 100);
	assert_eq!(snap.version, 100);
}
