use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

use super::*;
use crate::builder::TemplateBuilder;

#[test]
fn parses_literals_and_placeholders() {
	let template = RouteTemplate::parse("user {id:int} note {text?}").unwrap();
	assert_eq!(
		template.segments(),
		&[
			Segment::literal("user"),
			Segment::dynamic("id", ConstraintKind::Int),
			Segment::literal("note"),
			Segment::optional("text", ConstraintKind::String),
		]
	);
	assert_eq!(template.len(), 4);
	assert_eq!(template.required_count(), 3);
	assert_eq!(template.terminal_literal_index(), Some(2));
	assert_eq!(template.literal_path(), vec!["user"]);
	assert_eq!(template.parameter_names().collect::<Vec<_>>(), vec!["id", "text"]);
}

#[rstest]
#[case("{id?:int}", "{id:int?}")]
#[case("{id:INT}", "{id:int}")]
#[case("{name:string}", "{name}")]
#[case("  deploy   {env}  ", "deploy {env}")]
#[case("{slug:Slug}", "{slug:Slug}")]
fn canonical_text(#[case] input: &str, #[case] expected: &str) {
	assert_eq!(RouteTemplate::parse(input).unwrap().text(), expected);
}

#[rstest]
#[case("", TemplateError::Empty)]
#[case("   ", TemplateError::Empty)]
#[case("user {id", TemplateError::Unterminated { position: 5 })]
#[case("user {}", TemplateError::InvalidName { name: String::new(), position: 5 })]
#[case("user {id:}", TemplateError::EmptyConstraint { position: 8 })]
#[case("us{er", TemplateError::BraceInLiteral { literal: "us{er".into(), position: 0 })]
#[case("copy {path} {PATH}", TemplateError::DuplicateParameter { name: "PATH".into() })]
#[case("log {level?} {count:int}", TemplateError::RequiredAfterOptional { segment: "{count:int}".into() })]
fn rejects_malformed_templates(#[case] input: &str, #[case] expected: TemplateError) {
	assert_eq!(RouteTemplate::parse(input).unwrap_err(), expected);
}

#[test]
fn signature_ignores_names_and_literal_case() {
	let a = RouteTemplate::parse("User {id:int}").unwrap();
	let b = RouteTemplate::parse("user {n:int}").unwrap();
	let c = RouteTemplate::parse("user {n}").unwrap();
	assert_eq!(a.signature(), b.signature());
	assert_ne!(a.signature(), c.signature());
	assert_ne!(a, b, "equality still compares parameter names");
}

#[test]
fn builder_matches_parsed_form() {
	let built = TemplateBuilder::new()
		.literal("git remote")
		.param("name", ConstraintKind::Alpha)
		.optional("url", ConstraintKind::Url)
		.build()
		.unwrap();
	assert_eq!(built, RouteTemplate::parse("git remote {name:alpha} {url:url?}").unwrap());
	assert_eq!(built.text(), "git remote {name:alpha} {url:url?}");
}

#[test]
fn builder_rejects_custom_names_shadowing_builtins() {
	let err = TemplateBuilder::new()
		.param("n", ConstraintKind::Custom("INT".into()))
		.build()
		.unwrap_err();
	assert_eq!(err, TemplateError::ReservedConstraint { name: "INT".into() });
}

fn segment_strategy() -> impl Strategy<Value = Segment> {
	let kinds = prop_oneof![
		Just(ConstraintKind::String),
		Just(ConstraintKind::Int),
		Just(ConstraintKind::Guid),
		Just(ConstraintKind::DateTimeOffset),
		"[a-z]{3,6}".prop_map(|name| ConstraintKind::Custom(format!("x{name}"))),
	];
	prop_oneof![
		"[a-z][a-z0-9-]{0,7}".prop_map(Segment::Literal),
		("[a-z][a-z0-9_]{0,7}", kinds).prop_map(|(name, kind)| Segment::dynamic(name, kind)),
	]
}

proptest! {
	#[test]
	fn display_round_trips_through_parse(segments in prop::collection::vec(segment_strategy(), 1..6)) {
		// Deduplicate parameter names so the generated template is valid.
		let mut seen = rustc_hash::FxHashSet::default();
		let segments: Vec<Segment> = segments
			.into_iter()
			.filter(|s| s.name().is_none_or(|n| seen.insert(n.to_lowercase())))
			.collect();
		let template = RouteTemplate::from_segments(segments).unwrap();
		let reparsed = RouteTemplate::parse(template.text()).unwrap();
		prop_assert_eq!(&reparsed, &template);
		prop_assert_eq!(reparsed.text(), template.text());
	}
}
