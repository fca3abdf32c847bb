use std::sync::Arc;

use rstest::rstest;

use super::*;

fn eval(kind: ConstraintKind, token: &str) -> bool {
	let registry = ConstraintRegistry::new();
	kind_matches(&kind, token, &MatchOptions::new(&registry))
}

#[rstest]
#[case("42", true)]
#[case("-7", true)]
#[case("+7", true)]
#[case("1_000", true)]
#[case("2147483647", true)]
#[case("2147483648", false)]
#[case("1__0", false)]
#[case("_1", false)]
#[case("1_", false)]
#[case("-", false)]
#[case("12a", false)]
#[case("", false)]
fn int_grammar(#[case] token: &str, #[case] expected: bool) {
	assert_eq!(eval(ConstraintKind::Int, token), expected);
}

#[test]
fn long_accepts_beyond_int_range() {
	assert!(eval(ConstraintKind::Long, "9_223_372_036_854_775_807"));
	assert!(!eval(ConstraintKind::Long, "9223372036854775808"));
	assert_eq!(parse_long("-1_024"), Some(-1024));
}

#[rstest]
#[case("true", true)]
#[case("FALSE", true)]
#[case("yes", false)]
#[case("1", false)]
fn bool_grammar(#[case] token: &str, #[case] expected: bool) {
	assert_eq!(eval(ConstraintKind::Bool, token), expected);
}

#[rstest]
#[case(ConstraintKind::Alpha, "abc", true)]
#[case(ConstraintKind::Alpha, "ab1", false)]
#[case(ConstraintKind::Email, "dev@example.com", true)]
#[case(ConstraintKind::Email, "dev@localhost", false)]
#[case(ConstraintKind::Email, "@example.com", false)]
#[case(ConstraintKind::Email, "a@b@c.com", false)]
#[case(ConstraintKind::Uri, "mailto:dev@example.com", true)]
#[case(ConstraintKind::Uri, "not a uri", false)]
#[case(ConstraintKind::Url, "https://example.com/path", true)]
#[case(ConstraintKind::Url, "urn:isbn:0451450523", false)]
#[case(ConstraintKind::Urn, "urn:isbn:0451450523", true)]
#[case(ConstraintKind::Urn, "urn::missing-nid", false)]
#[case(ConstraintKind::Guid, "67e55044-10b1-426f-9247-bb680e5fe0c8", true)]
#[case(ConstraintKind::Guid, "67e55044-10b1-426f-9247", false)]
fn structural_kinds(#[case] kind: ConstraintKind, #[case] token: &str, #[case] expected: bool) {
	assert_eq!(eval(kind, token), expected);
}

#[rstest]
#[case(ConstraintKind::Date, "2024-02-29", true)]
#[case(ConstraintKind::Date, "2024/02/29", true)]
#[case(ConstraintKind::Date, "2023-02-29", false)]
#[case(ConstraintKind::Date, "29.02.2024", false)]
#[case(ConstraintKind::Time, "23:59", true)]
#[case(ConstraintKind::Time, "23:59:59", true)]
#[case(ConstraintKind::Time, "24:00", false)]
#[case(ConstraintKind::DateTime, "2024-01-31T08:30", true)]
#[case(ConstraintKind::DateTime, "2024-01-31T08:30:15", true)]
#[case(ConstraintKind::DateTime, "2024-01-31", false)]
#[case(ConstraintKind::DateTimeOffset, "2024-01-31T08:30:15Z", true)]
#[case(ConstraintKind::DateTimeOffset, "2024-01-31T08:30:15+02:00", true)]
#[case(ConstraintKind::DateTimeOffset, "2024-01-31T08:30:15", false)]
#[case(ConstraintKind::TimeSpan, "01:30", true)]
#[case(ConstraintKind::TimeSpan, "1:30:15", true)]
#[case(ConstraintKind::TimeSpan, "-2.23:59:59.1234567", true)]
#[case(ConstraintKind::TimeSpan, "2.24:00", false)]
#[case(ConstraintKind::TimeSpan, "00:60", false)]
#[case(ConstraintKind::TimeSpan, "00:30.5", false)]
#[case(ConstraintKind::TimeSpan, "soon", false)]
fn temporal_kinds(#[case] kind: ConstraintKind, #[case] token: &str, #[case] expected: bool) {
	assert_eq!(eval(kind, token), expected);
}

#[test]
fn custom_kind_uses_registered_predicate() {
	let mut registry = ConstraintRegistry::new();
	assert!(registry.insert("Hex", Arc::new(|t: &str| t.chars().all(|c| c.is_ascii_hexdigit()))));
	assert!(!registry.insert("hex", Arc::new(|_: &str| true)), "names are case-insensitive");

	let options = MatchOptions::new(&registry);
	let kind = ConstraintKind::Custom("hex".into());
	assert!(kind_matches(&kind, "beef", &options));
	assert!(!kind_matches(&kind, "xyz", &options));
}

#[test]
fn unregistered_custom_kind_never_matches() {
	assert!(!eval(ConstraintKind::Custom("slug".into()), "anything"));
}

#[test]
fn literal_segments_compare_case_insensitively() {
	let registry = ConstraintRegistry::new();
	let options = MatchOptions::new(&registry);
	assert!(is_match(&Segment::literal("Status"), "STATUS", &options));
	assert!(!is_match(&Segment::literal("status"), "stat", &options));
	assert!(literal_starts_with("Status", "st"));
}
