//! Token grammars for built-in constraint kinds.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];
const TIME_FORMATS: &[&str] = &["%H:%M", "%H:%M:%S", "%H:%M:%S%.f"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];
const DATETIME_OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%:z", "%Y-%m-%dT%H:%M:%S%.f%:z"];

/// Parses a 32-bit integer, allowing single `_` separators between digits.
pub fn parse_int(token: &str) -> Option<i32> {
	i32::try_from(parse_long(token)?).ok()
}

/// Parses a 64-bit integer, allowing single `_` separators between digits.
pub fn parse_long(token: &str) -> Option<i64> {
	let digits = strip_digit_separators(token)?;
	digits.parse::<i64>().ok()
}

fn strip_digit_separators(token: &str) -> Option<String> {
	let (sign, body) = match token.as_bytes().first()? {
		b'-' => ("-", &token[1..]),
		b'+' => ("", &token[1..]),
		_ => ("", token),
	};
	let bytes = body.as_bytes();
	if bytes.is_empty() || !bytes[0].is_ascii_digit() || !bytes[bytes.len() - 1].is_ascii_digit() {
		return None;
	}

	let mut out = String::with_capacity(token.len());
	out.push_str(sign);
	let mut prev_underscore = false;
	for &b in bytes {
		match b {
			b'0'..=b'9' => {
				out.push(b as char);
				prev_underscore = false;
			}
			b'_' if !prev_underscore => prev_underscore = true,
			_ => return None,
		}
	}
	Some(out)
}

pub(super) fn is_email(token: &str) -> bool {
	let Some((local, domain)) = token.split_once('@') else {
		return false;
	};
	if local.is_empty() || domain.contains('@') || local.chars().any(char::is_whitespace) {
		return false;
	}
	let labels: Vec<&str> = domain.split('.').collect();
	labels.len() >= 2
		&& labels.iter().all(|label| {
			!label.is_empty()
				&& !label.starts_with('-')
				&& !label.ends_with('-')
				&& label.chars().all(|c| c.is_alphanumeric() || c == '-')
		})
}

pub(super) fn is_uri(token: &str) -> bool {
	url::Url::parse(token).is_ok()
}

pub(super) fn is_url(token: &str) -> bool {
	url::Url::parse(token).is_ok_and(|url| url.has_host())
}

pub(super) fn is_urn(token: &str) -> bool {
	let Some((scheme, rest)) = token.split_once(':') else {
		return false;
	};
	if !scheme.eq_ignore_ascii_case("urn") {
		return false;
	}
	let Some((nid, nss)) = rest.split_once(':') else {
		return false;
	};
	(1..=32).contains(&nid.len())
		&& nid.starts_with(|c: char| c.is_ascii_alphanumeric())
		&& nid.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
		&& !nss.is_empty()
		&& !nss.chars().any(char::is_whitespace)
}

pub(super) fn is_date(token: &str) -> bool {
	DATE_FORMATS
		.iter()
		.any(|fmt| NaiveDate::parse_from_str(token, fmt).is_ok())
}

pub(super) fn is_time(token: &str) -> bool {
	TIME_FORMATS
		.iter()
		.any(|fmt| NaiveTime::parse_from_str(token, fmt).is_ok())
}

pub(super) fn is_datetime(token: &str) -> bool {
	DATETIME_FORMATS
		.iter()
		.any(|fmt| NaiveDateTime::parse_from_str(token, fmt).is_ok())
}

pub(super) fn is_datetime_offset(token: &str) -> bool {
	DateTime::parse_from_rfc3339(token).is_ok()
		|| DATETIME_OFFSET_FORMATS
			.iter()
			.any(|fmt| DateTime::parse_from_str(token, fmt).is_ok())
}

/// `[-][d.]h[h]:mm[:ss[.f{1,7}]]`
pub(super) fn is_timespan(token: &str) -> bool {
	let body = token.strip_prefix('-').unwrap_or(token);
	match body.split_once('.') {
		// A dot before the first colon separates days from the clock.
		Some((days, clock)) if !days.contains(':') => is_digits(days, 1, 8) && is_clock(clock, true),
		_ => is_clock(body, false),
	}
}

fn is_clock(clock: &str, has_days: bool) -> bool {
	let (clock, fraction) = match clock.split_once('.') {
		Some((clock, fraction)) => (clock, Some(fraction)),
		None => (clock, None),
	};
	let parts: Vec<&str> = clock.split(':').collect();
	if !(2..=3).contains(&parts.len()) {
		return false;
	}
	if let Some(fraction) = fraction
		&& (parts.len() != 3 || !is_digits(fraction, 1, 7))
	{
		return false;
	}
	let Some(hours) = parse_bounded(parts[0], 1, 2) else {
		return false;
	};
	if has_days && hours >= 24 {
		return false;
	}
	parts[1..]
		.iter()
		.all(|part| parse_bounded(part, 2, 2).is_some_and(|v| v < 60))
}

fn parse_bounded(part: &str, min: usize, max: usize) -> Option<u32> {
	is_digits(part, min, max).then(|| part.parse().ok()).flatten()
}

fn is_digits(s: &str, min: usize, max: usize) -> bool {
	(min..=max).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
}
