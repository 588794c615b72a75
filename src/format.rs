//! Format predicates for changelog field values.
//!
//! Every checker takes an optional string so callers can pass a field that was absent or
//! not a JSON string; those are never valid.

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;

static URL_REGEX: OnceLock<Regex> = OnceLock::new();
static GUID_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_url_regex() -> &'static Regex {
    URL_REGEX.get_or_init(|| {
        Regex::new(
            r"(?i)^(https?://)?(www\.)?[-a-z0-9@:%._+~#=]{2,256}\.[a-z]{2,6}\b([-a-z0-9@:%_+.~#?&/=]*)?",
        )
        .expect("Failed to compile URL regex")
    })
}

// 8-4-4-4-12 hexadecimal digits, e.g. f81d4fae-7dec-11d0-a765-00a0c91e6bf6
fn get_guid_regex() -> &'static Regex {
    GUID_REGEX.get_or_init(|| {
        Regex::new(r"(?i)^[0-9a-f]{8}(?:-[0-9a-f]{4}){3}-[0-9a-f]{12}$")
            .expect("Failed to compile GUID regex")
    })
}

const NAIVE_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%B %d, %Y %H:%M:%S",
    "%b %d, %Y %H:%M:%S",
    "%a %b %d %Y %H:%M:%S",
    "%B %d %Y %H:%M:%S",
    "%b %d %Y %H:%M:%S",
];

// Minute-precision ISO times with an explicit numeric offset
const OFFSET_DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M%:z", "%Y-%m-%dT%H:%M%z"];

const NAIVE_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%a %b %d %Y",
    "%B %d %Y",
    "%b %d %Y",
];

/// True when the value is a string with something other than whitespace in it
pub fn is_non_empty_string(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

pub fn is_valid_guid(value: Option<&str>) -> bool {
    value.is_some_and(|v| get_guid_regex().is_match(v))
}

/// Permissive syntactic URL check; says nothing about reachability
pub fn is_syntactic_url(value: Option<&str>) -> bool {
    is_non_empty_string(value) && value.is_some_and(|v| get_url_regex().is_match(v))
}

/// True when the value starts with the literal `https` scheme
pub fn is_secure_url(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.starts_with("https"))
}

/// True when the value parses as a calendar date or date/time.
///
/// Accepts RFC 3339, RFC 2822, the ISO short forms (`2016`, `2016-05`, `2016-05-12T10:30Z`)
/// and a set of common naive layouts. Out-of-range components such as `2016-02-30` are
/// rejected.
pub fn is_parseable_date(value: Option<&str>) -> bool {
    if !is_non_empty_string(value) {
        return false;
    }
    let Some(raw) = value.map(str::trim) else {
        return false;
    };

    DateTime::parse_from_rfc3339(raw).is_ok()
        || DateTime::parse_from_rfc2822(raw).is_ok()
        || is_partial_iso_date(raw)
        || OFFSET_DATE_TIME_FORMATS
            .iter()
            .any(|fmt| DateTime::parse_from_str(raw, fmt).is_ok())
        || is_naive_date_time(raw)
        || is_naive_date_time(strip_zulu(raw))
        || NAIVE_DATE_FORMATS
            .iter()
            .any(|fmt| NaiveDate::parse_from_str(raw, fmt).is_ok())
}

fn is_naive_date_time(raw: &str) -> bool {
    NAIVE_DATE_TIME_FORMATS
        .iter()
        .any(|fmt| NaiveDateTime::parse_from_str(raw, fmt).is_ok())
}

fn strip_zulu(raw: &str) -> &str {
    raw.strip_suffix(['Z', 'z']).unwrap_or(raw)
}

/// `YYYY` or `YYYY-MM`, read as the first day of that year or month
fn is_partial_iso_date(raw: &str) -> bool {
    let padded = match raw.len() {
        4 => format!("{raw}-01-01"),
        7 => format!("{raw}-01"),
        _ => return false,
    };
    raw.bytes().take(4).all(|b| b.is_ascii_digit())
        && NaiveDate::parse_from_str(&padded, "%Y-%m-%d").is_ok()
}
