//! Field rules for user records.
//!
//! [`validate`] evaluates every rule and returns all violations, in a fixed order
//! that clients rely on when matching messages.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::user::{fields, is_truthy, UserRecord};

/// Fields whose absence is reported, in reporting order.
pub const REQUIRED_FIELDS: [&str; 4] = [
    fields::FIRST_NAME,
    fields::LAST_NAME,
    fields::DATE_OF_BIRTH,
    fields::PERSONAL_ID_DOCUMENT,
];

const NAME_LEN: std::ops::RangeInclusive<usize> = 2..=50;
const DOCUMENT_ID_LEN: std::ops::RangeInclusive<usize> = 5..=20;

// ASCII classes on purpose: `\w` and `\d` are Unicode-aware in `regex`.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]+(\.[A-Za-z0-9_-]+)*@([A-Za-z0-9_-]+\.)+[A-Za-z]{2,7}$")
        .expect("email pattern compiles")
});
static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("date pattern compiles"));
static COUNTRY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{2}$").expect("country pattern compiles"));

/// Check a candidate record; an empty result means it is valid.
pub fn validate(user: &UserRecord) -> Vec<String> {
    let mut errors = Vec::new();

    for field in REQUIRED_FIELDS {
        if present(user.get(field)).is_none() {
            errors.push(format!("{field} is required."));
        }
    }

    for field in [fields::FIRST_NAME, fields::LAST_NAME] {
        if let Some(len) = present(user.get(field)).and_then(length) {
            if !NAME_LEN.contains(&len) {
                errors.push(format!("{field} must be between 2 and 50 characters."));
            }
        }
    }

    if let Some(email) = present(user.get(fields::EMAIL)) {
        if !matches(&EMAIL_RE, email) {
            errors.push("Invalid email format.".to_string());
        }
    }

    if let Some(dob) = present(user.get(fields::DATE_OF_BIRTH)) {
        if !matches(&DATE_RE, dob) {
            errors.push("dateOfBirth must be in YYYY-MM-DD format.".to_string());
        }
    }

    if let Some(Value::Object(doc)) = present(user.get(fields::PERSONAL_ID_DOCUMENT)) {
        if let Some(len) = present(doc.get(fields::DOCUMENT_ID)).and_then(length) {
            if !DOCUMENT_ID_LEN.contains(&len) {
                errors.push("documentId must be between 5 and 20 characters.".to_string());
            }
        }
        if let Some(country) = present(doc.get(fields::COUNTRY_OF_ISSUE)) {
            if !matches(&COUNTRY_RE, country) {
                errors.push("countryOfIssue must be a 2-letter country code.".to_string());
            }
        }
        if let Some(valid_until) = present(doc.get(fields::VALID_UNTIL)) {
            if !matches(&DATE_RE, valid_until) {
                errors.push("validUntil must be in YYYY-MM-DD format.".to_string());
            }
        }
    }

    errors
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| is_truthy(v))
}

/// Length in UTF-16 code units; values without a length are not length-checked.
fn length(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.encode_utf16().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

/// Non-string values never satisfy a format rule.
fn matches(re: &Regex, value: &Value) -> bool {
    value.as_str().is_some_and(|s| re.is_match(s))
}
