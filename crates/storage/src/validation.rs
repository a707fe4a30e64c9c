//! Contact field rules shared by request validation and the CSV importer.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    static ref EMAIL_PATTERN: Regex =
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid");
}

/// Checks the `local@domain.tld` shape. The value is trimmed first.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value.trim())
}

/// The stored form of an email: trimmed and lower-cased.
pub fn normalize_email(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Splits a comma-joined tag list, trimming each tag. An empty input gives no tags.
pub fn split_tags(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }

    raw.split(',').map(|tag| tag.trim().to_string()).collect()
}

pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    tags.iter().map(|tag| tag.trim().to_string()).collect()
}

/// `validator` hook for email fields.
pub fn validate_email(value: &str) -> Result<(), ValidationError> {
    if is_valid_email(value) {
        Ok(())
    } else {
        let mut error = ValidationError::new("invalid_email");
        error.message = Some(format!("{} is not a valid email address!", value.trim()).into());
        Err(error)
    }
}

/// `validator` hook for tag lists. Tags travel comma-joined in CSV, so a
/// tag may not contain a comma.
pub fn validate_tags(tags: &[String]) -> Result<(), ValidationError> {
    match tags.iter().find(|tag| tag.contains(',')) {
        None => Ok(()),
        Some(tag) => {
            let mut error = ValidationError::new("tag_contains_comma");
            error.message = Some(format!("Tag \"{}\" must not contain a comma", tag.trim()).into());
            Err(error)
        }
    }
}
