//! Input checks shared by the CLI and the HTTP layer.

use crate::errors::{AppError, AppResult};
use crate::models::time_entry::KEY_SEPARATOR;

/// Longest label a workbook sheet accepts.
pub const MAX_PROJECT_NAME_LEN: usize = 31;

const FORBIDDEN_CHARS: [char; 8] = ['[', ']', ':', '*', '?', '/', '\\', '|'];
const RESERVED_NAMES: [&str; 1] = ["History"];

/// Project names double as sheet labels in exported workbooks and as the
/// first part of entry keys, so they follow the stricter of both rules.
/// Returns the trimmed name.
pub fn validate_project_name(raw: &str) -> AppResult<String> {
    let name = raw.trim();

    if name.is_empty() {
        return Err(AppError::Validation("Project name is required".into()));
    }
    if name.chars().count() > MAX_PROJECT_NAME_LEN {
        return Err(AppError::Validation(format!(
            "Project name '{name}' is longer than {MAX_PROJECT_NAME_LEN} characters"
        )));
    }
    if let Some(c) = name.chars().find(|c| FORBIDDEN_CHARS.contains(c)) {
        return Err(AppError::Validation(format!(
            "Project name '{name}' contains the forbidden character '{c}'"
        )));
    }
    if name.starts_with('\'') || name.ends_with('\'') {
        return Err(AppError::Validation(format!(
            "Project name '{name}' cannot start or end with an apostrophe"
        )));
    }
    if name.starts_with('_') {
        return Err(AppError::Validation(format!(
            "Project name '{name}' cannot start with '_'"
        )));
    }
    if RESERVED_NAMES.iter().any(|r| r.eq_ignore_ascii_case(name)) {
        return Err(AppError::Validation(format!("Project name '{name}' is reserved")));
    }

    Ok(name.to_string())
}

pub fn validate_rate(rate: f64) -> AppResult<f64> {
    if !rate.is_finite() || rate < 0.0 {
        return Err(AppError::Validation(format!(
            "Hourly rate must be a number >= 0 (got {rate})"
        )));
    }
    Ok(rate)
}

/// Entry durations are hours and must be positive.
pub fn validate_duration(hours: f64) -> AppResult<f64> {
    if !hours.is_finite() || hours <= 0.0 {
        return Err(AppError::Validation(format!(
            "Duration must be a number > 0 (got {hours})"
        )));
    }
    Ok(hours)
}

/// Timer elapsed time in seconds.
pub fn validate_elapsed(secs: f64) -> AppResult<f64> {
    if !secs.is_finite() || secs < 0.0 {
        return Err(AppError::Validation(format!(
            "Elapsed time must be a number >= 0 (got {secs})"
        )));
    }
    Ok(secs)
}

pub fn require<'a>(field: &str, value: &'a str) -> AppResult<&'a str> {
    let v = value.trim();
    if v.is_empty() {
        return Err(AppError::Validation(format!("Missing required field: {field}")));
    }
    Ok(v)
}

/// A required field that becomes part of the composite entry key.
pub fn require_key_part<'a>(field: &str, value: &'a str) -> AppResult<&'a str> {
    let v = require(field, value)?;
    if v.contains(KEY_SEPARATOR) {
        return Err(AppError::Validation(format!(
            "{field} cannot contain '{KEY_SEPARATOR}'"
        )));
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_names_and_trims() {
        assert_eq!(validate_project_name("  Acme ").unwrap(), "Acme");
        assert_eq!(validate_project_name("O'Brien & Co").unwrap(), "O'Brien & Co");
    }

    #[test]
    fn rejects_sheet_label_violations() {
        for bad in [
            "",
            "   ",
            "a/b",
            "x[1]",
            "what?",
            "pipe|name",
            "'quoted'",
            "_hidden",
            "History",
            "history",
            "abcdefghijklmnopqrstuvwxyz123456",
        ] {
            assert!(
                matches!(validate_project_name(bad), Err(AppError::Validation(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn name_of_exactly_31_chars_is_allowed() {
        let name = "a".repeat(31);
        assert!(validate_project_name(&name).is_ok());
    }

    #[test]
    fn numeric_bounds() {
        assert!(validate_rate(0.0).is_ok());
        assert!(validate_rate(-1.0).is_err());
        assert!(validate_rate(f64::NAN).is_err());
        assert!(validate_duration(0.0).is_err());
        assert!(validate_duration(0.25).is_ok());
        assert!(validate_elapsed(0.0).is_ok());
        assert!(validate_elapsed(f64::INFINITY).is_err());
    }

    #[test]
    fn key_parts_refuse_the_separator() {
        assert_eq!(require_key_part("startTime", " 09:00 ").unwrap(), "09:00");
        assert!(require_key_part("startTime", "09|00").is_err());
        assert!(require_key_part("endTime", "  ").is_err());
    }
}
