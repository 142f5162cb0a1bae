// src/utils/validation.rs

use std::sync::LazyLock;

use regex::Regex;
use validator::ValidationError;

/// Exam codes are typed by students: letters, digits, '-' and '_'.
static EXAM_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{3,32}$").expect("valid exam code regex"));

/// Roster identifiers: digits with optional letters, dots, slashes or dashes.
static NISN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Za-z./-]{1,32}$").expect("valid NISN regex"));

pub fn validate_exam_code(code: &str) -> Result<(), ValidationError> {
    if EXAM_CODE_RE.is_match(code) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_exam_code")
            .with_message("Exam code must be 3-32 letters, digits, '-' or '_'".into()))
    }
}

pub fn validate_nisn(nisn: &str) -> Result<(), ValidationError> {
    if NISN_RE.is_match(nisn) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_nisn")
            .with_message("NISN must be 1-32 characters without spaces".into()))
    }
}
