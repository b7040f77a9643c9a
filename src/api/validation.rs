//! Input validation for API requests.
//!
//! The repository identifier gates every route that touches GitHub or the
//! env store; nothing upstream is called for a malformed one.

use lazy_static::lazy_static;
use regex::Regex;

use super::error::ApiError;

lazy_static! {
    /// `owner/name`, ASCII letters, digits, `_` `.` `-`, exactly one slash
    static ref REPO_REGEX: Regex =
        Regex::new(r"^[A-Za-z0-9_.-]+/[A-Za-z0-9_.-]+$").unwrap();
}

pub fn validate_repo(repo: &str) -> Result<(), ApiError> {
    if !REPO_REGEX.is_match(repo) {
        return Err(ApiError::validation(
            "Invalid repository format. Use owner/repo",
        ));
    }
    Ok(())
}
