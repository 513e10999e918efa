use crate::error::{AppError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static USER_ID_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_-]{1,64}$").unwrap());

/// Validates a user identifier: 1-64 characters of `[a-zA-Z0-9_-]`.
pub fn validate_user_id(user_id: &str) -> Result<()> {
    if !USER_ID_REGEX.is_match(user_id) {
        return Err(AppError::Validation("Invalid user ID".to_string()));
    }
    Ok(())
}

/// Checks that a required text field is present and non-blank.
pub fn require_field<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::Validation(format!("{} is required", field))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_user_id() {
        assert!(validate_user_id("6527a9f3c2b1d40012345678").is_ok());
        assert!(validate_user_id("user_42").is_ok());
        assert!(validate_user_id("a-b-c").is_ok());

        assert!(validate_user_id("").is_err());
        assert!(validate_user_id("has spaces").is_err());
        assert!(validate_user_id("semi;colon").is_err());
        assert!(validate_user_id(&"a".repeat(65)).is_err());
    }

    #[test]
    fn test_require_field() {
        assert_eq!(require_field("username", Some("alice")).unwrap(), "alice");
        assert!(require_field("username", Some("   ")).is_err());
        assert!(require_field("username", None).is_err());
    }
}
