//! Input validation for user-supplied fields.

use std::fmt;

/// Validation error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Invalid email format.
    InvalidEmail(String),
    /// Value too long.
    TooLong { field: String, max: usize, actual: usize },
    /// Empty value where one is required.
    Empty(String),
    /// A swap request addressed to its own sender.
    SelfSwap,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidEmail(msg) => write!(f, "Invalid email: {}", msg),
            ValidationError::TooLong { field, max, actual } => {
                write!(f, "{} is too long ({} chars, max {})", field, actual, max)
            }
            ValidationError::Empty(field) => write!(f, "{} cannot be empty", field),
            ValidationError::SelfSwap => {
                write!(f, "a swap request cannot be addressed to its sender")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Maximum allowed length for email addresses.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum allowed length for display names.
pub const MAX_NAME_LENGTH: usize = 120;

/// Maximum allowed length for a skill name.
pub const MAX_SKILL_LENGTH: usize = 80;

/// Maximum allowed length for free-text messages (swap request and chat).
pub const MAX_MESSAGE_LENGTH: usize = 2000;

/// Validate an email address (basic RFC 5322 format check).
///
/// This is a basic validation that checks:
/// - Contains exactly one @
/// - Has at least one character before @
/// - Has at least one character after @
/// - Has at least one dot after @
/// - Is not too long
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Empty("email".to_string()));
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: MAX_EMAIL_LENGTH,
            actual: email.len(),
        });
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return Err(ValidationError::InvalidEmail(
            "must contain exactly one @ symbol".to_string(),
        ));
    }

    let (local, domain) = (parts[0], parts[1]);

    if local.is_empty() {
        return Err(ValidationError::InvalidEmail(
            "missing local part (before @)".to_string(),
        ));
    }

    if domain.is_empty() {
        return Err(ValidationError::InvalidEmail(
            "missing domain (after @)".to_string(),
        ));
    }

    if !domain.contains('.') {
        return Err(ValidationError::InvalidEmail(
            "domain must contain at least one dot".to_string(),
        ));
    }

    if domain.starts_with('.') || domain.ends_with('.') {
        return Err(ValidationError::InvalidEmail(
            "domain cannot start or end with a dot".to_string(),
        ));
    }

    if domain.contains("..") {
        return Err(ValidationError::InvalidEmail(
            "domain cannot contain consecutive dots".to_string(),
        ));
    }

    Ok(())
}

/// Validate a display name.
pub fn validate_display_name(name: &str) -> Result<(), ValidationError> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Empty("name".to_string()));
    }

    if name.len() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LENGTH,
            actual: name.len(),
        });
    }

    Ok(())
}

/// Validate a skill name. Skills are free strings, but they must be
/// non-empty and bounded.
pub fn validate_skill(field: &str, skill: &str) -> Result<(), ValidationError> {
    let skill = skill.trim();

    if skill.is_empty() {
        return Err(ValidationError::Empty(field.to_string()));
    }

    if skill.len() > MAX_SKILL_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_SKILL_LENGTH,
            actual: skill.len(),
        });
    }

    Ok(())
}

/// Validate a free-text message body.
pub fn validate_message_body(body: &str) -> Result<(), ValidationError> {
    let body = body.trim();

    if body.is_empty() {
        return Err(ValidationError::Empty("message".to_string()));
    }

    if body.len() > MAX_MESSAGE_LENGTH {
        return Err(ValidationError::TooLong {
            field: "message".to_string(),
            max: MAX_MESSAGE_LENGTH,
            actual: body.len(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("a@b.co").is_ok());
        assert!(validate_email("  padded@example.com  ").is_ok());
    }

    #[test]
    fn test_invalid_emails() {
        assert!(matches!(
            validate_email(""),
            Err(ValidationError::Empty(_))
        ));
        assert!(validate_email("no-at-sign.com").is_err());
        assert!(validate_email("two@@example.com").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@").is_err());
        assert!(validate_email("user@nodot").is_err());
        assert!(validate_email("user@.example.com").is_err());
        assert!(validate_email("user@example..com").is_err());
    }

    #[test]
    fn test_email_too_long() {
        let long = format!("{}@example.com", "a".repeat(MAX_EMAIL_LENGTH));
        assert!(matches!(
            validate_email(&long),
            Err(ValidationError::TooLong { .. })
        ));
    }

    #[test]
    fn test_skill_validation() {
        assert!(validate_skill("offered_skill", "JavaScript").is_ok());
        assert!(matches!(
            validate_skill("offered_skill", "   "),
            Err(ValidationError::Empty(_))
        ));
        assert!(matches!(
            validate_skill("wanted_skill", &"x".repeat(MAX_SKILL_LENGTH + 1)),
            Err(ValidationError::TooLong { .. })
        ));
    }

    #[test]
    fn test_message_body_validation() {
        assert!(validate_message_body("hi there").is_ok());
        assert!(validate_message_body("").is_err());
        assert!(validate_message_body(&"x".repeat(MAX_MESSAGE_LENGTH + 1)).is_err());
    }
}
