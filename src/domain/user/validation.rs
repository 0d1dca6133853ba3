//! User and email validation utilities

use thiserror::Error;

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("User ID cannot be empty")]
    EmptyId,

    #[error("User ID exceeds maximum length of {0} characters")]
    IdTooLong(usize),

    #[error("User ID must start with a letter or number")]
    InvalidIdStart,

    #[error("User ID must end with a letter or number")]
    InvalidIdEnd,

    #[error("User ID contains invalid character: '{0}'. Only alphanumeric characters and hyphens are allowed")]
    InvalidIdCharacter(char),

    #[error("User ID cannot contain consecutive hyphens")]
    ConsecutiveHyphens,

    #[error("Email cannot be empty")]
    EmptyEmail,

    #[error("Email exceeds maximum length of {0} characters")]
    EmailTooLong(usize),

    #[error("Email must contain exactly one '@'")]
    InvalidAtSign,

    #[error("Email is missing the part before '@'")]
    EmptyLocalPart,

    #[error("Email is missing the domain after '@'")]
    EmptyDomain,

    #[error("Email domain must contain a '.'")]
    MissingDomainDot,

    #[error("Email contains invalid character: '{0}'")]
    InvalidEmailCharacter(char),
}

const MAX_USER_ID_LENGTH: usize = 50;
const MAX_EMAIL_LENGTH: usize = 254;

/// Validate a user ID
///
/// Rules:
/// - Cannot be empty
/// - Maximum 50 characters
/// - Only alphanumeric characters and hyphens
/// - Must start and end with alphanumeric
/// - No consecutive hyphens
pub fn validate_user_id(id: &str) -> Result<(), UserValidationError> {
    if id.is_empty() {
        return Err(UserValidationError::EmptyId);
    }

    if id.len() > MAX_USER_ID_LENGTH {
        return Err(UserValidationError::IdTooLong(MAX_USER_ID_LENGTH));
    }

    let chars: Vec<char> = id.chars().collect();

    if !chars[0].is_ascii_alphanumeric() {
        return Err(UserValidationError::InvalidIdStart);
    }

    if !chars[chars.len() - 1].is_ascii_alphanumeric() {
        return Err(UserValidationError::InvalidIdEnd);
    }

    let mut prev_hyphen = false;

    for c in &chars {
        if *c == '-' {
            if prev_hyphen {
                return Err(UserValidationError::ConsecutiveHyphens);
            }
            prev_hyphen = true;
        } else if c.is_ascii_alphanumeric() {
            prev_hyphen = false;
        } else {
            return Err(UserValidationError::InvalidIdCharacter(*c));
        }
    }

    Ok(())
}

/// Normalize an email for use as a lookup key: trim surrounding whitespace
/// and lowercase the ASCII range. Invitation targets and directory lookups
/// must agree on the key even when the two were typed with different casing.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

/// Validate an (already normalized) email address
///
/// Rules:
/// - Cannot be empty
/// - Maximum 254 characters
/// - Exactly one '@' with non-empty parts on both sides
/// - Domain contains at least one '.'
/// - No whitespace or control characters
pub fn validate_email(email: &str) -> Result<(), UserValidationError> {
    if email.is_empty() {
        return Err(UserValidationError::EmptyEmail);
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(UserValidationError::EmailTooLong(MAX_EMAIL_LENGTH));
    }

    for c in email.chars() {
        if c.is_whitespace() || c.is_control() {
            return Err(UserValidationError::InvalidEmailCharacter(c));
        }
    }

    let mut parts = email.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return Err(UserValidationError::InvalidAtSign),
    };

    if local.is_empty() {
        return Err(UserValidationError::EmptyLocalPart);
    }

    if domain.is_empty() {
        return Err(UserValidationError::EmptyDomain);
    }

    if !domain.contains('.') {
        return Err(UserValidationError::MissingDomainDot);
    }

    Ok(())
}
