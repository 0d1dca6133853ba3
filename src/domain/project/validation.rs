//! Project validation utilities

use thiserror::Error;

/// Errors that can occur during project validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProjectValidationError {
    #[error("Project ID cannot be empty")]
    EmptyId,

    #[error("Project ID exceeds maximum length of {0} characters")]
    IdTooLong(usize),

    #[error("Project ID contains invalid character: '{0}'. Only alphanumeric characters and hyphens are allowed")]
    InvalidIdCharacter(char),

    #[error("Project name cannot be empty")]
    EmptyName,

    #[error("Project name exceeds maximum length of {0} characters")]
    NameTooLong(usize),
}

const MAX_PROJECT_ID_LENGTH: usize = 64;
const MAX_PROJECT_NAME_LENGTH: usize = 100;

/// Validate a project ID
///
/// Rules:
/// - Cannot be empty
/// - Maximum 64 characters
/// - Only alphanumeric characters and hyphens (covers minted UUIDs)
pub fn validate_project_id(id: &str) -> Result<(), ProjectValidationError> {
    if id.is_empty() {
        return Err(ProjectValidationError::EmptyId);
    }

    if id.len() > MAX_PROJECT_ID_LENGTH {
        return Err(ProjectValidationError::IdTooLong(MAX_PROJECT_ID_LENGTH));
    }

    for c in id.chars() {
        if !c.is_ascii_alphanumeric() && c != '-' {
            return Err(ProjectValidationError::InvalidIdCharacter(c));
        }
    }

    Ok(())
}

/// Validate a project name
///
/// Rules:
/// - Cannot be empty or whitespace-only
/// - Maximum 100 characters
pub fn validate_project_name(name: &str) -> Result<(), ProjectValidationError> {
    if name.trim().is_empty() {
        return Err(ProjectValidationError::EmptyName);
    }

    if name.len() > MAX_PROJECT_NAME_LENGTH {
        return Err(ProjectValidationError::NameTooLong(MAX_PROJECT_NAME_LENGTH));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_project_ids() {
        assert!(validate_project_id("p-1").is_ok());
        assert!(validate_project_id("2f9d1c9e-7b59-4f38-9a41-0c8f4f1f2b11").is_ok());
    }

    #[test]
    fn test_empty_project_id() {
        assert_eq!(validate_project_id(""), Err(ProjectValidationError::EmptyId));
    }

    #[test]
    fn test_project_id_too_long() {
        let long_id = "a".repeat(65);
        assert_eq!(
            validate_project_id(&long_id),
            Err(ProjectValidationError::IdTooLong(64))
        );
    }

    #[test]
    fn test_project_id_invalid_character() {
        assert_eq!(
            validate_project_id("p_1"),
            Err(ProjectValidationError::InvalidIdCharacter('_'))
        );
    }

    #[test]
    fn test_valid_project_names() {
        assert!(validate_project_name("Apollo").is_ok());
        assert!(validate_project_name("Q3 Launch Plan").is_ok());
    }

    #[test]
    fn test_empty_project_name() {
        assert_eq!(
            validate_project_name(""),
            Err(ProjectValidationError::EmptyName)
        );
        assert_eq!(
            validate_project_name("   "),
            Err(ProjectValidationError::EmptyName)
        );
    }

    #[test]
    fn test_project_name_too_long() {
        let long_name = "a".repeat(101);
        assert_eq!(
            validate_project_name(&long_name),
            Err(ProjectValidationError::NameTooLong(100))
        );
    }
}
