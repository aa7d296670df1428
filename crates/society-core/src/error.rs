//! Domain errors

use thiserror::Error;

use crate::validation::ValidationReport;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("{0}")]
    MissingField(String),

    #[error("{0}")]
    MalformedInput(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(ValidationReport),

    /// Unique or foreign-key constraint rejected the write.
    #[error("{0}")]
    Conflict(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not active")]
    UserNotActive,

    #[error("Password hash error: {0}")]
    PasswordHashError(String),

    #[error("Token generation error: {0}")]
    TokenGenerationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Replaces the store's constraint text with a message fit for the user.
    pub fn on_conflict(self, message: impl Into<String>) -> Self {
        match self {
            DomainError::Conflict(_) => DomainError::Conflict(message.into()),
            other => other,
        }
    }

    pub fn is_unexpected(&self) -> bool {
        matches!(
            self,
            DomainError::PasswordHashError(_)
                | DomainError::TokenGenerationError(_)
                | DomainError::DatabaseError(_)
                | DomainError::InternalError(_)
        )
    }

    /// Message shown to the user. Unexpected failures fall back to `generic`.
    pub fn user_message(&self, generic: &str) -> String {
        match self {
            DomainError::InvalidCredentials => "Invalid email/username or password.".to_string(),
            DomainError::UserNotActive => {
                "Your account is currently inactive. Please contact the administrator.".to_string()
            }
            e if e.is_unexpected() => generic.to_string(),
            e => e.to_string(),
        }
    }
}

impl From<ValidationReport> for DomainError {
    fn from(report: ValidationReport) -> Self {
        DomainError::Validation(report)
    }
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        DomainError::Validation(errors.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Violation;

    #[test]
    fn test_on_conflict_only_rewrites_conflicts() {
        let e = DomainError::Conflict("duplicate key".into()).on_conflict("Flat A-101 already exists.");
        assert_eq!(e.to_string(), "Flat A-101 already exists.");

        let e = DomainError::NotFound("Flat not found.".into()).on_conflict("ignored");
        assert_eq!(e.to_string(), "Flat not found.");
    }

    #[test]
    fn test_user_message_hides_unexpected_details() {
        let e = DomainError::DatabaseError("connection reset by peer".into());
        assert_eq!(e.user_message("An unexpected error occurred."), "An unexpected error occurred.");

        let report = ValidationReport::single(Violation::field("year", "Year must be 2000 or later"));
        let e = DomainError::from(report);
        assert_eq!(e.user_message("generic"), "Validation error: Year must be 2000 or later");
    }
}
