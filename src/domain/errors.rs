use thiserror::Error;

/// Errors raised by repository implementations
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{0} not found")]
    NotFound(String),

    /// A unique constraint was violated
    #[error("{message}")]
    Conflict { field: String, message: String },

    /// A foreign key pointed at a row that does not exist
    #[error("{message}")]
    InvalidReference { field: String, message: String },

    /// The row is still referenced by other rows and cannot be removed
    #[error("{0}")]
    InUse(String),

    /// Rows changed between reading and writing them
    #[error("{0}")]
    Stale(String),
}

/// Errors raised by domain rules and use cases
#[derive(Debug, Error)]
pub enum DomainError {
    /// A payload value broke a rule; `field` is the offending request field
    #[error("{message}")]
    Validation { field: String, message: String },

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Unauthorized(String),

    /// Failure reported by an external identity provider
    #[error("OAuth error: {0}")]
    ExternalAuth(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl DomainError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_carries_field() {
        let err = DomainError::validation("optionalFieldID", "Invalid OptionalField ID: 7");
        match &err {
            DomainError::Validation { field, message } => {
                assert_eq!(field, "optionalFieldID");
                assert_eq!(message, "Invalid OptionalField ID: 7");
            }
            _ => panic!("Expected Validation error"),
        }
        assert_eq!(err.to_string(), "Invalid OptionalField ID: 7");
    }

    #[test]
    fn repository_error_converts_into_domain_error() {
        let err: DomainError = RepositoryError::NotFound("Job".to_string()).into();
        assert_eq!(err.to_string(), "Job not found");
    }
}
