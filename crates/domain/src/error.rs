//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The request path is empty or absolute.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// A required header name is invalid.
    #[error("invalid header name: {0}")]
    InvalidHeaderName(String),

    /// The HTTP method is not supported.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// The request body is invalid for the given content type.
    #[error("invalid body: {0}")]
    InvalidBody(String),

    /// A token string is empty or malformed.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// User input failed a form rule.
    #[error("{field}: {message}")]
    Validation {
        /// The offending field.
        field: &'static str,
        /// Message suitable for display next to the field.
        message: &'static str,
    },
}

impl DomainError {
    /// Creates a validation error for a field.
    #[must_use]
    pub const fn validation(field: &'static str, message: &'static str) -> Self {
        Self::Validation { field, message }
    }
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
