//! Domain-specific error types and error handling.

mod types;

#[cfg(test)]
mod tests;

// Re-export all error types and utilities
pub use types::TokenError;

use thiserror::Error;
use ts_shared::errors::{error_codes, ErrorResponse, IntoErrorResponse};

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Token(#[from] TokenError),
}

impl DomainError {
    /// Returns the token error when this is one
    pub fn as_token_error(&self) -> Option<&TokenError> {
        match self {
            DomainError::Token(err) => Some(err),
            _ => None,
        }
    }

    /// Whether the caller should treat this as a rejected credential
    pub fn is_authentication_failure(&self) -> bool {
        self.as_token_error()
            .map(TokenError::is_authentication_failure)
            .unwrap_or(false)
    }

    /// Whether retrying the whole operation later may succeed
    pub fn is_transient(&self) -> bool {
        self.as_token_error()
            .map(TokenError::is_transient)
            .unwrap_or(false)
    }
}

impl IntoErrorResponse for DomainError {
    fn to_error_response(&self) -> ErrorResponse {
        match self {
            DomainError::Validation { message } => {
                ErrorResponse::new(error_codes::VALIDATION_ERROR, message.clone())
            }
            // Internal details stay in the logs
            DomainError::Internal { .. } => {
                ErrorResponse::new(error_codes::INTERNAL_ERROR, "Internal error")
            }
            DomainError::Token(err) => err.to_error_response(),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
