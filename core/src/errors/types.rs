//! Token lifecycle error taxonomy
//!
//! Startup failures (key material), authentication failures (malformed,
//! badly signed, expired, revoked or replayed tokens) and transient session
//! store failures are kept apart so callers can decide between rejecting a
//! request and retrying it.

use thiserror::Error;
use ts_shared::errors::{error_codes, ErrorResponse, IntoErrorResponse};

/// Token-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Failed to load signing keys: {message}")]
    KeyLoadError { message: String },

    #[error("Unsupported signing algorithm: {algorithm}")]
    UnsupportedAlgorithm { algorithm: String },

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token format")]
    InvalidTokenFormat,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Invalid claims")]
    InvalidClaims,

    #[error("Token revoked or replayed")]
    TokenRevoked,

    #[error("Refresh token expired")]
    RefreshTokenExpired,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Token generation failed")]
    TokenGenerationFailed,

    #[error("Session store unavailable: {message}")]
    SessionStoreUnavailable { message: String },
}

impl TokenError {
    /// The presented credential was rejected; retrying with it will not help
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            TokenError::TokenExpired
                | TokenError::InvalidTokenFormat
                | TokenError::InvalidSignature
                | TokenError::InvalidClaims
                | TokenError::TokenRevoked
                | TokenError::RefreshTokenExpired
                | TokenError::InvalidRefreshToken
        )
    }

    /// The failure came from the session store and may clear up on its own
    pub fn is_transient(&self) -> bool {
        matches!(self, TokenError::SessionStoreUnavailable { .. })
    }

    /// Stable code for collaborators
    pub fn code(&self) -> &'static str {
        match self {
            TokenError::KeyLoadError { .. } | TokenError::UnsupportedAlgorithm { .. } => {
                error_codes::CONFIGURATION_ERROR
            }
            TokenError::TokenExpired => error_codes::TOKEN_EXPIRED,
            TokenError::InvalidTokenFormat
            | TokenError::InvalidSignature
            | TokenError::InvalidClaims => error_codes::TOKEN_INVALID,
            TokenError::TokenRevoked => error_codes::TOKEN_REVOKED,
            TokenError::RefreshTokenExpired => error_codes::REFRESH_TOKEN_EXPIRED,
            TokenError::InvalidRefreshToken => error_codes::REFRESH_TOKEN_INVALID,
            TokenError::TokenGenerationFailed => error_codes::TOKEN_GENERATION_FAILED,
            TokenError::SessionStoreUnavailable { .. } => error_codes::SESSION_STORE_UNAVAILABLE,
        }
    }
}

impl IntoErrorResponse for TokenError {
    fn to_error_response(&self) -> ErrorResponse {
        let message = match self {
            // Expired and invalid are told apart in logs only
            TokenError::TokenExpired
            | TokenError::InvalidTokenFormat
            | TokenError::InvalidSignature
            | TokenError::InvalidClaims => "Invalid token".to_string(),
            TokenError::SessionStoreUnavailable { .. } => {
                "Session store unavailable".to_string()
            }
            other => other.to_string(),
        };
        ErrorResponse::new(self.code(), message)
    }
}

impl From<TokenError> for ErrorResponse {
    fn from(err: TokenError) -> Self {
        err.to_error_response()
    }
}
