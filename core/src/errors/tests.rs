//! Unit tests for domain error types

use ts_shared::errors::{ErrorResponse, IntoErrorResponse};

use crate::errors::{DomainError, TokenError};

#[test]
fn test_token_error_conversion() {
    let response: ErrorResponse = TokenError::TokenRevoked.into();
    assert_eq!(response.error, "TOKEN_REVOKED");
    assert!(response.message.contains("revoked"));
}

#[test]
fn test_expired_and_invalid_look_alike_to_callers() {
    let expired = TokenError::TokenExpired.to_error_response();
    let forged = TokenError::InvalidSignature.to_error_response();
    assert_eq!(expired.message, forged.message);
    assert_eq!(expired.error, "TOKEN_EXPIRED");
    assert_eq!(forged.error, "TOKEN_INVALID");
}

#[test]
fn test_store_failure_is_transient_not_authentication() {
    let err = DomainError::from(TokenError::SessionStoreUnavailable {
        message: "connection refused".to_string(),
    });
    assert!(err.is_transient());
    assert!(!err.is_authentication_failure());

    let response = err.to_error_response();
    assert_eq!(response.error, "SESSION_STORE_UNAVAILABLE");
    assert!(!response.message.contains("connection refused"));
}

#[test]
fn test_authentication_failures() {
    for err in [
        TokenError::TokenExpired,
        TokenError::InvalidTokenFormat,
        TokenError::InvalidSignature,
        TokenError::TokenRevoked,
        TokenError::InvalidRefreshToken,
        TokenError::RefreshTokenExpired,
    ] {
        assert!(err.is_authentication_failure(), "{err:?}");
        assert!(!err.is_transient(), "{err:?}");
    }
    assert!(!TokenError::TokenGenerationFailed.is_authentication_failure());
}

#[test]
fn test_internal_error_hides_message() {
    let err = DomainError::Internal {
        message: "secret detail".to_string(),
    };
    let response = err.to_error_response();
    assert_eq!(response.error, "INTERNAL_ERROR");
    assert!(!response.message.contains("secret"));
    assert!(!err.is_authentication_failure());
}
