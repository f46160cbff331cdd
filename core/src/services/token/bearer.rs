//! `Authorization` header parsing

use crate::errors::{DomainError, TokenError};

const BEARER_SCHEME: &str = "Bearer";

/// Extracts the token from a `Bearer <token>` header value
///
/// Exactly one space must separate the scheme from a non-empty token.
pub fn extract_bearer_token(header: &str) -> Result<&str, DomainError> {
    let mut parts = header.splitn(2, ' ');
    match (parts.next(), parts.next()) {
        (Some(BEARER_SCHEME), Some(token)) if !token.is_empty() && !token.contains(' ') => {
            Ok(token)
        }
        _ => Err(DomainError::Token(TokenError::InvalidTokenFormat)),
    }
}
