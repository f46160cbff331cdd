//! Configuration for the token service

use chrono::Duration;
use ts_shared::config::auth::{
    DEFAULT_ACCESS_TOKEN_EXPIRY, DEFAULT_REFRESH_TOKEN_EXPIRY, DEFAULT_SESSION_KEY_PREFIX,
};
use ts_shared::config::{JwtConfig, SessionConfig};

use crate::errors::DomainError;

/// A refresh token is rotated once less than `1 / ROTATION_THRESHOLD_DIVISOR`
/// of its nominal lifetime remains.
pub const ROTATION_THRESHOLD_DIVISOR: i32 = 3;

/// Configuration for the token service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenServiceConfig {
    /// Lifetime of minted access tokens
    pub access_token_ttl: Duration,
    /// Lifetime of minted refresh tokens and of their session records
    pub refresh_token_ttl: Duration,
    /// Namespace of session store keys
    pub session_key_prefix: String,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            access_token_ttl: Duration::seconds(DEFAULT_ACCESS_TOKEN_EXPIRY),
            refresh_token_ttl: Duration::seconds(DEFAULT_REFRESH_TOKEN_EXPIRY),
            session_key_prefix: DEFAULT_SESSION_KEY_PREFIX.to_string(),
        }
    }
}

impl TokenServiceConfig {
    /// Builds the service configuration from shared settings
    ///
    /// # Returns
    ///
    /// * `Ok(TokenServiceConfig)` - Lifetimes converted from seconds
    /// * `Err(DomainError::Validation)` - A lifetime does not fit a `chrono::Duration`
    pub fn from_settings(jwt: &JwtConfig, session: &SessionConfig) -> Result<Self, DomainError> {
        Ok(Self {
            access_token_ttl: lifetime_from_secs("access", jwt.access_token_expiry)?,
            refresh_token_ttl: lifetime_from_secs("refresh", jwt.refresh_token_expiry)?,
            session_key_prefix: session.key_prefix.clone(),
        })
    }

    /// Checks lifetimes and key namespace
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.access_token_ttl.num_seconds() <= 0 {
            return Err(DomainError::Validation {
                message: "access token lifetime must be positive".to_string(),
            });
        }
        if self.refresh_token_ttl.num_seconds() <= 0 {
            return Err(DomainError::Validation {
                message: "refresh token lifetime must be positive".to_string(),
            });
        }
        if self.session_key_prefix.is_empty() {
            return Err(DomainError::Validation {
                message: "session key prefix must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

fn lifetime_from_secs(kind: &str, secs: i64) -> Result<Duration, DomainError> {
    Duration::try_seconds(secs).ok_or_else(|| DomainError::Validation {
        message: format!("{} token lifetime of {} seconds is out of range", kind, secs),
    })
}
