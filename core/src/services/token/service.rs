//! Main token service implementation

use chrono::{DateTime, Utc};
use constant_time_eq::constant_time_eq;
use tracing::{debug, error, info, warn};

use crate::domain::entities::token::{Claims, RefreshOutcome, TokenPair};
use crate::domain::value_objects::SessionKey;
use crate::errors::{DomainError, TokenError};
use crate::repositories::SessionStore;

use super::bearer::extract_bearer_token;
use super::codec::ClaimCodec;
use super::config::{TokenServiceConfig, ROTATION_THRESHOLD_DIVISOR};

/// Issues, verifies, rotates and revokes credential pairs
///
/// Each principal has at most one live session: the refresh token stored
/// under `"<prefix>:<principal_id>"`. Issuing a new pair overwrites it, so a
/// principal logged in elsewhere is silently signed out there.
///
/// # Concurrency
///
/// The service holds no mutable state of its own and can be shared freely.
/// Refresh reads the session record and may then overwrite it without any
/// compare-and-swap. Two refreshes racing on the same near-expiry token can
/// both pass the comparison; each rotates, the later write wins, and the
/// caller that lost the race holds a refresh token that will be rejected on
/// its next use. The access tokens both callers received stay valid until
/// they expire.
pub struct TokenService<S: SessionStore> {
    codec: ClaimCodec,
    store: S,
    config: TokenServiceConfig,
    refresh_store_ttl: std::time::Duration,
}

impl<S: SessionStore> TokenService<S> {
    /// Creates a new token service instance
    ///
    /// # Arguments
    ///
    /// * `codec` - Claim codec holding the signing keys
    /// * `store` - Session store holding one refresh token per principal
    /// * `config` - Lifetimes and session key namespace
    ///
    /// # Returns
    ///
    /// A new `TokenService` instance or a validation error for bad lifetimes
    pub fn new(codec: ClaimCodec, store: S, config: TokenServiceConfig) -> Result<Self, DomainError> {
        config.validate()?;
        let refresh_store_ttl = config
            .refresh_token_ttl
            .to_std()
            .map_err(|e| DomainError::Validation {
                message: format!("refresh token lifetime is not a valid store TTL: {}", e),
            })?;

        info!(
            algorithm = ?codec.algorithm(),
            access_ttl_secs = config.access_token_ttl.num_seconds(),
            refresh_ttl_secs = config.refresh_token_ttl.num_seconds(),
            "Token service initialized"
        );

        Ok(Self {
            codec,
            store,
            config,
            refresh_store_ttl,
        })
    }

    /// Returns the claim codec
    pub fn codec(&self) -> &ClaimCodec {
        &self.codec
    }

    /// Returns the session store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the service configuration
    pub fn config(&self) -> &TokenServiceConfig {
        &self.config
    }

    /// Session store key for `principal_id`
    pub fn session_key(&self, principal_id: i64) -> SessionKey {
        SessionKey::new(&self.config.session_key_prefix, principal_id)
    }

    /// Issues a fresh access/refresh pair and makes the refresh token the
    /// principal's only redeemable one
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - Both tokens, persisted session
    /// * `Err(DomainError::Validation)` - Principal id is zero
    /// * `Err(TokenError::TokenGenerationFailed)` - Signing failed
    /// * `Err(TokenError::SessionStoreUnavailable)` - Session write failed;
    ///   no tokens are handed out
    pub async fn generate_token(&self, principal_id: i64) -> Result<TokenPair, DomainError> {
        let access_token = self
            .codec
            .mint(principal_id, self.config.access_token_ttl)?;
        let refresh_token = self
            .codec
            .mint(principal_id, self.config.refresh_token_ttl)?;

        let key = self.session_key(principal_id);
        self.store
            .set(key.as_str(), &refresh_token, self.refresh_store_ttl)
            .await
            .map_err(|e| store_error(e, "persist session"))?;

        info!(principal_id, "Issued token pair");

        Ok(TokenPair::new(
            access_token,
            refresh_token,
            self.config.access_token_ttl,
            self.config.refresh_token_ttl,
        ))
    }

    /// Verifies a token and returns its claims
    ///
    /// Stateless: the session store is not consulted, so an access token stays
    /// valid until its own expiry even after the session is cleaned.
    pub fn parse_claims(&self, token: &str) -> Result<Claims, DomainError> {
        self.codec.verify(token)
    }

    /// Verifies a token and returns the principal it was issued to
    pub fn parse_token(&self, token: &str) -> Result<i64, DomainError> {
        self.parse_claims(token).map(|claims| claims.uid)
    }

    /// Extracts the bearer token from an `Authorization` header value and
    /// returns the principal it was issued to
    pub fn authenticate_header(&self, header: &str) -> Result<i64, DomainError> {
        let token = extract_bearer_token(header)?;
        self.parse_token(token)
    }

    /// Redeems a refresh token for a new access token
    ///
    /// The presented token must verify and must equal the one stored for its
    /// principal. When less than a third of its lifetime remains, a new
    /// refresh token is minted and stored, and the presented one stops being
    /// redeemable. Otherwise the presented token is returned unchanged.
    ///
    /// # Returns
    ///
    /// * `Ok(RefreshOutcome)` - New access token and the authoritative refresh token
    /// * `Err(TokenError::RefreshTokenExpired)` - Presented token is past `exp`
    /// * `Err(TokenError::InvalidRefreshToken)` - Malformed, forged or bad claims
    /// * `Err(TokenError::TokenRevoked)` - No session, or a different token is stored
    /// * `Err(TokenError::SessionStoreUnavailable)` - Read or rotation write failed;
    ///   the stored record is left as it was
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<RefreshOutcome, DomainError> {
        self.refresh_token_at(refresh_token, Utc::now()).await
    }

    /// Redeems a refresh token, measuring its remaining lifetime at `now`
    pub(crate) async fn refresh_token_at(
        &self,
        refresh_token: &str,
        now: DateTime<Utc>,
    ) -> Result<RefreshOutcome, DomainError> {
        let claims = self.codec.verify(refresh_token).map_err(|e| match e {
            DomainError::Token(TokenError::TokenExpired) => {
                DomainError::Token(TokenError::RefreshTokenExpired)
            }
            DomainError::Token(ref token_error) if token_error.is_authentication_failure() => {
                DomainError::Token(TokenError::InvalidRefreshToken)
            }
            other => other,
        })?;
        let principal_id = claims.uid;

        let key = self.session_key(principal_id);
        let stored = self
            .store
            .get(key.as_str())
            .await
            .map_err(|e| store_error(e, "read session"))?;

        match stored {
            Some(ref current) if constant_time_eq(current.as_bytes(), refresh_token.as_bytes()) => {}
            Some(_) => {
                warn!(principal_id, "Refresh token does not match the live session");
                return Err(DomainError::Token(TokenError::TokenRevoked));
            }
            None => {
                warn!(principal_id, "Refresh token presented without a live session");
                return Err(DomainError::Token(TokenError::TokenRevoked));
            }
        }

        let access_token = self
            .codec
            .mint(principal_id, self.config.access_token_ttl)?;

        let remaining = claims.remaining(now);
        let threshold = claims.lifetime() / ROTATION_THRESHOLD_DIVISOR;

        if remaining < threshold {
            let rotated = self
                .codec
                .mint(principal_id, self.config.refresh_token_ttl)?;

            self.store
                .set(key.as_str(), &rotated, self.refresh_store_ttl)
                .await
                .map_err(|e| store_error(e, "rotate session"))?;

            info!(
                principal_id,
                remaining_secs = remaining.num_seconds(),
                "Rotated refresh token"
            );

            return Ok(RefreshOutcome {
                tokens: TokenPair::new(
                    access_token,
                    rotated,
                    self.config.access_token_ttl,
                    self.config.refresh_token_ttl,
                ),
                principal_id,
                rotated: true,
            });
        }

        debug!(
            principal_id,
            remaining_secs = remaining.num_seconds(),
            "Refreshed access token"
        );

        Ok(RefreshOutcome {
            tokens: TokenPair::new(
                access_token,
                refresh_token.to_string(),
                self.config.access_token_ttl,
                remaining,
            ),
            principal_id,
            rotated: false,
        })
    }

    /// Ends the principal's session; succeeds when there is none
    ///
    /// Outstanding access tokens remain valid until they expire.
    pub async fn clean_token(&self, principal_id: i64) -> Result<(), DomainError> {
        let key = self.session_key(principal_id);
        self.store
            .delete(key.as_str())
            .await
            .map_err(|e| store_error(e, "delete session"))?;

        info!(principal_id, "Session cleaned");
        Ok(())
    }
}

/// Logs a store failure and surfaces it as a transient error
fn store_error(err: DomainError, operation: &str) -> DomainError {
    error!(operation, error = %err, "Session store operation failed");
    match err {
        DomainError::Token(TokenError::SessionStoreUnavailable { .. }) => err,
        other => DomainError::Token(TokenError::SessionStoreUnavailable {
            message: other.to_string(),
        }),
    }
}
