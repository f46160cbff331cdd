//! Signed claim minting and verification

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, Header, Validation};
use tracing::{debug, error};
use ts_shared::config::JwtConfig;

use crate::domain::entities::token::Claims;
use crate::errors::{DomainError, TokenError};

use super::key_manager::KeyManager;

/// Builds and validates signed claim sets
///
/// Pure with respect to shared state: minting depends only on its inputs and
/// the current time, verification only on the token and the public key.
#[derive(Debug, Clone)]
pub struct ClaimCodec {
    keys: KeyManager,
    header: Header,
    validation: Validation,
    issuer: Option<String>,
}

impl ClaimCodec {
    /// Creates a codec signing with `keys`
    ///
    /// # Arguments
    ///
    /// * `keys` - Loaded signing keypair
    /// * `issuer` - Issuer stamped on minted tokens and required on verification
    /// * `leeway_seconds` - Clock skew tolerated past `exp`
    pub fn new(keys: KeyManager, issuer: Option<String>, leeway_seconds: u64) -> Self {
        let algorithm = keys.algorithm();

        let mut validation = Validation::new(algorithm);
        validation.leeway = leeway_seconds;
        validation.validate_exp = true;
        validation.validate_nbf = false;
        match &issuer {
            Some(iss) => {
                validation.set_issuer(&[iss.as_str()]);
                validation.set_required_spec_claims(&["exp", "iss"]);
            }
            None => validation.set_required_spec_claims(&["exp"]),
        }

        Self {
            keys,
            header: Header::new(algorithm),
            validation,
            issuer,
        }
    }

    /// Creates a codec from the issuer and leeway of a JWT configuration
    pub fn from_config(keys: KeyManager, config: &JwtConfig) -> Self {
        Self::new(keys, config.issuer.clone(), config.leeway)
    }

    /// Returns the signing algorithm
    pub fn algorithm(&self) -> Algorithm {
        self.keys.algorithm()
    }

    /// Mints a token for `principal_id` valid from now for `lifetime`
    pub fn mint(&self, principal_id: i64, lifetime: Duration) -> Result<String, DomainError> {
        self.mint_at(principal_id, Utc::now(), lifetime)
    }

    /// Mints a token with an explicit issue instant
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The compact serialized JWT
    /// * `Err(DomainError::Validation)` - Zero principal or lifetime under one second
    /// * `Err(TokenError::TokenGenerationFailed)` - Signing failed
    pub fn mint_at(
        &self,
        principal_id: i64,
        issued_at: DateTime<Utc>,
        lifetime: Duration,
    ) -> Result<String, DomainError> {
        if principal_id == 0 {
            return Err(DomainError::Validation {
                message: "principal id must be non-zero".to_string(),
            });
        }
        if lifetime.num_seconds() <= 0 {
            return Err(DomainError::Validation {
                message: format!("token lifetime must be at least one second, got {}", lifetime),
            });
        }

        let claims = Claims::new(principal_id, issued_at, lifetime).with_issuer(self.issuer.clone());

        encode(&self.header, &claims, self.keys.encoding_key()).map_err(|e| {
            error!(principal_id, error = %e, "Failed to sign claims");
            DomainError::Token(TokenError::TokenGenerationFailed)
        })
    }

    /// Verifies signature, structure and expiry, returning the claims
    ///
    /// Never consults the session store.
    pub fn verify(&self, token: &str) -> Result<Claims, DomainError> {
        let token_data = decode::<Claims>(token, self.keys.decoding_key(), &self.validation)
            .map_err(|e| {
                let mapped = match e.kind() {
                    ErrorKind::ExpiredSignature => TokenError::TokenExpired,
                    ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                    ErrorKind::InvalidIssuer | ErrorKind::MissingRequiredClaim(_) => {
                        TokenError::InvalidClaims
                    }
                    _ => TokenError::InvalidTokenFormat,
                };
                debug!(error = %e, "Token verification failed");
                DomainError::Token(mapped)
            })?;

        let claims = token_data.claims;
        if claims.uid == 0 || claims.exp <= claims.iat {
            debug!(uid = claims.uid, "Token carries invalid claims");
            return Err(DomainError::Token(TokenError::InvalidClaims));
        }

        Ok(claims)
    }
}
