//! Asymmetric key management for JWT signing and verification

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::{error, info};
use ts_shared::config::JwtConfig;

use crate::errors::{DomainError, TokenError};

/// PEM key family an algorithm signs with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyFamily {
    Rsa,
    Ec,
    Ed,
}

impl KeyFamily {
    fn for_algorithm(algorithm: Algorithm) -> Result<Self, DomainError> {
        match algorithm {
            Algorithm::RS256
            | Algorithm::RS384
            | Algorithm::RS512
            | Algorithm::PS256
            | Algorithm::PS384
            | Algorithm::PS512 => Ok(KeyFamily::Rsa),
            Algorithm::ES256 | Algorithm::ES384 => Ok(KeyFamily::Ec),
            Algorithm::EdDSA => Ok(KeyFamily::Ed),
            // Shared-secret algorithms cannot separate signer from verifier
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
                Err(DomainError::Token(TokenError::UnsupportedAlgorithm {
                    algorithm: format!("{:?}", algorithm),
                }))
            }
        }
    }

    fn encoding_key(self, pem: &[u8]) -> jsonwebtoken::errors::Result<EncodingKey> {
        match self {
            KeyFamily::Rsa => EncodingKey::from_rsa_pem(pem),
            KeyFamily::Ec => EncodingKey::from_ec_pem(pem),
            KeyFamily::Ed => EncodingKey::from_ed_pem(pem),
        }
    }

    fn decoding_key(self, pem: &[u8]) -> jsonwebtoken::errors::Result<DecodingKey> {
        match self {
            KeyFamily::Rsa => DecodingKey::from_rsa_pem(pem),
            KeyFamily::Ec => DecodingKey::from_ec_pem(pem),
            KeyFamily::Ed => DecodingKey::from_ed_pem(pem),
        }
    }
}

/// Signing keypair loaded once at startup
///
/// Read-only after construction. Cloning shares nothing mutable, so one
/// instance can serve any number of concurrent requests.
#[derive(Clone)]
pub struct KeyManager {
    algorithm: Algorithm,
    /// Private key for signing JWTs
    encoding_key: EncodingKey,
    /// Public key for verifying JWTs
    decoding_key: DecodingKey,
    private_key_path: PathBuf,
    public_key_path: PathBuf,
}

impl fmt::Debug for KeyManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyManager")
            .field("algorithm", &self.algorithm)
            .field("private_key_path", &self.private_key_path)
            .field("public_key_path", &self.public_key_path)
            .finish()
    }
}

impl KeyManager {
    /// Loads a keypair from PEM files
    ///
    /// # Arguments
    ///
    /// * `algorithm` - Asymmetric signing algorithm the keys belong to
    /// * `private_key_path` - Path to the PEM-encoded private key file
    /// * `public_key_path` - Path to the PEM-encoded public key file
    ///
    /// # Returns
    ///
    /// * `Ok(KeyManager)` - Keys loaded and proven to form a pair
    /// * `Err(DomainError)` - Unsupported algorithm, unreadable file, bad PEM
    ///   or mismatched keys. Callers treat this as fatal at startup.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use jsonwebtoken::Algorithm;
    /// use ts_core::services::token::KeyManager;
    ///
    /// let keys = KeyManager::load(
    ///     Algorithm::RS256,
    ///     "core/keys/jwt_private_key.pem",
    ///     "core/keys/jwt_public_key.pem",
    /// ).expect("signing keys must load");
    /// ```
    pub fn load<P: AsRef<Path>>(
        algorithm: Algorithm,
        private_key_path: P,
        public_key_path: P,
    ) -> Result<Self, DomainError> {
        let private_key_path = private_key_path.as_ref().to_path_buf();
        let public_key_path = public_key_path.as_ref().to_path_buf();

        let private_key_pem = read_key_file(&private_key_path, "private")?;
        let public_key_pem = read_key_file(&public_key_path, "public")?;

        let mut manager = Self::from_pem(algorithm, &private_key_pem, &public_key_pem)?;
        manager.private_key_path = private_key_path;
        manager.public_key_path = public_key_path;

        info!(
            algorithm = ?algorithm,
            private_key = %manager.private_key_path.display(),
            public_key = %manager.public_key_path.display(),
            "Signing keys loaded"
        );

        Ok(manager)
    }

    /// Loads the keypair named by a JWT configuration
    pub fn from_config(config: &JwtConfig) -> Result<Self, DomainError> {
        let algorithm = parse_algorithm(&config.algorithm)?;
        Self::load(algorithm, &config.private_key_path, &config.public_key_path)
    }

    /// Creates a key manager from PEM bytes (embedded keys or tests)
    pub fn from_pem(
        algorithm: Algorithm,
        private_key_pem: &[u8],
        public_key_pem: &[u8],
    ) -> Result<Self, DomainError> {
        let family = KeyFamily::for_algorithm(algorithm)?;

        let encoding_key = family.encoding_key(private_key_pem).map_err(|e| {
            key_load_error(format!("Invalid private key for {:?}: {}", algorithm, e))
        })?;

        let decoding_key = family.decoding_key(public_key_pem).map_err(|e| {
            key_load_error(format!("Invalid public key for {:?}: {}", algorithm, e))
        })?;

        let manager = Self {
            algorithm,
            encoding_key,
            decoding_key,
            private_key_path: PathBuf::from("memory"),
            public_key_path: PathBuf::from("memory"),
        };
        manager.probe()?;

        Ok(manager)
    }

    /// Signs and verifies a throwaway payload so a mismatched pair fails now
    fn probe(&self) -> Result<(), DomainError> {
        let payload = serde_json::json!({ "probe": true });

        let signed = encode(&Header::new(self.algorithm), &payload, &self.encoding_key)
            .map_err(|e| key_load_error(format!("Private key cannot sign: {}", e)))?;

        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        decode::<serde_json::Value>(&signed, &self.decoding_key, &validation)
            .map_err(|e| key_load_error(format!("Public key does not match private key: {}", e)))?;

        Ok(())
    }

    /// Returns the signing algorithm
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Returns the encoding key for signing JWTs
    pub fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    /// Returns the decoding key for verifying JWTs
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }

    /// Returns the paths to the key files
    pub fn key_paths(&self) -> (&Path, &Path) {
        (&self.private_key_path, &self.public_key_path)
    }
}

/// Parses a configured algorithm name
pub(crate) fn parse_algorithm(name: &str) -> Result<Algorithm, DomainError> {
    let algorithm = Algorithm::from_str(name.trim()).map_err(|_| {
        DomainError::Token(TokenError::UnsupportedAlgorithm {
            algorithm: name.to_string(),
        })
    })?;
    KeyFamily::for_algorithm(algorithm)?;
    Ok(algorithm)
}

fn read_key_file(path: &Path, kind: &str) -> Result<Vec<u8>, DomainError> {
    fs::read(path).map_err(|e| {
        key_load_error(format!(
            "Failed to read {} key {}: {}",
            kind,
            path.display(),
            e
        ))
    })
}

fn key_load_error(message: String) -> DomainError {
    error!("{}", message);
    DomainError::Token(TokenError::KeyLoadError { message })
}
