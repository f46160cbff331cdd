//! Signing key and session configuration

use serde::{Deserialize, Serialize};

use super::parse_or;

/// Default access token lifetime (2 hours)
pub const DEFAULT_ACCESS_TOKEN_EXPIRY: i64 = 2 * 60 * 60;

/// Default refresh token lifetime (30 days)
pub const DEFAULT_REFRESH_TOKEN_EXPIRY: i64 = 30 * 24 * 60 * 60;

/// Default namespace of session store keys
pub const DEFAULT_SESSION_KEY_PREFIX: &str = "refresh_token";

/// JWT signing configuration
///
/// Only asymmetric algorithms are accepted by the key manager, so the
/// configuration carries key file paths rather than a shared secret.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Algorithm name (RS256, PS256, ES256, EdDSA, ...)
    #[serde(default = "default_algorithm")]
    pub algorithm: String,

    /// Path to the PEM-encoded private key
    pub private_key_path: String,

    /// Path to the PEM-encoded public key
    pub public_key_path: String,

    /// Access token expiry time in seconds
    #[serde(default = "default_access_expiry")]
    pub access_token_expiry: i64,

    /// Refresh token expiry time in seconds
    #[serde(default = "default_refresh_expiry")]
    pub refresh_token_expiry: i64,

    /// JWT issuer claim, checked on verification when set
    #[serde(default)]
    pub issuer: Option<String>,

    /// Clock skew tolerance in seconds applied to `exp`
    #[serde(default)]
    pub leeway: u64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            algorithm: default_algorithm(),
            private_key_path: String::from("core/keys/jwt_private_key.pem"),
            public_key_path: String::from("core/keys/jwt_public_key.pem"),
            access_token_expiry: DEFAULT_ACCESS_TOKEN_EXPIRY,
            refresh_token_expiry: DEFAULT_REFRESH_TOKEN_EXPIRY,
            issuer: None,
            leeway: 0,
        }
    }
}

impl JwtConfig {
    /// Create a configuration for the given algorithm and key pair
    pub fn new(
        algorithm: impl Into<String>,
        private_key_path: impl Into<String>,
        public_key_path: impl Into<String>,
    ) -> Self {
        Self {
            algorithm: algorithm.into(),
            private_key_path: private_key_path.into(),
            public_key_path: public_key_path.into(),
            ..Default::default()
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(&|key: &str| std::env::var(key).ok())
    }

    /// Create through a key lookup
    ///
    /// Reads `JWT_SIGN_ALGO`, `JWT_SECRET_KEY` (private key path),
    /// `JWT_PUBLIC_KEY` (public key path), `JWT_ACCESS_TOKEN_EXPIRY`,
    /// `JWT_REFRESH_TOKEN_EXPIRY`, `JWT_ISSUER` and `JWT_LEEWAY`.
    pub fn from_lookup<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            algorithm: lookup("JWT_SIGN_ALGO").unwrap_or(defaults.algorithm),
            private_key_path: lookup("JWT_SECRET_KEY").unwrap_or(defaults.private_key_path),
            public_key_path: lookup("JWT_PUBLIC_KEY").unwrap_or(defaults.public_key_path),
            access_token_expiry: parse_or(
                lookup,
                "JWT_ACCESS_TOKEN_EXPIRY",
                defaults.access_token_expiry,
            ),
            refresh_token_expiry: parse_or(
                lookup,
                "JWT_REFRESH_TOKEN_EXPIRY",
                defaults.refresh_token_expiry,
            ),
            issuer: lookup("JWT_ISSUER").filter(|issuer| !issuer.is_empty()),
            leeway: parse_or(lookup, "JWT_LEEWAY", defaults.leeway),
        }
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry = minutes * 60;
        self
    }

    /// Set refresh token expiry in days
    pub fn with_refresh_expiry_days(mut self, days: i64) -> Self {
        self.refresh_token_expiry = days * 86400;
        self
    }

    /// Set the issuer claim
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }
}

/// Session record configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Namespace prepended to the principal id in store keys
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            key_prefix: default_key_prefix(),
        }
    }
}

impl SessionConfig {
    /// Create through a key lookup (`SESSION_KEY_PREFIX`)
    pub fn from_lookup<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            key_prefix: lookup("SESSION_KEY_PREFIX")
                .filter(|prefix| !prefix.is_empty())
                .unwrap_or_else(default_key_prefix),
        }
    }
}

fn default_algorithm() -> String {
    String::from("RS256")
}

fn default_access_expiry() -> i64 {
    DEFAULT_ACCESS_TOKEN_EXPIRY
}

fn default_refresh_expiry() -> i64 {
    DEFAULT_REFRESH_TOKEN_EXPIRY
}

fn default_key_prefix() -> String {
    String::from(DEFAULT_SESSION_KEY_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_config_default() {
        let config = JwtConfig::default();
        assert_eq!(config.access_token_expiry, 7200);
        assert_eq!(config.refresh_token_expiry, 2_592_000);
        assert_eq!(config.algorithm, "RS256");
        assert_eq!(config.leeway, 0);
        assert!(config.issuer.is_none());
    }

    #[test]
    fn test_jwt_config_builder() {
        let config = JwtConfig::new("PS256", "a.pem", "b.pem")
            .with_access_expiry_minutes(30)
            .with_refresh_expiry_days(14)
            .with_issuer("tessera");

        assert_eq!(config.algorithm, "PS256");
        assert_eq!(config.access_token_expiry, 1800);
        assert_eq!(config.refresh_token_expiry, 1_209_600);
        assert_eq!(config.issuer.as_deref(), Some("tessera"));
    }

    #[test]
    fn test_jwt_config_lookup_ignores_empty_issuer() {
        let config = JwtConfig::from_lookup(&|key: &str| match key {
            "JWT_ISSUER" => Some(String::new()),
            "JWT_ACCESS_TOKEN_EXPIRY" => Some("60".to_string()),
            _ => None,
        });
        assert!(config.issuer.is_none());
        assert_eq!(config.access_token_expiry, 60);
    }

    #[test]
    fn test_session_config_default() {
        assert_eq!(SessionConfig::default().key_prefix, "refresh_token");

        let empty = SessionConfig::from_lookup(&|_: &str| Some(String::new()));
        assert_eq!(empty.key_prefix, "refresh_token");
    }

    #[test]
    fn test_jwt_config_deserialize_fills_defaults() {
        let config: JwtConfig = serde_json::from_value(serde_json::json!({
            "private_key_path": "p.pem",
            "public_key_path": "q.pem"
        }))
        .unwrap();
        assert_eq!(config.algorithm, "RS256");
        assert_eq!(config.refresh_token_expiry, DEFAULT_REFRESH_TOKEN_EXPIRY);
    }
}
