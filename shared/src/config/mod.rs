//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `auth` - Signing keys, token lifetimes and session key layout
//! - `cache` - Redis connection used as the session store
//! - `environment` - Environment detection and logging configuration
//!
//! Every loader reads through a lookup function so the same code path serves
//! `std::env` in production and a fixed map in tests.

pub mod auth;
pub mod cache;
pub mod environment;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use auth::{JwtConfig, SessionConfig};
pub use cache::CacheConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Signing keys and token lifetimes
    pub jwt: JwtConfig,

    /// Session record layout
    #[serde(default)]
    pub session: SessionConfig,

    /// Session store connection
    pub cache: CacheConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            jwt: JwtConfig::default(),
            session: SessionConfig::default(),
            cache: CacheConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load configuration from process environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = Environment::from_lookup(&lookup);
        Self {
            environment,
            jwt: JwtConfig::from_lookup(&lookup),
            session: SessionConfig::from_lookup(&lookup),
            cache: CacheConfig::from_lookup(&lookup),
            logging: LoggingConfig::from_lookup(environment, &lookup),
        }
    }
}

/// Parse a lookup value, falling back to `default` when absent or malformed
pub(crate) fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key)
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}
