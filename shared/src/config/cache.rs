//! Cache configuration module

use serde::{Deserialize, Serialize};

use super::parse_or;

/// Redis cache configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Redis connection URL
    pub url: String,

    /// Connection timeout in seconds
    #[serde(default = "default_timeout")]
    pub connection_timeout: u64,

    /// Response timeout in seconds
    #[serde(default = "default_timeout")]
    pub response_timeout: u64,

    /// Number of connection attempts made at startup
    #[serde(default = "default_connect_attempts")]
    pub connect_attempts: u32,

    /// Enable cache key prefix
    #[serde(default)]
    pub key_prefix: Option<String>,

    /// Redis database number (0-15)
    #[serde(default)]
    pub database: u8,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: String::from("redis://localhost:6379"),
            connection_timeout: default_timeout(),
            response_timeout: default_timeout(),
            connect_attempts: default_connect_attempts(),
            key_prefix: None,
            database: 0,
        }
    }
}

impl CacheConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(&|key: &str| std::env::var(key).ok())
    }

    /// Create through a key lookup (`REDIS_URL`, `REDIS_DATABASE`, `REDIS_KEY_PREFIX`)
    pub fn from_lookup<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            url: lookup("REDIS_URL").unwrap_or(defaults.url),
            connection_timeout: parse_or(lookup, "REDIS_CONNECTION_TIMEOUT", defaults.connection_timeout),
            response_timeout: parse_or(lookup, "REDIS_RESPONSE_TIMEOUT", defaults.response_timeout),
            connect_attempts: parse_or(lookup, "REDIS_CONNECT_ATTEMPTS", defaults.connect_attempts),
            key_prefix: lookup("REDIS_KEY_PREFIX").filter(|prefix| !prefix.is_empty()),
            database: parse_or(lookup, "REDIS_DATABASE", defaults.database).min(15),
        }
    }

    /// Create a new cache configuration with URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the key prefix for all cache keys
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    /// Set the database number
    pub fn with_database(mut self, db: u8) -> Self {
        self.database = db.min(15);
        self
    }

    /// Generate a cache key with prefix
    pub fn make_key(&self, key: &str) -> String {
        match &self.key_prefix {
            Some(prefix) => format!("{}:{}", prefix, key),
            None => key.to_string(),
        }
    }
}

fn default_timeout() -> u64 {
    5
}

fn default_connect_attempts() -> u32 {
    3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.url, "redis://localhost:6379");
        assert_eq!(config.database, 0);
        assert_eq!(config.connect_attempts, 3);
    }

    #[test]
    fn test_cache_config_with_prefix() {
        let config = CacheConfig::new("redis://cache:6379")
            .with_prefix("tessera")
            .with_database(2);

        assert_eq!(config.make_key("refresh_token:42"), "tessera:refresh_token:42");
        assert_eq!(config.database, 2);
    }

    #[test]
    fn test_cache_key_without_prefix() {
        let config = CacheConfig::default();
        assert_eq!(config.make_key("refresh_token:42"), "refresh_token:42");
    }

    #[test]
    fn test_database_is_clamped() {
        let config = CacheConfig::from_lookup(&|key: &str| {
            (key == "REDIS_DATABASE").then(|| "42".to_string())
        });
        assert_eq!(config.database, 15);
    }
}
