//! Redis-backed session store
//!
//! Production implementation of the core `SessionStore` contract. One plain
//! string key per principal, expiring with the refresh token it holds.

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use ts_core::errors::{DomainError, TokenError};
use ts_core::repositories::SessionStore;

use super::redis_client::RedisClient;
use crate::InfrastructureError;

/// Session store persisting refresh tokens in Redis
#[derive(Clone)]
pub struct RedisSessionStore {
    client: RedisClient,
}

impl RedisSessionStore {
    /// Create a store over an established client
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    /// Returns the underlying client
    pub fn client(&self) -> &RedisClient {
        &self.client
    }

    /// Full Redis key, including the configured cache prefix
    pub fn redis_key(&self, key: &str) -> String {
        self.client.config().make_key(key)
    }
}

/// Redis rejects `EX 0`; sub-second lifetimes are rounded up
pub(crate) fn expiry_seconds(ttl: Duration) -> u64 {
    let secs = ttl.as_secs();
    if ttl.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs.max(1)
    }
}

fn unavailable(err: InfrastructureError) -> DomainError {
    DomainError::Token(TokenError::SessionStoreUnavailable {
        message: err.to_string(),
    })
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError> {
        let redis_key = self.redis_key(key);
        self.client
            .set_with_expiry(&redis_key, value, expiry_seconds(ttl))
            .await
            .map_err(unavailable)
    }

    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        let redis_key = self.redis_key(key);
        self.client.get(&redis_key).await.map_err(unavailable)
    }

    async fn delete(&self, key: &str) -> Result<(), DomainError> {
        let redis_key = self.redis_key(key);
        let deleted = self.client.delete(&redis_key).await.map_err(unavailable)?;
        debug!(key = %redis_key, deleted, "Session key removed");
        Ok(())
    }
}
