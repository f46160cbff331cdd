//! Session store contract holding the authoritative refresh token per principal.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::errors::DomainError;

/// Key/value store with per-key expiry
///
/// The token service keeps exactly one value per principal in here: the
/// refresh token that is currently allowed to be redeemed. Absence of the key
/// means there is no live session.
///
/// Only plain get/set/delete are required. No compare-and-swap is assumed, so
/// a read followed by a write is not atomic across concurrent callers.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value, expiring after `ttl`
    ///
    /// # Returns
    /// * `Ok(())` - Value written
    /// * `Err(DomainError)` - Store unreachable or rejected the write
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError>;

    /// Read the value under `key`
    ///
    /// # Returns
    /// * `Ok(Some(value))` - Key present and not expired
    /// * `Ok(None)` - Key absent or expired
    /// * `Err(DomainError)` - Store unreachable
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Remove `key`; removing an absent key succeeds
    async fn delete(&self, key: &str) -> Result<(), DomainError>;
}

#[async_trait]
impl<S> SessionStore for Arc<S>
where
    S: SessionStore + ?Sized,
{
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError> {
        (**self).set(key, value, ttl).await
    }

    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        (**self).get(key).await
    }

    async fn delete(&self, key: &str) -> Result<(), DomainError> {
        (**self).delete(key).await
    }
}
