//! Cache module for the Redis-backed session store
//!
//! This module provides the Redis client and the `SessionStore`
//! implementation the token service runs against in production.

pub mod redis_client;
pub mod session_store;


pub use redis_client::RedisClient;
pub use session_store::RedisSessionStore;

// Re-export commonly used types
pub use ts_shared::config::CacheConfig;
