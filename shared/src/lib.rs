//! Shared configuration and common types for the Tessera token service
//!
//! This crate provides functionality used across all workspace members:
//! - Configuration types (signing keys, token lifetimes, session store, logging)
//! - Error response structures and stable error codes

pub mod config;
pub mod errors;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheConfig, Environment, JwtConfig, LogFormat, LoggingConfig, SessionConfig,
};
pub use errors::{error_codes, ApiResult, ErrorResponse, IntoErrorResponse};
