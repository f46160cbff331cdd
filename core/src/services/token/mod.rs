//! Token service module for JWT management
//!
//! This module handles all token-related operations including:
//! - Asymmetric signing key management
//! - Claim minting and verification
//! - Refresh token rotation against the session store
//! - Session revocation

mod bearer;
mod codec;
mod config;
mod key_manager;
mod service;

#[cfg(test)]
mod tests;

pub use bearer::extract_bearer_token;
pub use codec::ClaimCodec;
pub use config::{TokenServiceConfig, ROTATION_THRESHOLD_DIVISOR};
pub use key_manager::KeyManager;
pub use service::TokenService;
