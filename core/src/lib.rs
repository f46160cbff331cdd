//! # Tessera Core
//!
//! Token lifecycle domain for the Tessera backend.
//! This crate contains the claim and session entities, the session store
//! contract, the signing key manager, the claim codec and the token service
//! that issues, verifies, rotates and revokes credential pairs.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
