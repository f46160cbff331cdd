//! Value objects representing immutable domain concepts.

pub mod session_key;

// Re-export commonly used types
pub use session_key::SessionKey;
