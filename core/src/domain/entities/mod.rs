//! Domain entities representing signed claims and issued credentials.

pub mod token;


// Re-export commonly used types
pub use token::{Claims, RefreshOutcome, TokenPair};
