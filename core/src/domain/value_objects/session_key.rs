//! Session store key derivation

use std::fmt;

/// Store key under which a principal's authoritative refresh token lives
///
/// Formatted as `<namespace>:<principal_id>`, one key per principal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey(String);

impl SessionKey {
    /// Derives the key for `principal_id` within `namespace`
    pub fn new(namespace: &str, principal_id: i64) -> Self {
        Self(format!("{}:{}", namespace, principal_id))
    }

    /// Returns the key as stored
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SessionKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_key_format() {
        let key = SessionKey::new("refresh_token", 42);
        assert_eq!(key.as_str(), "refresh_token:42");
        assert_eq!(key.to_string(), "refresh_token:42");
    }

    #[test]
    fn test_session_key_is_per_principal() {
        assert_ne!(SessionKey::new("refresh_token", 1), SessionKey::new("refresh_token", 2));
        assert_eq!(SessionKey::new("rt", -7).as_str(), "rt:-7");
    }
}
