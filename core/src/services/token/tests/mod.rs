//! Tests for the token services

mod codec_tests;

use jsonwebtoken::Algorithm;

use crate::repositories::InMemorySessionStore;
use crate::services::token::{ClaimCodec, KeyManager, TokenService, TokenServiceConfig};

pub(super) const PRIVATE_KEY: &str = include_str!("../../../../keys/test/jwt_private_key.pem");
pub(super) const PUBLIC_KEY: &str = include_str!("../../../../keys/test/jwt_public_key.pem");
pub(super) const FOREIGN_PRIVATE_KEY: &str =
    include_str!("../../../../keys/test/jwt_foreign_private_key.pem");
pub(super) const FOREIGN_PUBLIC_KEY: &str =
    include_str!("../../../../keys/test/jwt_foreign_public_key.pem");
pub(super) const EC_PRIVATE_KEY: &str = include_str!("../../../../keys/test/ec_private_key.pem");
pub(super) const EC_PUBLIC_KEY: &str = include_str!("../../../../keys/test/ec_public_key.pem");

pub(super) fn rsa_keys() -> KeyManager {
    KeyManager::from_pem(Algorithm::RS256, PRIVATE_KEY.as_bytes(), PUBLIC_KEY.as_bytes())
        .expect("test RSA keys should load")
}

pub(super) fn foreign_keys() -> KeyManager {
    KeyManager::from_pem(
        Algorithm::RS256,
        FOREIGN_PRIVATE_KEY.as_bytes(),
        FOREIGN_PUBLIC_KEY.as_bytes(),
    )
    .expect("foreign RSA keys should load")
}

pub(super) fn codec() -> ClaimCodec {
    ClaimCodec::new(rsa_keys(), None, 0)
}

/// Service over an in-memory store; the returned store shares state with the service
pub(super) fn service() -> (TokenService<InMemorySessionStore>, InMemorySessionStore) {
    let store = InMemorySessionStore::new();
    let service = TokenService::new(codec(), store.clone(), TokenServiceConfig::default())
        .expect("default config should be valid");
    (service, store)
}
