//! End-to-end token lifecycle through the public API

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::Algorithm;
use ts_core::{
    ClaimCodec, InMemorySessionStore, KeyManager, SessionStore, TokenError, TokenService,
    TokenServiceConfig,
};
use ts_shared::config::{JwtConfig, SessionConfig};

const PRIVATE_KEY_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/keys/test/jwt_private_key.pem");
const PUBLIC_KEY_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/keys/test/jwt_public_key.pem");

fn build_service(store: InMemorySessionStore) -> TokenService<InMemorySessionStore> {
    let jwt = JwtConfig::new("RS256", PRIVATE_KEY_PATH, PUBLIC_KEY_PATH).with_issuer("tessera");
    let session = SessionConfig::default();

    let keys = KeyManager::from_config(&jwt).expect("test keys should load");
    assert_eq!(keys.algorithm(), Algorithm::RS256);

    let codec = ClaimCodec::from_config(keys, &jwt);
    let config = TokenServiceConfig::from_settings(&jwt, &session).expect("lifetimes should fit");
    TokenService::new(codec, store, config).expect("configuration should be valid")
}

#[tokio::test]
async fn test_login_refresh_logout() {
    let store = InMemorySessionStore::new();
    let service = build_service(store.clone());

    let pair = service.generate_token(42).await.unwrap();
    assert_eq!(service.parse_token(&pair.access_token).unwrap(), 42);
    assert_eq!(
        service.parse_claims(&pair.access_token).unwrap().iss.as_deref(),
        Some("tessera")
    );

    let outcome = service.refresh_token(&pair.refresh_token).await.unwrap();
    assert!(!outcome.rotated);
    assert_eq!(outcome.tokens.refresh_token, pair.refresh_token);

    service.clean_token(42).await.unwrap();
    assert!(store.get("refresh_token:42").await.unwrap().is_none());

    let err = service.refresh_token(&pair.refresh_token).await.unwrap_err();
    assert_eq!(err.as_token_error(), Some(&TokenError::TokenRevoked));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_logins_for_distinct_principals() {
    let store = InMemorySessionStore::new();
    let service = Arc::new(build_service(store.clone()));

    let mut handles = Vec::new();
    for principal_id in 1..=32 {
        let service = Arc::clone(&service);
        handles.push(tokio::spawn(async move {
            let pair = service.generate_token(principal_id).await.unwrap();
            (principal_id, pair)
        }));
    }

    for handle in handles {
        let (principal_id, pair) = handle.await.unwrap();
        assert_eq!(service.parse_token(&pair.access_token).unwrap(), principal_id);
        assert!(service.refresh_token(&pair.refresh_token).await.is_ok());
    }

    assert_eq!(store.len().await, 32);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_refresh_of_fresh_token() {
    let store = InMemorySessionStore::new();
    let service = Arc::new(build_service(store));

    let pair = service.generate_token(7).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..16 {
        let service = Arc::clone(&service);
        let refresh = pair.refresh_token.clone();
        handles.push(tokio::spawn(async move { service.refresh_token(&refresh).await }));
    }

    for handle in handles {
        let outcome = handle.await.unwrap().unwrap();
        assert!(!outcome.rotated);
        assert_eq!(outcome.tokens.refresh_token, pair.refresh_token);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_rotations_leave_one_live_token() {
    let store = InMemorySessionStore::new();
    let service = Arc::new(build_service(store.clone()));
    let config = service.config().clone();

    // Near expiry: 5 of 30 days left
    let aged = service
        .codec()
        .mint_at(9, Utc::now() - Duration::days(25), config.refresh_token_ttl)
        .unwrap();
    store
        .set(
            service.session_key(9).as_str(),
            &aged,
            config.refresh_token_ttl.to_std().unwrap(),
        )
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let service = Arc::clone(&service);
        let refresh = aged.clone();
        handles.push(tokio::spawn(async move { service.refresh_token(&refresh).await }));
    }

    let mut issued = HashSet::new();
    for handle in handles {
        match handle.await.unwrap() {
            Ok(outcome) => {
                assert!(outcome.rotated);
                issued.insert(outcome.tokens.refresh_token);
            }
            Err(err) => assert_eq!(err.as_token_error(), Some(&TokenError::TokenRevoked)),
        }
    }
    assert!(!issued.is_empty());

    // Whichever write landed last is the only token that still redeems
    let live = store.get("refresh_token:9").await.unwrap().unwrap();
    assert!(issued.contains(&live));
    for token in issued.iter().filter(|token| **token != live) {
        assert!(service.refresh_token(token).await.is_err());
    }
    assert!(service.refresh_token(&live).await.is_ok());
    assert!(service.refresh_token(&aged).await.is_err());
}
