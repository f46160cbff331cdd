//! Tests for claim minting and verification

use chrono::{Duration, Utc};
use jsonwebtoken::Algorithm;

use super::*;
use crate::errors::{DomainError, TokenError};

fn token_error(err: DomainError) -> TokenError {
    err.as_token_error().cloned().expect("expected a token error")
}

#[test]
fn test_mint_and_verify() {
    let codec = codec();
    let token = codec.mint(42, Duration::hours(2)).unwrap();

    // Compact JWS serialization
    assert_eq!(token.split('.').count(), 3);

    let claims = codec.verify(&token).unwrap();
    assert_eq!(claims.uid, 42);
    assert_eq!(claims.exp - claims.iat, 2 * 60 * 60);
    assert!(claims.iss.is_none());
    assert!(!claims.jti.is_empty());
}

#[test]
fn test_tokens_minted_together_differ() {
    let codec = codec();
    let now = Utc::now();
    let first = codec.mint_at(7, now, Duration::days(30)).unwrap();
    let second = codec.mint_at(7, now, Duration::days(30)).unwrap();
    assert_ne!(first, second);
}

#[test]
fn test_mint_rejects_bad_input() {
    let codec = codec();

    assert!(matches!(
        codec.mint(0, Duration::hours(1)),
        Err(DomainError::Validation { .. })
    ));
    assert!(matches!(
        codec.mint(1, Duration::zero()),
        Err(DomainError::Validation { .. })
    ));
    assert!(matches!(
        codec.mint(1, Duration::milliseconds(500)),
        Err(DomainError::Validation { .. })
    ));
}

#[test]
fn test_negative_principal_round_trips() {
    let codec = codec();
    let token = codec.mint(-5, Duration::hours(1)).unwrap();
    assert_eq!(codec.verify(&token).unwrap().uid, -5);
}

#[test]
fn test_expired_token() {
    let codec = codec();
    let token = codec
        .mint_at(42, Utc::now() - Duration::hours(2), Duration::hours(1))
        .unwrap();

    let err = codec.verify(&token).unwrap_err();
    assert_eq!(token_error(err), TokenError::TokenExpired);
}

#[test]
fn test_leeway_accepts_recently_expired_token() {
    let strict = codec();
    let lenient = ClaimCodec::new(rsa_keys(), None, 120);
    let token = strict
        .mint_at(42, Utc::now() - Duration::seconds(90), Duration::seconds(30))
        .unwrap();

    assert!(strict.verify(&token).is_err());
    assert_eq!(lenient.verify(&token).unwrap().uid, 42);
}

#[test]
fn test_forged_signature() {
    let forger = ClaimCodec::new(foreign_keys(), None, 0);
    let forged = forger.mint(42, Duration::hours(1)).unwrap();

    let err = codec().verify(&forged).unwrap_err();
    assert_eq!(token_error(err), TokenError::InvalidSignature);
}

#[test]
fn test_tampered_payload() {
    let codec = codec();
    let token = codec.mint(42, Duration::hours(1)).unwrap();
    let other = codec.mint(43, Duration::hours(1)).unwrap();

    // Splice the second token's payload under the first token's signature
    let parts: Vec<&str> = token.split('.').collect();
    let other_parts: Vec<&str> = other.split('.').collect();
    let tampered = format!("{}.{}.{}", parts[0], other_parts[1], parts[2]);

    let err = codec.verify(&tampered).unwrap_err();
    assert_eq!(token_error(err), TokenError::InvalidSignature);
}

#[test]
fn test_malformed_tokens() {
    let codec = codec();
    for token in ["", "not-a-token", "a.b", "a.b.c"] {
        let err = codec.verify(token).unwrap_err();
        assert!(
            err.is_authentication_failure(),
            "token {:?} should be rejected",
            token
        );
    }

    let err = codec.verify("not-a-token").unwrap_err();
    assert_eq!(token_error(err), TokenError::InvalidTokenFormat);
}

#[test]
fn test_issuer_is_stamped_and_required() {
    let issuing = ClaimCodec::new(rsa_keys(), Some("tessera".to_string()), 0);
    let token = issuing.mint(42, Duration::hours(1)).unwrap();
    let claims = issuing.verify(&token).unwrap();
    assert_eq!(claims.iss.as_deref(), Some("tessera"));

    // A token without the issuer is rejected by a codec that requires one
    let anonymous = codec().mint(42, Duration::hours(1)).unwrap();
    let err = issuing.verify(&anonymous).unwrap_err();
    assert_eq!(token_error(err), TokenError::InvalidClaims);

    // And a token from another issuer too
    let other = ClaimCodec::new(rsa_keys(), Some("elsewhere".to_string()), 0);
    let foreign_issuer = other.mint(42, Duration::hours(1)).unwrap();
    let err = issuing.verify(&foreign_issuer).unwrap_err();
    assert_eq!(token_error(err), TokenError::InvalidClaims);
}

#[test]
fn test_ec_codec() {
    let keys = KeyManager::from_pem(
        Algorithm::ES256,
        EC_PRIVATE_KEY.as_bytes(),
        EC_PUBLIC_KEY.as_bytes(),
    )
    .unwrap();
    let codec = ClaimCodec::new(keys, None, 0);
    assert_eq!(codec.algorithm(), Algorithm::ES256);

    let token = codec.mint(42, Duration::minutes(5)).unwrap();
    assert_eq!(codec.verify(&token).unwrap().uid, 42);

    // An RSA-signed token does not verify under the EC key
    let rsa_token = super::codec().mint(42, Duration::minutes(5)).unwrap();
    assert!(codec.verify(&rsa_token).is_err());
}
