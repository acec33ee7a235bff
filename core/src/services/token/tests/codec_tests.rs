//! Tests for the access token codec

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{Duration, Utc};

use crate::domain::entities::user::{User, ROLE_ADMIN, ROLE_USER};
use crate::errors::TokenError;
use crate::services::token::{AccessTokenCodec, SigningKey};

use super::support::{signing_key, TEST_SECRET};

fn codec() -> AccessTokenCodec {
    AccessTokenCodec::new(signing_key(), Duration::seconds(900), 0)
}

fn reader() -> User {
    User::new("reader@folio.test", "hash").with_authorities([ROLE_USER, ROLE_ADMIN])
}

#[test]
fn test_issue_then_verify_round_trip() {
    let codec = codec();
    let user = reader();

    let token = codec.issue(&user).unwrap();
    let claims = codec.verify(&token).unwrap();

    assert_eq!(claims.sub, "reader@folio.test");
    assert_eq!(claims.roles, vec![ROLE_USER.to_string(), ROLE_ADMIN.to_string()]);
    assert_eq!(claims.exp - claims.iat, 900);
}

#[test]
fn test_expiry_of_matches_claims() {
    let codec = codec();
    let now = Utc::now();
    let token = codec.issue_at(&reader(), now).unwrap();

    let expiry = codec.expiry_of(&token).unwrap();
    assert_eq!(expiry.timestamp(), (now + Duration::seconds(900)).timestamp());
}

#[test]
fn test_expired_token_is_invalid_but_expiry_is_readable() {
    let codec = codec();
    let issued = Utc::now() - Duration::seconds(1000);
    let token = codec.issue_at(&reader(), issued).unwrap();

    assert_eq!(codec.verify(&token), Err(TokenError::InvalidToken));
    assert!(codec.expiry_of(&token).is_ok());
}

#[test]
fn test_token_expiring_now_is_invalid() {
    let codec = codec();
    let now = Utc::now();
    let token = codec.issue_at(&reader(), now - Duration::seconds(900)).unwrap();

    assert_eq!(codec.verify_at(&token, now), Err(TokenError::InvalidToken));
}

#[test]
fn test_leeway_tolerates_small_skew() {
    let codec = AccessTokenCodec::new(signing_key(), Duration::seconds(900), 30);
    let token = codec
        .issue_at(&reader(), Utc::now() - Duration::seconds(910))
        .unwrap();

    assert!(codec.verify(&token).is_ok());
}

#[test]
fn test_tampered_payload_is_invalid() {
    let codec = codec();
    let token = codec.issue(&reader()).unwrap();

    let parts: Vec<&str> = token.split('.').collect();
    let payload = String::from_utf8(URL_SAFE_NO_PAD.decode(parts[1]).unwrap()).unwrap();
    let forged_payload = URL_SAFE_NO_PAD.encode(payload.replace("reader@", "admin@"));
    let forged = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

    assert_eq!(codec.verify(&forged), Err(TokenError::InvalidToken));
    assert_eq!(codec.expiry_of(&forged), Err(TokenError::InvalidToken));
}

#[test]
fn test_flipped_signature_byte_is_invalid() {
    let codec = codec();
    let token = codec.issue(&reader()).unwrap();

    let (signed, signature) = token.rsplit_once('.').unwrap();
    let first = signature.chars().next().unwrap();
    let flipped = if first == 'A' { 'B' } else { 'A' };
    let forged = format!("{}.{}{}", signed, flipped, &signature[1..]);

    assert_eq!(codec.verify(&forged), Err(TokenError::InvalidToken));
}

#[test]
fn test_foreign_key_is_invalid() {
    let other = AccessTokenCodec::new(
        SigningKey::new("another-signing-secret-abcdefghijklmnop").unwrap(),
        Duration::seconds(900),
        0,
    );
    let token = other.issue(&reader()).unwrap();

    assert_ne!(TEST_SECRET, "another-signing-secret-abcdefghijklmnop");
    assert_eq!(codec().verify(&token), Err(TokenError::InvalidToken));
}

#[test]
fn test_malformed_tokens_are_invalid() {
    let codec = codec();

    for garbage in ["", "abc", "a.b.c", "Bearer x.y.z"] {
        assert_eq!(codec.verify(garbage), Err(TokenError::InvalidToken));
        assert_eq!(codec.expiry_of(garbage), Err(TokenError::InvalidToken));
    }
}
