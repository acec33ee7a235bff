//! Access token codec: signs and verifies HS256 access tokens

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, Header, Validation};
use tracing::{debug, error};

use crate::domain::entities::token::Claims;
use crate::domain::entities::user::User;
use crate::errors::{DomainError, TokenError};

use super::config::TokenServiceConfig;
use super::signing_key::SigningKey;

/// Encodes a principal's identity and authorities into a signed, time-bounded
/// token and verifies such tokens on the way back in.
///
/// Holds no mutable state; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct AccessTokenCodec {
    key: SigningKey,
    access_ttl: Duration,
    leeway_seconds: u64,
    validation: Validation,
    expiry_validation: Validation,
}

impl AccessTokenCodec {
    /// Creates a codec with the given key, lifetime and clock-skew tolerance
    pub fn new(key: SigningKey, access_ttl: Duration, leeway_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = leeway_seconds;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);

        // Signature still checked; expiry is read, not enforced.
        let mut expiry_validation = validation.clone();
        expiry_validation.validate_exp = false;

        Self {
            key,
            access_ttl,
            leeway_seconds,
            validation,
            expiry_validation,
        }
    }

    pub fn from_config(key: SigningKey, config: &TokenServiceConfig) -> Self {
        Self::new(key, config.access_token_ttl, config.leeway_seconds)
    }

    /// Configured access token lifetime
    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    /// Issues a signed access token for `user`, valid from now for the configured TTL
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - Compact JWS with `sub` = login identifier and `roles` = authorities
    /// * `Err(DomainError)` - Signing failed
    pub fn issue(&self, user: &User) -> Result<String, DomainError> {
        self.issue_at(user, Utc::now())
    }

    /// Issues a token as if the current time were `now`
    pub fn issue_at(&self, user: &User, now: DateTime<Utc>) -> Result<String, DomainError> {
        let claims = Claims::new(user.email.clone(), user.authorities.clone(), now, self.access_ttl);

        encode(&Header::new(Algorithm::HS256), &claims, self.key.encoding_key()).map_err(|e| {
            error!(error = %e, "Failed to sign access token");
            DomainError::Token(TokenError::TokenGenerationFailed)
        })
    }

    /// Verifies signature and expiry and returns the embedded claims
    ///
    /// Malformed structure, bad signature and expiry all collapse into
    /// [`TokenError::InvalidToken`].
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verifies as if the current time were `now`
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, self.key.decoding_key(), &self.validation).map_err(|e| {
            debug!(reason = ?e.kind(), "Access token rejected");
            TokenError::InvalidToken
        })?;

        // The library accepts exp == now; a token must expire strictly in the future.
        if data.claims.is_expired_at(now, self.leeway_seconds) {
            debug!("Access token rejected: expired");
            return Err(TokenError::InvalidToken);
        }

        Ok(data.claims)
    }

    /// Reads the expiry of a token this codec signed, without enforcing it
    pub fn expiry_of(&self, token: &str) -> Result<DateTime<Utc>, TokenError> {
        let data = decode::<Claims>(token, self.key.decoding_key(), &self.expiry_validation)
            .map_err(|e| {
                debug!(reason = ?e.kind(), "Cannot read expiry of access token");
                TokenError::InvalidToken
            })?;

        Ok(data.claims.expires_at())
    }
}
