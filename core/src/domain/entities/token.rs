//! Token entities for JWT access tokens and opaque refresh tokens.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token type reported alongside issued access tokens
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

/// Claims structure for the access token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (the principal's login identifier)
    pub sub: String,

    /// Authority strings granted to the subject
    #[serde(default)]
    pub roles: Vec<String>,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,
}

impl Claims {
    /// Creates claims issued at `issued_at` and valid for `ttl`
    ///
    /// # Arguments
    ///
    /// * `subject` - The principal's login identifier
    /// * `roles` - Authority strings to embed
    /// * `issued_at` - Issue instant
    /// * `ttl` - Lifetime of the token
    pub fn new(
        subject: impl Into<String>,
        roles: Vec<String>,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            sub: subject.into(),
            roles,
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
        }
    }

    /// Expiry as an instant
    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Checks if the claims have expired at `now`, allowing `leeway_seconds` of skew
    pub fn is_expired_at(&self, now: DateTime<Utc>, leeway_seconds: u64) -> bool {
        let leeway = i64::try_from(leeway_seconds).unwrap_or(i64::MAX);
        self.exp.saturating_add(leeway) <= now.timestamp()
    }
}

/// Refresh token row stored by the token store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshToken {
    /// Surrogate key
    pub id: Uuid,

    /// Opaque token value, unique across all rows
    pub token: String,

    /// Owning principal
    pub user_id: Uuid,

    /// Timestamp when the token expires
    pub expires_at: DateTime<Utc>,

    /// Timestamp when the token was created
    pub created_at: DateTime<Utc>,
}

impl RefreshToken {
    /// Creates a new refresh token row expiring `ttl` from now
    ///
    /// # Arguments
    ///
    /// * `user_id` - The owning principal's id
    /// * `token` - The opaque token value
    /// * `ttl` - Lifetime of the token
    pub fn new(user_id: Uuid, token: String, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            token,
            user_id,
            expires_at: now + ttl,
            created_at: now,
        }
    }

    /// A token is expired once its expiry instant lies strictly before `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Short prefix of the token value, safe for logs
    pub fn log_prefix(&self) -> &str {
        token_prefix(&self.token)
    }
}

/// First eight characters of an opaque token, for log lines
pub fn token_prefix(token: &str) -> &str {
    match token.char_indices().nth(8) {
        Some((idx, _)) => &token[..idx],
        None => token,
    }
}

/// Access/refresh pair handed back to the caller after login or refresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Signed access token
    pub access_token: String,

    /// Opaque refresh token value
    pub refresh_token: String,

    /// Expiry of the access token, read back from its claims
    pub expires_at: DateTime<Utc>,
}

impl TokenPair {
    pub fn new(access_token: String, refresh_token: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_at,
        }
    }

    /// Whole seconds from `now` until the access token expires, never negative
    pub fn expires_in(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_seconds().max(0)
    }
}
