//! User entity representing a principal that can be issued tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Authority granted to every registered reader
pub const ROLE_USER: &str = "ROLE_USER";

/// Authority granted to library staff
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";

/// User entity as seen by the token lifecycle.
///
/// Records are owned by the principal store; this crate only looks them up.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Unique login identifier
    pub email: String,

    /// Credential hash, never serialized
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Granted authority strings, e.g. `ROLE_USER`
    pub authorities: Vec<String>,

    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a new User with the default `ROLE_USER` authority
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            password_hash: password_hash.into(),
            authorities: vec![ROLE_USER.to_string()],
            created_at: Utc::now(),
        }
    }

    /// Replaces the granted authorities
    pub fn with_authorities<I, S>(mut self, authorities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authorities = authorities.into_iter().map(Into::into).collect();
        self
    }

    /// Checks whether the user holds the given authority
    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|a| a == authority)
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .field("authorities", &self.authorities)
            .field("created_at", &self.created_at)
            .finish()
    }
}
