//! Error types for authentication and token management
//!
//! Wire-level codes and messages are assigned in the presentation layer.
//! Variants here carry only what the caller may legitimately learn.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Authentication-related errors
///
/// Unknown identifiers and wrong credentials both surface as
/// `InvalidCredentials`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,
}

/// Token-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Malformed, tampered, wrongly signed or expired access token
    #[error("Invalid token")]
    InvalidToken,

    /// Refresh token not present in the store
    #[error("Invalid refresh token: {token}")]
    InvalidRefreshToken { token: String },

    /// Refresh token found past its expiry; the row has been deleted
    #[error("Refresh token {token} expired at {expired_at}")]
    ExpiredRefreshToken {
        token: String,
        expired_at: DateTime<Utc>,
    },

    #[error("Token generation failed")]
    TokenGenerationFailed,
}
