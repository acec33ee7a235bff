//! Token lifecycle services
//!
//! This module handles:
//! - Signing key validation
//! - Access token issuing and verification
//! - Refresh token issuing, validation and revocation
//! - Scheduled sweeping of expired refresh tokens

mod cleanup;
mod codec;
mod config;
mod refresh;
mod schedule;
mod signing_key;

#[cfg(test)]
mod tests;

pub use cleanup::{CleanupResult, TokenCleanupConfig, TokenCleanupService};
pub use codec::AccessTokenCodec;
pub use config::TokenServiceConfig;
pub use refresh::{generate_token_value, RefreshTokenManager, REFRESH_TOKEN_BYTES};
pub(crate) use refresh::with_deadline;
pub use schedule::SweepSchedule;
pub use signing_key::{SigningKey, MIN_SECRET_BYTES};
