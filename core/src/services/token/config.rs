//! Configuration for the token services

use chrono::Duration;
use folio_shared::config::AuthConfig;
use std::time::Duration as StdDuration;

use crate::errors::DomainError;

/// Lifetimes and deadlines shared by the codec, the refresh manager and the sweeper
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// Access token lifetime
    pub access_token_ttl: Duration,
    /// Refresh token lifetime
    pub refresh_token_ttl: Duration,
    /// Clock skew tolerance for access token expiry, in seconds
    pub leeway_seconds: u64,
    /// Deadline for a single token-store call
    pub store_timeout: StdDuration,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            access_token_ttl: Duration::seconds(900),
            refresh_token_ttl: Duration::days(7),
            leeway_seconds: 0,
            store_timeout: StdDuration::from_millis(5000),
        }
    }
}

impl TokenServiceConfig {
    /// Build from the loaded auth configuration, rejecting non-positive lifetimes
    pub fn from_auth_config(config: &AuthConfig) -> Result<Self, DomainError> {
        if config.jwt.access_token_ttl_seconds <= 0 {
            return Err(DomainError::configuration(
                "auth.jwt.access_token_ttl_seconds must be positive",
            ));
        }
        if config.jwt.refresh_token_ttl_days <= 0 {
            return Err(DomainError::configuration(
                "auth.jwt.refresh_token_ttl_days must be positive",
            ));
        }
        if config.store_timeout_ms == 0 {
            return Err(DomainError::configuration(
                "auth.store_timeout_ms must be positive",
            ));
        }

        Ok(Self {
            access_token_ttl: Duration::seconds(config.jwt.access_token_ttl_seconds),
            refresh_token_ttl: Duration::days(config.jwt.refresh_token_ttl_days),
            leeway_seconds: config.jwt.leeway_seconds,
            store_timeout: StdDuration::from_millis(config.store_timeout_ms),
        })
    }
}
