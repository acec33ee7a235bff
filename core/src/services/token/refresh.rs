//! Refresh token manager
//!
//! Issues opaque refresh tokens, keeps at most one live row per user and
//! deletes rows that are presented after their expiry.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{Duration, Utc};
use rand::{rngs::OsRng, RngCore};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration as StdDuration;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::entities::token::{token_prefix, RefreshToken};
use crate::domain::entities::user::User;
use crate::errors::{DomainError, DomainResult, TokenError};
use crate::repositories::TokenRepository;

use super::config::TokenServiceConfig;

/// Random bytes per refresh token; 54 bytes encode to 72 URL-safe characters
pub const REFRESH_TOKEN_BYTES: usize = 54;

/// Generates a new opaque refresh token value from the OS CSPRNG
pub fn generate_token_value() -> String {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Runs a store call under a deadline; an elapsed deadline is a failure
pub(crate) async fn with_deadline<T, F>(
    deadline: StdDuration,
    operation: &'static str,
    call: F,
) -> DomainResult<T>
where
    F: Future<Output = DomainResult<T>>,
{
    match tokio::time::timeout(deadline, call).await {
        Ok(result) => result,
        Err(_) => {
            warn!(operation, timeout_ms = deadline.as_millis() as u64, "Store call timed out");
            Err(DomainError::Timeout {
                operation: operation.to_string(),
            })
        }
    }
}

/// Manager enforcing the refresh token lifecycle over a [`TokenRepository`]
pub struct RefreshTokenManager<R: TokenRepository> {
    repository: Arc<R>,
    refresh_ttl: Duration,
    store_timeout: StdDuration,
}

impl<R: TokenRepository> RefreshTokenManager<R> {
    pub fn new(repository: Arc<R>, config: &TokenServiceConfig) -> Self {
        Self {
            repository,
            refresh_ttl: config.refresh_token_ttl,
            store_timeout: config.store_timeout,
        }
    }

    /// Underlying token store
    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Deadline applied to every store call
    pub fn store_timeout(&self) -> StdDuration {
        self.store_timeout
    }

    /// Issues a new refresh token for `user`, superseding any row they already hold
    ///
    /// The delete of the previous row and the insert of the new one happen as
    /// a single store operation, so concurrent logins for the same user still
    /// leave exactly one row.
    ///
    /// # Returns
    ///
    /// * `Ok(RefreshToken)` - The persisted row
    /// * `Err(DomainError)` - Store failure or timeout; nothing was issued
    pub async fn create(&self, user: &User) -> DomainResult<RefreshToken> {
        let token = RefreshToken::new(user.id, generate_token_value(), self.refresh_ttl);

        let superseded = with_deadline(
            self.store_timeout,
            "replace_for_user",
            self.repository.replace_for_user(&token),
        )
        .await?;

        info!(
            user_id = %user.id,
            token = token.log_prefix(),
            superseded,
            expires_at = %token.expires_at,
            "Issued refresh token"
        );

        Ok(token)
    }

    /// Exchanges the live row `previous` for a fresh one owned by the same user
    ///
    /// Consuming `previous` and inserting its successor is one store
    /// operation, so a value presented twice at once is exchanged only once.
    ///
    /// # Returns
    ///
    /// * `Ok(RefreshToken)` - The successor row
    /// * `Err(TokenError::InvalidRefreshToken)` - `previous` was already consumed
    /// * `Err(DomainError)` - Store failure or timeout; nothing was issued
    pub async fn rotate(&self, previous: &RefreshToken) -> DomainResult<RefreshToken> {
        let token = RefreshToken::new(previous.user_id, generate_token_value(), self.refresh_ttl);

        let superseded = with_deadline(
            self.store_timeout,
            "rotate",
            self.repository.rotate(&previous.token, &token),
        )
        .await?;

        info!(
            user_id = %token.user_id,
            previous = previous.log_prefix(),
            token = token.log_prefix(),
            superseded,
            "Rotated refresh token"
        );

        Ok(token)
    }

    /// Looks up a presented refresh token
    ///
    /// Success leaves the row untouched; consuming it is the job of
    /// [`RefreshTokenManager::rotate`]. A row past its expiry is deleted
    /// before the error is returned.
    ///
    /// # Returns
    ///
    /// * `Ok(RefreshToken)` - Live row
    /// * `Err(TokenError::InvalidRefreshToken)` - No row carries this value
    /// * `Err(TokenError::ExpiredRefreshToken)` - Row was expired and is now gone
    /// * `Err(DomainError::Timeout)` - Store did not answer in time
    pub async fn validate(&self, value: &str) -> DomainResult<RefreshToken> {
        let found = with_deadline(
            self.store_timeout,
            "find_by_token",
            self.repository.find_by_token(value),
        )
        .await?;

        let token = match found {
            Some(token) => token,
            None => {
                debug!(token = token_prefix(value), "Refresh token not found");
                return Err(TokenError::InvalidRefreshToken {
                    token: value.to_string(),
                }
                .into());
            }
        };

        if token.is_expired_at(Utc::now()) {
            // A failed delete is left to the sweeper; the token is refused either way.
            if let Err(e) = with_deadline(
                self.store_timeout,
                "delete_by_token",
                self.repository.delete_by_token(&token.token),
            )
            .await
            {
                warn!(token = token.log_prefix(), error = %e, "Failed to delete expired refresh token");
            }

            info!(
                user_id = %token.user_id,
                token = token.log_prefix(),
                expired_at = %token.expires_at,
                "Rejected expired refresh token"
            );

            return Err(TokenError::ExpiredRefreshToken {
                token: token.token,
                expired_at: token.expires_at,
            }
            .into());
        }

        Ok(token)
    }

    /// Deletes the row carrying `value`; absence is not an error
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - A row was deleted
    /// * `Ok(false)` - No such row
    pub async fn revoke(&self, value: &str) -> DomainResult<bool> {
        let deleted = with_deadline(
            self.store_timeout,
            "delete_by_token",
            self.repository.delete_by_token(value),
        )
        .await?;

        debug!(token = token_prefix(value), deleted, "Revoked refresh token");
        Ok(deleted)
    }

    /// Deletes every refresh token held by `user_id`
    pub async fn revoke_all_for_user(&self, user_id: Uuid) -> DomainResult<usize> {
        let deleted = with_deadline(
            self.store_timeout,
            "delete_by_user_id",
            self.repository.delete_by_user_id(user_id),
        )
        .await?;

        info!(user_id = %user_id, deleted, "Revoked all refresh tokens for user");
        Ok(deleted)
    }
}
