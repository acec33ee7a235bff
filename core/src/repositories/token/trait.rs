//! Token repository trait defining the interface for refresh token persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::token::RefreshToken;
use crate::errors::DomainError;

/// Repository trait for RefreshToken persistence operations
///
/// Tokens are stored by their opaque value, which is unique across all rows.
/// At most one live row per user is an application rule, enforced through
/// [`TokenRepository::replace_for_user`].
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Save a new refresh token
    ///
    /// # Arguments
    /// * `token` - The RefreshToken row to persist
    ///
    /// # Returns
    /// * `Ok(RefreshToken)` - The saved row
    /// * `Err(DomainError)` - Save failed (e.g., duplicate token value)
    async fn save(&self, token: RefreshToken) -> Result<RefreshToken, DomainError>;

    /// Find a refresh token by its opaque value
    ///
    /// # Returns
    /// * `Ok(Some(RefreshToken))` - Token found
    /// * `Ok(None)` - No row carries this value
    /// * `Err(DomainError)` - Storage error occurred
    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshToken>, DomainError>;

    /// Find every refresh token row owned by a user, expired or not
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<RefreshToken>, DomainError>;

    /// Delete all rows owned by `token.user_id` and insert `token`, as one unit
    ///
    /// Two concurrent calls for the same user must leave exactly one row:
    /// whichever committed last.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of rows superseded
    /// * `Err(DomainError)` - Nothing was changed
    async fn replace_for_user(&self, token: &RefreshToken) -> Result<usize, DomainError>;

    /// Consume `previous` and make `token` the owner's only row, as one unit
    ///
    /// The exchange only goes through while `previous` still exists and
    /// belongs to `token.user_id`. Of two concurrent rotations presenting the
    /// same value, exactly one succeeds.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of rows superseded, `previous` included
    /// * `Err(TokenError::InvalidRefreshToken)` - `previous` was already consumed
    /// * `Err(DomainError)` - Nothing was changed
    async fn rotate(&self, previous: &str, token: &RefreshToken) -> Result<usize, DomainError>;

    /// Delete the row carrying this opaque value
    ///
    /// # Returns
    /// * `Ok(true)` - Row deleted
    /// * `Ok(false)` - No such row
    async fn delete_by_token(&self, token: &str) -> Result<bool, DomainError>;

    /// Delete every row owned by a user
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of rows deleted
    async fn delete_by_user_id(&self, user_id: Uuid) -> Result<usize, DomainError>;

    /// Delete every row whose expiry lies strictly before `now`
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of expired rows deleted
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError>;

    /// Count rows owned by a user
    async fn count_by_user_id(&self, user_id: Uuid) -> Result<usize, DomainError> {
        let tokens = self.find_by_user_id(user_id).await?;
        Ok(tokens.len())
    }
}
