//! User repository trait: the principal store consulted by login and the
//! authentication gate.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Read-only access to principals
///
/// Users are created and edited elsewhere; the token lifecycle only looks
/// them up by id or by login identifier.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their unique identifier
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No such user
    /// * `Err(DomainError)` - Storage error occurred
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Find a user by login identifier (email, compared case-insensitively)
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;
}
