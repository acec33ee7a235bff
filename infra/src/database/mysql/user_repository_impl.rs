//! MySQL implementation of the UserRepository trait.
//!
//! Principals live in `users`; granted authorities in `user_authorities`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use folio_core::domain::entities::user::User;
use folio_core::errors::DomainError;
use folio_core::repositories::UserRepository;

use super::db_error;

/// MySQL implementation of UserRepository
pub struct MySqlUserRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlUserRepository {
    /// Create a new MySQL user repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: &sqlx::mysql::MySqlRow) -> Result<User, DomainError> {
        let id: String = row.try_get("id").map_err(db_error("read users.id"))?;

        Ok(User {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
                message: format!("Invalid UUID '{}' in users: {}", id, e),
            })?,
            email: row.try_get("email").map_err(db_error("read users.email"))?,
            password_hash: row
                .try_get("password_hash")
                .map_err(db_error("read users.password_hash"))?,
            authorities: Vec::new(),
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(db_error("read users.created_at"))?,
        })
    }

    async fn load_authorities(&self, mut user: User) -> Result<User, DomainError> {
        user.authorities = sqlx::query_scalar(
            "SELECT authority FROM user_authorities WHERE user_id = ? ORDER BY authority",
        )
        .bind(user.id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("load user authorities"))?;

        Ok(user)
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(
            "SELECT id, email, password_hash, created_at FROM users WHERE id = ? LIMIT 1",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("find user by id"))?;

        match row {
            Some(row) => Ok(Some(self.load_authorities(Self::row_to_user(&row)?).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        // The column collation is case-insensitive; LOWER keeps it explicit.
        let row = sqlx::query(
            "SELECT id, email, password_hash, created_at FROM users WHERE LOWER(email) = LOWER(?) LIMIT 1",
        )
        .bind(email.trim())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("find user by email"))?;

        match row {
            Some(row) => Ok(Some(self.load_authorities(Self::row_to_user(&row)?).await?)),
            None => Ok(None),
        }
    }
}
