//! MySQL implementation of the TokenRepository trait.
//!
//! Refresh tokens are stored by their opaque value in `refresh_tokens`.
//! Rotation runs in a transaction that locks the owning `users` row, so two
//! concurrent logins for the same user serialize and leave a single row, and
//! two refreshes presenting the same token cannot both consume it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use folio_core::domain::entities::token::RefreshToken;
use folio_core::errors::{DomainError, TokenError};
use folio_core::repositories::TokenRepository;

use super::db_error;

const SELECT_COLUMNS: &str = "SELECT id, token, user_id, expires_at, created_at FROM refresh_tokens";

/// MySQL implementation of TokenRepository
pub struct MySqlTokenRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlTokenRepository {
    /// Create a new MySQL token repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to RefreshToken entity
    fn row_to_token(row: &sqlx::mysql::MySqlRow) -> Result<RefreshToken, DomainError> {
        let id: String = row.try_get("id").map_err(db_error("read refresh_tokens.id"))?;
        let user_id: String = row
            .try_get("user_id")
            .map_err(db_error("read refresh_tokens.user_id"))?;

        Ok(RefreshToken {
            id: parse_uuid(&id)?,
            token: row
                .try_get("token")
                .map_err(db_error("read refresh_tokens.token"))?,
            user_id: parse_uuid(&user_id)?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(db_error("read refresh_tokens.expires_at"))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(db_error("read refresh_tokens.created_at"))?,
        })
    }
}

fn parse_uuid(value: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(value).map_err(|e| DomainError::Internal {
        message: format!("Invalid UUID '{}' in refresh_tokens: {}", value, e),
    })
}

/// Duplicate token values surface as a validation failure, like the in-memory store
fn insert_error(e: sqlx::Error) -> DomainError {
    let unique = e
        .as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false);

    if unique {
        DomainError::Validation {
            message: "Refresh token already exists".to_string(),
        }
    } else {
        db_error("insert refresh token")(e)
    }
}

#[async_trait]
impl TokenRepository for MySqlTokenRepository {
    async fn save(&self, token: RefreshToken) -> Result<RefreshToken, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (id, token, user_id, expires_at, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(token.id.to_string())
        .bind(&token.token)
        .bind(token.user_id.to_string())
        .bind(token.expires_at)
        .bind(token.created_at)
        .execute(&self.pool)
        .await
        .map_err(insert_error)?;

        Ok(token)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshToken>, DomainError> {
        let query = format!("{} WHERE token = ? LIMIT 1", SELECT_COLUMNS);

        let row = sqlx::query(&query)
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("find refresh token"))?;

        row.as_ref().map(Self::row_to_token).transpose()
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<RefreshToken>, DomainError> {
        let query = format!("{} WHERE user_id = ? ORDER BY created_at DESC", SELECT_COLUMNS);

        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("find refresh tokens by user"))?;

        rows.iter().map(Self::row_to_token).collect()
    }

    async fn replace_for_user(&self, token: &RefreshToken) -> Result<usize, DomainError> {
        let user_id = token.user_id.to_string();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("begin token rotation"))?;

        // Serializes rotations for the same user even when they hold no row yet.
        let owner = sqlx::query("SELECT id FROM users WHERE id = ? FOR UPDATE")
            .bind(&user_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_error("lock token owner"))?;

        if owner.is_none() {
            return Err(DomainError::NotFound {
                resource: format!("user {}", token.user_id),
            });
        }

        let superseded = sqlx::query("DELETE FROM refresh_tokens WHERE user_id = ?")
            .bind(&user_id)
            .execute(&mut *tx)
            .await
            .map_err(db_error("delete superseded refresh tokens"))?
            .rows_affected();

        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (id, token, user_id, expires_at, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(token.id.to_string())
        .bind(&token.token)
        .bind(&user_id)
        .bind(token.expires_at)
        .bind(token.created_at)
        .execute(&mut *tx)
        .await
        .map_err(insert_error)?;

        tx.commit().await.map_err(db_error("commit token rotation"))?;

        Ok(superseded as usize)
    }

    async fn rotate(&self, previous: &str, token: &RefreshToken) -> Result<usize, DomainError> {
        let user_id = token.user_id.to_string();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("begin token rotation"))?;

        let owner = sqlx::query("SELECT id FROM users WHERE id = ? FOR UPDATE")
            .bind(&user_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_error("lock token owner"))?;

        if owner.is_none() {
            return Err(DomainError::NotFound {
                resource: format!("user {}", token.user_id),
            });
        }

        // Zero rows means a concurrent rotation or logout got there first.
        let consumed = sqlx::query("DELETE FROM refresh_tokens WHERE token = ? AND user_id = ?")
            .bind(previous)
            .bind(&user_id)
            .execute(&mut *tx)
            .await
            .map_err(db_error("consume refresh token"))?
            .rows_affected();

        if consumed == 0 {
            return Err(TokenError::InvalidRefreshToken {
                token: previous.to_string(),
            }
            .into());
        }

        let others = sqlx::query("DELETE FROM refresh_tokens WHERE user_id = ?")
            .bind(&user_id)
            .execute(&mut *tx)
            .await
            .map_err(db_error("delete superseded refresh tokens"))?
            .rows_affected();

        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (id, token, user_id, expires_at, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(token.id.to_string())
        .bind(&token.token)
        .bind(&user_id)
        .bind(token.expires_at)
        .bind(token.created_at)
        .execute(&mut *tx)
        .await
        .map_err(insert_error)?;

        tx.commit().await.map_err(db_error("commit token rotation"))?;

        Ok((consumed + others) as usize)
    }

    async fn delete_by_token(&self, token: &str) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(db_error("delete refresh token"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_user_id(&self, user_id: Uuid) -> Result<usize, DomainError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE user_id = ?")
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(db_error("delete refresh tokens by user"))?;

        Ok(result.rows_affected() as usize)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at < ?")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(db_error("delete expired refresh tokens"))?;

        Ok(result.rows_affected() as usize)
    }

    async fn count_by_user_id(&self, user_id: Uuid) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM refresh_tokens WHERE user_id = ?")
            .bind(user_id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("count refresh tokens"))?;

        Ok(count as usize)
    }
}
