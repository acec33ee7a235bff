//! In-memory implementation of TokenRepository for tests and local runs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::token::RefreshToken;
use crate::errors::{DomainError, TokenError};

use super::r#trait::TokenRepository;

/// In-memory token repository keyed by opaque token value
#[derive(Clone)]
pub struct MockTokenRepository {
    tokens: Arc<RwLock<HashMap<String, RefreshToken>>>,
}

impl MockTokenRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self {
            tokens: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Total number of stored rows
    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tokens.read().await.is_empty()
    }
}

impl Default for MockTokenRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn duplicate_token() -> DomainError {
    DomainError::Validation {
        message: "Token already exists".to_string(),
    }
}

#[async_trait]
impl TokenRepository for MockTokenRepository {
    async fn save(&self, token: RefreshToken) -> Result<RefreshToken, DomainError> {
        let mut tokens = self.tokens.write().await;

        if tokens.contains_key(&token.token) {
            return Err(duplicate_token());
        }

        tokens.insert(token.token.clone(), token.clone());
        Ok(token)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshToken>, DomainError> {
        let tokens = self.tokens.read().await;
        Ok(tokens.get(token).cloned())
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<RefreshToken>, DomainError> {
        let tokens = self.tokens.read().await;
        Ok(tokens
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn replace_for_user(&self, token: &RefreshToken) -> Result<usize, DomainError> {
        // One write guard covers the delete and the insert.
        let mut tokens = self.tokens.write().await;

        if tokens.contains_key(&token.token) {
            return Err(duplicate_token());
        }

        let before = tokens.len();
        tokens.retain(|_, t| t.user_id != token.user_id);
        let superseded = before - tokens.len();

        tokens.insert(token.token.clone(), token.clone());
        Ok(superseded)
    }

    async fn rotate(&self, previous: &str, token: &RefreshToken) -> Result<usize, DomainError> {
        let mut tokens = self.tokens.write().await;

        let owned = tokens
            .get(previous)
            .map(|t| t.user_id == token.user_id)
            .unwrap_or(false);
        if !owned {
            return Err(TokenError::InvalidRefreshToken {
                token: previous.to_string(),
            }
            .into());
        }

        if tokens.contains_key(&token.token) {
            return Err(duplicate_token());
        }

        let before = tokens.len();
        tokens.retain(|_, t| t.user_id != token.user_id);
        let superseded = before - tokens.len();

        tokens.insert(token.token.clone(), token.clone());
        Ok(superseded)
    }

    async fn delete_by_token(&self, token: &str) -> Result<bool, DomainError> {
        let mut tokens = self.tokens.write().await;
        Ok(tokens.remove(token).is_some())
    }

    async fn delete_by_user_id(&self, user_id: Uuid) -> Result<usize, DomainError> {
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|_, t| t.user_id != user_id);
        Ok(before - tokens.len())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|_, t| !t.is_expired_at(now));
        Ok(before - tokens.len())
    }
}
