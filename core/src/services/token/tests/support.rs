//! Store doubles for exercising failure and timeout paths

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration as StdDuration;
use uuid::Uuid;

use crate::domain::entities::token::RefreshToken;
use crate::errors::DomainError;
use crate::repositories::TokenRepository;
use crate::services::token::{SigningKey, TokenServiceConfig};

pub const TEST_SECRET: &str = "test-signing-secret-0123456789abcdef";

pub fn signing_key() -> SigningKey {
    SigningKey::new(TEST_SECRET).unwrap()
}

pub fn fast_config() -> TokenServiceConfig {
    TokenServiceConfig {
        store_timeout: StdDuration::from_millis(50),
        ..TokenServiceConfig::default()
    }
}

fn unavailable() -> DomainError {
    DomainError::Internal {
        message: "token store unavailable".to_string(),
    }
}

/// Every call fails; counts how often it was asked
#[derive(Default)]
pub struct FailingTokenRepository {
    pub calls: AtomicUsize,
}

impl FailingTokenRepository {
    fn hit(&self) -> DomainError {
        self.calls.fetch_add(1, Ordering::SeqCst);
        unavailable()
    }
}

#[async_trait]
impl TokenRepository for FailingTokenRepository {
    async fn save(&self, _token: RefreshToken) -> Result<RefreshToken, DomainError> {
        Err(self.hit())
    }

    async fn find_by_token(&self, _token: &str) -> Result<Option<RefreshToken>, DomainError> {
        Err(self.hit())
    }

    async fn find_by_user_id(&self, _user_id: Uuid) -> Result<Vec<RefreshToken>, DomainError> {
        Err(self.hit())
    }

    async fn replace_for_user(&self, _token: &RefreshToken) -> Result<usize, DomainError> {
        Err(self.hit())
    }

    async fn rotate(&self, _previous: &str, _token: &RefreshToken) -> Result<usize, DomainError> {
        Err(self.hit())
    }

    async fn delete_by_token(&self, _token: &str) -> Result<bool, DomainError> {
        Err(self.hit())
    }

    async fn delete_by_user_id(&self, _user_id: Uuid) -> Result<usize, DomainError> {
        Err(self.hit())
    }

    async fn delete_expired(&self, _now: DateTime<Utc>) -> Result<usize, DomainError> {
        Err(self.hit())
    }
}

/// Hangs far longer than any test deadline, then answers with a live row
pub struct SlowTokenRepository {
    pub row: RefreshToken,
}

const HANG: StdDuration = StdDuration::from_secs(3600);

#[async_trait]
impl TokenRepository for SlowTokenRepository {
    async fn save(&self, token: RefreshToken) -> Result<RefreshToken, DomainError> {
        tokio::time::sleep(HANG).await;
        Ok(token)
    }

    async fn find_by_token(&self, _token: &str) -> Result<Option<RefreshToken>, DomainError> {
        tokio::time::sleep(HANG).await;
        Ok(Some(self.row.clone()))
    }

    async fn find_by_user_id(&self, _user_id: Uuid) -> Result<Vec<RefreshToken>, DomainError> {
        tokio::time::sleep(HANG).await;
        Ok(vec![self.row.clone()])
    }

    async fn replace_for_user(&self, _token: &RefreshToken) -> Result<usize, DomainError> {
        tokio::time::sleep(HANG).await;
        Ok(0)
    }

    async fn rotate(&self, _previous: &str, _token: &RefreshToken) -> Result<usize, DomainError> {
        tokio::time::sleep(HANG).await;
        Ok(1)
    }

    async fn delete_by_token(&self, _token: &str) -> Result<bool, DomainError> {
        tokio::time::sleep(HANG).await;
        Ok(true)
    }

    async fn delete_by_user_id(&self, _user_id: Uuid) -> Result<usize, DomainError> {
        tokio::time::sleep(HANG).await;
        Ok(1)
    }

    async fn delete_expired(&self, _now: DateTime<Utc>) -> Result<usize, DomainError> {
        tokio::time::sleep(HANG).await;
        Ok(1)
    }
}
