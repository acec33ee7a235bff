//! Tests for the expired refresh token sweeper

use chrono::{Duration, Utc};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use crate::domain::entities::token::RefreshToken;
use crate::repositories::{MockTokenRepository, TokenRepository};
use crate::services::token::{
    generate_token_value, SweepSchedule, TokenCleanupConfig, TokenCleanupService,
};

use super::support::{FailingTokenRepository, SlowTokenRepository};

async fn seed(repo: &MockTokenRepository, expires_in: Duration) -> RefreshToken {
    let mut row = RefreshToken::new(uuid::Uuid::new_v4(), generate_token_value(), Duration::days(7));
    row.expires_at = Utc::now() + expires_in;
    repo.save(row).await.unwrap()
}

#[tokio::test]
async fn test_sweep_deletes_only_expired_rows() {
    let repo = Arc::new(MockTokenRepository::new());
    let expired = seed(&repo, -Duration::seconds(1)).await;
    seed(&repo, -Duration::days(3)).await;
    let live = seed(&repo, Duration::hours(1)).await;

    let service = TokenCleanupService::new(Arc::clone(&repo), TokenCleanupConfig::default());
    let result = service.run_cleanup().await;

    assert!(result.is_success());
    assert_eq!(result.expired_tokens_deleted, 2);
    assert!(repo.find_by_token(&expired.token).await.unwrap().is_none());
    assert!(repo.find_by_token(&live.token).await.unwrap().is_some());
}

#[tokio::test]
async fn test_sweep_is_idempotent() {
    let repo = Arc::new(MockTokenRepository::new());
    seed(&repo, -Duration::minutes(5)).await;

    let service = TokenCleanupService::new(Arc::clone(&repo), TokenCleanupConfig::default());

    assert_eq!(service.run_cleanup().await.expired_tokens_deleted, 1);
    let second = service.run_cleanup().await;
    assert!(second.is_success());
    assert_eq!(second.expired_tokens_deleted, 0);
}

#[tokio::test]
async fn test_sweep_never_raises_on_store_failure() {
    let repo = Arc::new(FailingTokenRepository::default());
    let service = TokenCleanupService::new(Arc::clone(&repo), TokenCleanupConfig::default());

    let result = service.run_cleanup().await;

    assert!(!result.is_success());
    assert_eq!(result.expired_tokens_deleted, 0);
    assert_eq!(repo.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_sweep_timeout_is_reported() {
    let row = RefreshToken::new(uuid::Uuid::new_v4(), generate_token_value(), Duration::days(7));
    let config = TokenCleanupConfig {
        store_timeout: StdDuration::from_millis(50),
        ..TokenCleanupConfig::default()
    };
    let service = TokenCleanupService::new(Arc::new(SlowTokenRepository { row }), config);

    let result = service.run_cleanup().await;
    assert!(result.error.unwrap().contains("timed out"));
}

#[tokio::test(start_paused = true)]
async fn test_background_task_runs_on_schedule_and_stops() {
    let repo = Arc::new(MockTokenRepository::new());
    let config = TokenCleanupConfig {
        schedule: SweepSchedule::Every(StdDuration::from_secs(60)),
        ..TokenCleanupConfig::default()
    };
    let service = Arc::new(TokenCleanupService::new(Arc::clone(&repo), config));
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();

    let handle = service
        .start_background_task(async move {
            let _ = stop_rx.await;
        })
        .unwrap();

    seed(&repo, -Duration::seconds(1)).await;
    tokio::time::sleep(StdDuration::from_secs(61)).await;
    assert!(repo.is_empty().await);

    stop_tx.send(()).unwrap();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_disabled_sweeper_does_not_start() {
    let config = TokenCleanupConfig {
        enabled: false,
        ..TokenCleanupConfig::default()
    };
    let service = Arc::new(TokenCleanupService::new(
        Arc::new(MockTokenRepository::new()),
        config,
    ));

    assert!(service.start_background_task(std::future::pending()).is_none());
}

#[test]
fn test_config_from_sweep_settings() {
    let sweep = folio_shared::config::SweepConfig {
        enabled: true,
        schedule: "@every 15m".to_string(),
    };
    let config = TokenCleanupConfig::from_sweep_config(&sweep, StdDuration::from_secs(1)).unwrap();
    assert_eq!(config.schedule, SweepSchedule::Every(StdDuration::from_secs(900)));

    let bad = folio_shared::config::SweepConfig {
        enabled: true,
        schedule: "whenever".to_string(),
    };
    assert!(TokenCleanupConfig::from_sweep_config(&bad, StdDuration::from_secs(1)).is_err());
}
