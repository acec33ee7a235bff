//! Expired refresh token sweeper
//!
//! Bulk-deletes refresh tokens past their expiry on a schedule, independent
//! of whether they are ever presented again. A failed sweep is logged and
//! retried at the next scheduled run.

use chrono::Utc;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration as StdDuration;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use folio_shared::config::SweepConfig;

use crate::errors::DomainError;
use crate::repositories::TokenRepository;

use super::refresh::with_deadline;
use super::schedule::SweepSchedule;

/// Configuration for the sweeper
#[derive(Debug, Clone)]
pub struct TokenCleanupConfig {
    /// When to run
    pub schedule: SweepSchedule,
    /// Deadline for the bulk delete
    pub store_timeout: StdDuration,
    /// Whether the background task runs at all
    pub enabled: bool,
}

impl Default for TokenCleanupConfig {
    fn default() -> Self {
        Self {
            schedule: SweepSchedule::default(),
            store_timeout: StdDuration::from_millis(5000),
            enabled: true,
        }
    }
}

impl TokenCleanupConfig {
    /// Build from the loaded sweep settings; an unparseable schedule is a configuration error
    pub fn from_sweep_config(
        sweep: &SweepConfig,
        store_timeout: StdDuration,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            schedule: sweep.schedule.parse()?,
            store_timeout,
            enabled: sweep.enabled,
        })
    }
}

/// Service for deleting expired refresh tokens
pub struct TokenCleanupService<R: TokenRepository + 'static> {
    repository: Arc<R>,
    config: TokenCleanupConfig,
}

impl<R: TokenRepository> TokenCleanupService<R> {
    pub fn new(repository: Arc<R>, config: TokenCleanupConfig) -> Self {
        Self { repository, config }
    }

    pub fn config(&self) -> &TokenCleanupConfig {
        &self.config
    }

    /// Run a single sweep
    ///
    /// Issues one bulk delete of rows whose expiry is strictly before now.
    /// Never fails: store errors and timeouts are logged and reported in the
    /// returned [`CleanupResult`].
    pub async fn run_cleanup(&self) -> CleanupResult {
        let now = Utc::now();

        match with_deadline(
            self.config.store_timeout,
            "delete_expired",
            self.repository.delete_expired(now),
        )
        .await
        {
            Ok(deleted) => {
                info!(deleted, "Expired refresh token sweep completed");
                CleanupResult {
                    expired_tokens_deleted: deleted,
                    error: None,
                }
            }
            Err(e) => {
                error!(error = %e, "Expired refresh token sweep failed");
                CleanupResult {
                    expired_tokens_deleted: 0,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Start the sweeper as a background task
    ///
    /// The task sleeps until each scheduled time, sweeps, and exits as soon
    /// as `shutdown` resolves. Returns `None` when the sweeper is disabled.
    pub fn start_background_task<F>(self: Arc<Self>, shutdown: F) -> Option<JoinHandle<()>>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if !self.config.enabled {
            warn!("Expired refresh token sweep is disabled");
            return None;
        }

        Some(tokio::spawn(async move {
            info!(schedule = %self.config.schedule, "Expired refresh token sweep scheduled");

            tokio::pin!(shutdown);

            loop {
                let delay = self.config.schedule.next_delay(Utc::now());

                tokio::select! {
                    _ = &mut shutdown => {
                        info!("Expired refresh token sweep stopped");
                        break;
                    }
                    _ = tokio::time::sleep(delay) => {
                        self.run_cleanup().await;
                    }
                }
            }
        }))
    }
}

/// Result of a sweep
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanupResult {
    /// Number of expired refresh tokens deleted
    pub expired_tokens_deleted: usize,
    /// Store error that aborted the sweep, if any
    pub error: Option<String>,
}

impl CleanupResult {
    /// Check if the sweep reached the store and finished
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}
