//! # Infrastructure Layer
//!
//! MySQL persistence for the Folio token lifecycle, built on SQLx:
//! - Connection pool management and migrations
//! - The refresh token store
//! - The read-only principal store

pub mod database;

pub use database::{DatabasePool, MySqlTokenRepository, MySqlUserRepository};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
