//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `auth` - Signing secret, token lifetimes and token-store deadline
//! - `database` - Database connection and pool configuration
//! - `environment` - Environment detection and logging configuration
//! - `server` - HTTP server configuration
//! - `sweep` - Expired refresh token sweep schedule

pub mod auth;
pub mod database;
pub mod environment;
pub mod server;
pub mod sweep;

use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

// Re-export commonly used types
pub use auth::{AuthConfig, JwtConfig};
pub use database::DatabaseConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use server::ServerConfig;
pub use sweep::SweepConfig;

/// Environment variable prefix for layered configuration (`FOLIO__AUTH__JWT__SECRET`)
pub const ENV_PREFIX: &str = "FOLIO";

/// Errors raised while assembling the application configuration
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("Failed to load configuration: {0}")]
    Source(#[from] config::ConfigError),
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// Active environment, resolved from `ENVIRONMENT`/`ENV`/`RUST_ENV`
    #[serde(default)]
    pub environment: Environment,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,

    /// Expired-token sweep configuration
    #[serde(default)]
    pub sweep: SweepConfig,

    /// Logging configuration; falls back to the environment's defaults
    #[serde(default)]
    pub logging: Option<LoggingConfig>,
}

impl AppConfig {
    /// Load configuration from files and the process environment.
    ///
    /// Sources, later ones winning:
    /// 1. built-in defaults
    /// 2. `config/default.toml` (optional)
    /// 3. `config/<environment>.toml` (optional)
    /// 4. `FOLIO__*` environment variables, plus the `JWT_SECRET` and
    ///    `DATABASE_URL` shorthands
    pub fn load() -> Result<Self, ConfigLoadError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let environment = Environment::from_env();

        let settings = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&environment.overlay_file()).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("auth.jwt.secret", env::var("JWT_SECRET").ok())?
            .set_override_option("database.url", env::var("DATABASE_URL").ok())?
            .build()?;

        let mut app_config: AppConfig = settings.try_deserialize()?;
        app_config.environment = environment;
        app_config.auth.jwt.secret_from_env = env::var("JWT_SECRET").is_ok()
            || env::var(format!("{}__AUTH__JWT__SECRET", ENV_PREFIX)).is_ok();

        Ok(app_config)
    }

    /// Effective logging configuration
    pub fn logging_config(&self) -> LoggingConfig {
        self.logging
            .clone()
            .unwrap_or_else(|| LoggingConfig::for_environment(self.environment))
    }

    pub fn is_development(&self) -> bool {
        self.environment.is_development()
    }

    pub fn is_production(&self) -> bool {
        self.environment.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.environment, Environment::Development);
        assert!(config.auth.jwt.secret.is_empty());
        assert_eq!(config.auth.store_timeout_ms, 5000);
        assert!(config.sweep.enabled);
        assert_eq!(config.sweep.schedule, "@daily");
    }

    #[test]
    fn test_logging_falls_back_to_environment() {
        let mut config = AppConfig::default();
        config.environment = Environment::Production;
        assert_eq!(config.logging_config().format, LogFormat::Json);

        config.logging = Some(LoggingConfig {
            level: "warn".to_string(),
            format: LogFormat::Compact,
        });
        assert_eq!(config.logging_config().level, "warn");
    }

    #[test]
    fn test_partial_document_uses_defaults() {
        let config: AppConfig = serde_json::from_str(
            r#"{ "auth": { "jwt": { "secret": "abc", "access_token_ttl_seconds": 60 } } }"#,
        )
        .unwrap();

        assert_eq!(config.auth.jwt.secret, "abc");
        assert_eq!(config.auth.jwt.access_token_ttl_seconds, 60);
        assert_eq!(config.auth.jwt.refresh_token_ttl_days, 7);
        assert!(!config.auth.jwt.secret_from_env);
        assert_eq!(config.server.port, 8080);
    }
}
