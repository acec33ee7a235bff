//! Deployment environment and logging settings
//!
//! The environment decides which overlay file is read on top of
//! `config/default.toml` and how strictly the JWT signing secret is checked
//! at startup.

use serde::{Deserialize, Serialize};
use std::env;

/// Variables consulted, in order, for the deployment environment
const ENVIRONMENT_VARS: [&str; 2] = ["FOLIO_ENV", "ENVIRONMENT"];

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local runs; development signing secrets are accepted
    #[default]
    Development,
    /// Shared test deployments; development signing secrets are refused
    Staging,
    /// Live deployment; the signing secret must also come from the process
    /// environment and must not be a published default
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }

    /// Whether secrets marked as development-only may sign tokens
    pub fn allows_dev_secrets(&self) -> bool {
        self.is_development()
    }

    /// Whether the signing secret must be supplied outside configuration files
    pub fn requires_external_secret(&self) -> bool {
        self.is_production()
    }

    /// Reads `FOLIO_ENV`, then `ENVIRONMENT`; unset or unknown means development
    pub fn from_env() -> Self {
        ENVIRONMENT_VARS
            .iter()
            .find_map(|name| env::var(name).ok())
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    /// Overlay file read after `config/default`, without extension
    pub fn overlay_file(&self) -> String {
        format!("config/{}", self)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" | "local" => Ok(Environment::Development),
            "staging" | "stage" | "test" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(format!("Unknown environment '{}'", s)),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    /// Human-readable debug output locally, JSON at info everywhere else
    pub fn for_environment(env: Environment) -> Self {
        if env.is_development() {
            Self {
                level: String::from("debug"),
                format: LogFormat::Pretty,
            }
        } else {
            Self {
                level: String::from("info"),
                format: LogFormat::Json,
            }
        }
    }
}

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
    Compact,
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}
