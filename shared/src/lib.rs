//! Shared configuration and common types for the Folio server
//!
//! This crate provides functionality used across all server modules:
//! - Layered configuration (files, environment variables)
//! - Environment detection
//! - The wire-level error response structure

pub mod config;
pub mod errors;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, ConfigLoadError, DatabaseConfig, Environment, JwtConfig, LogFormat,
    LoggingConfig, ServerConfig, SweepConfig,
};
pub use errors::{error_codes, ErrorResponse};
