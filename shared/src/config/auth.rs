//! Authentication and token lifecycle configuration

use serde::{Deserialize, Serialize};

/// JWT access token and refresh token configuration
#[derive(Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Symmetric signing secret. There is no default; startup fails when unset.
    #[serde(default, skip_serializing)]
    pub secret: String,

    /// Set by the loader when the secret came from the process environment
    /// rather than a configuration file.
    #[serde(skip)]
    pub secret_from_env: bool,

    /// Access token time-to-live in seconds
    #[serde(default = "default_access_token_ttl_seconds")]
    pub access_token_ttl_seconds: i64,

    /// Refresh token time-to-live in days
    #[serde(default = "default_refresh_token_ttl_days")]
    pub refresh_token_ttl_days: i64,

    /// Clock skew tolerance applied to access token expiry, in seconds
    #[serde(default)]
    pub leeway_seconds: u64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            secret_from_env: false,
            access_token_ttl_seconds: default_access_token_ttl_seconds(),
            refresh_token_ttl_days: default_refresh_token_ttl_days(),
            leeway_seconds: 0,
        }
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[REDACTED]")
            .field("secret_from_env", &self.secret_from_env)
            .field("access_token_ttl_seconds", &self.access_token_ttl_seconds)
            .field("refresh_token_ttl_days", &self.refresh_token_ttl_days)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish()
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Set access token TTL in seconds
    pub fn with_access_ttl_seconds(mut self, seconds: i64) -> Self {
        self.access_token_ttl_seconds = seconds;
        self
    }

    /// Set refresh token TTL in days
    pub fn with_refresh_ttl_days(mut self, days: i64) -> Self {
        self.refresh_token_ttl_days = days;
        self
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT configuration
    #[serde(default)]
    pub jwt: JwtConfig,

    /// Deadline for a single token-store call, in milliseconds
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt: JwtConfig::default(),
            store_timeout_ms: default_store_timeout_ms(),
        }
    }
}

fn default_access_token_ttl_seconds() -> i64 {
    900 // 15 minutes
}

fn default_refresh_token_ttl_days() -> i64 {
    7
}

fn default_store_timeout_ms() -> u64 {
    5000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_config_default_has_no_secret() {
        let config = JwtConfig::default();
        assert!(config.secret.is_empty());
        assert_eq!(config.access_token_ttl_seconds, 900);
        assert_eq!(config.refresh_token_ttl_days, 7);
        assert_eq!(config.leeway_seconds, 0);
    }

    #[test]
    fn test_jwt_config_builder() {
        let config = JwtConfig::new("my-secret")
            .with_access_ttl_seconds(1800)
            .with_refresh_ttl_days(14);

        assert_eq!(config.secret, "my-secret");
        assert_eq!(config.access_token_ttl_seconds, 1800);
        assert_eq!(config.refresh_token_ttl_days, 14);
    }

    #[test]
    fn test_secret_is_redacted_and_not_serialized() {
        let config = JwtConfig::new("super-secret-value");

        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret-value"));
        assert!(debug.contains("REDACTED"));

        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("super-secret-value"));
    }
}
