//! Symmetric signing key for access tokens
//!
//! The secret is checked once at startup. Every failure here is a
//! configuration error and must stop the process.

use folio_shared::config::{Environment, JwtConfig};
use jsonwebtoken::{DecodingKey, EncodingKey};

use crate::errors::DomainError;

/// Minimum secret length in bytes (HS256 key size)
pub const MIN_SECRET_BYTES: usize = 32;

/// Well-known default secrets that must never sign production tokens
const PLACEHOLDER_SECRETS: &[&str] = &[
    "secret",
    "changeme",
    "change-me",
    "password",
    "jwt-secret",
    "jwt_secret",
    "your-secret-key",
    "your-256-bit-secret",
    "your_jwt_secret_key_here",
    "development-secret-please-change-in-production",
];

/// Fragments that mark a placeholder when they appear anywhere in the secret
const PLACEHOLDER_MARKERS: &[&str] = &["changeme", "change-me", "change_me", "your-secret", "placeholder"];

/// Fragments that mark a development-only secret
const DEV_SENTINEL_MARKERS: &[&str] = &["not-for-production", "insecure", "dev-only"];

/// Holder of the HMAC signing secret
#[derive(Clone)]
pub struct SigningKey {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

// Never print key material.
impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey").finish_non_exhaustive()
    }
}

impl SigningKey {
    /// Creates a signing key after the environment-independent checks
    ///
    /// # Arguments
    ///
    /// * `secret` - The shared HMAC secret
    ///
    /// # Returns
    ///
    /// * `Ok(SigningKey)` - Secret is non-blank and at least [`MIN_SECRET_BYTES`] long
    /// * `Err(DomainError::Configuration)` - Otherwise
    pub fn new(secret: &str) -> Result<Self, DomainError> {
        if secret.trim().is_empty() {
            return Err(DomainError::configuration("JWT secret must not be empty"));
        }

        if secret.len() < MIN_SECRET_BYTES {
            return Err(DomainError::configuration(format!(
                "JWT secret must be at least {} bytes, got {}",
                MIN_SECRET_BYTES,
                secret.len()
            )));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        })
    }

    /// Creates a signing key after checking the secret against the active environment
    ///
    /// # Arguments
    ///
    /// * `secret` - The shared HMAC secret
    /// * `environment` - Active runtime environment
    /// * `externally_supplied` - Whether the secret came from the process
    ///   environment rather than a configuration file
    ///
    /// Outside development, development sentinels are rejected. In
    /// production, placeholder values are rejected and the secret must be
    /// externally supplied.
    pub fn for_environment(
        secret: &str,
        environment: Environment,
        externally_supplied: bool,
    ) -> Result<Self, DomainError> {
        if secret.trim().is_empty() {
            return Err(DomainError::configuration("JWT secret must not be empty"));
        }

        if !environment.allows_dev_secrets() && is_dev_sentinel(secret) {
            return Err(DomainError::configuration(format!(
                "JWT secret is a development-only value and cannot be used in {}",
                environment
            )));
        }

        if environment.requires_external_secret() {
            if is_placeholder(secret) {
                return Err(DomainError::configuration(
                    "JWT secret is a known default value; set a unique secret for production",
                ));
            }

            if !externally_supplied {
                return Err(DomainError::configuration(
                    "JWT secret must be supplied through the environment (JWT_SECRET) in production",
                ));
            }
        }

        Self::new(secret)
    }

    /// Creates a signing key from the loaded JWT configuration
    pub fn from_config(config: &JwtConfig, environment: Environment) -> Result<Self, DomainError> {
        Self::for_environment(&config.secret, environment, config.secret_from_env)
    }

    pub(crate) fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }
}

fn is_placeholder(secret: &str) -> bool {
    let lowered = secret.trim().to_ascii_lowercase();
    PLACEHOLDER_SECRETS.contains(&lowered.as_str())
        || PLACEHOLDER_MARKERS.iter().any(|m| lowered.contains(m))
}

fn is_dev_sentinel(secret: &str) -> bool {
    let lowered = secret.trim().to_ascii_lowercase();
    lowered.starts_with("dev-") || DEV_SENTINEL_MARKERS.iter().any(|m| lowered.contains(m))
}
