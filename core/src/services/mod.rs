//! Business services containing the token lifecycle use cases.

pub mod auth;
pub mod token;

// Re-export commonly used types
pub use auth::{AuthService, BcryptCredentialVerifier, CredentialVerifier};
pub use token::{
    AccessTokenCodec, CleanupResult, RefreshTokenManager, SigningKey, SweepSchedule,
    TokenCleanupConfig, TokenCleanupService, TokenServiceConfig,
};
