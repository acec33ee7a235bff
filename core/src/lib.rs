//! # Folio Core
//!
//! Token lifecycle domain for the Folio backend.
//! This crate contains the principal and refresh token entities, the access
//! token codec, the refresh token manager, the expired-token sweeper, the
//! authentication service, repository interfaces and error types.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::{Claims, RefreshToken, TokenPair, User};
pub use errors::{AuthError, DomainError, DomainResult, TokenError};
pub use repositories::{MockTokenRepository, MockUserRepository, TokenRepository, UserRepository};
pub use services::{
    AccessTokenCodec, AuthService, BcryptCredentialVerifier, CleanupResult, CredentialVerifier,
    RefreshTokenManager, SigningKey, SweepSchedule, TokenCleanupConfig, TokenCleanupService,
    TokenServiceConfig,
};
