//! Authentication service module
//!
//! This module provides:
//! - Credential verification against the principal store
//! - Login, refresh with rotation, and logout

mod credentials;
mod service;


pub use credentials::{BcryptCredentialVerifier, CredentialVerifier};
pub use service::AuthService;
