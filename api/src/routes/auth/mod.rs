//! Authentication route handlers
//!
//! - Login with identifier and credential
//! - Refresh with rotation
//! - Logout of one session or of every session
//! - Identity of the current caller

pub mod login;
pub mod logout;
pub mod me;
pub mod refresh;

use std::sync::Arc;

use folio_core::repositories::{TokenRepository, UserRepository};
use folio_core::services::auth::{AuthService, BcryptCredentialVerifier, CredentialVerifier};

pub use login::login;
pub use logout::{logout, logout_all};
pub use me::me;
pub use refresh::refresh;

/// Application state shared by the auth handlers
pub struct AppState<U, T, V = BcryptCredentialVerifier>
where
    U: UserRepository,
    T: TokenRepository,
    V: CredentialVerifier,
{
    pub auth_service: Arc<AuthService<U, T, V>>,
}

impl<U, T, V> AppState<U, T, V>
where
    U: UserRepository,
    T: TokenRepository,
    V: CredentialVerifier,
{
    pub fn new(auth_service: Arc<AuthService<U, T, V>>) -> Self {
        Self { auth_service }
    }
}
