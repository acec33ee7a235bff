//! Authentication service: login, refresh with rotation, and logout

use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::entities::token::{token_prefix, TokenPair};
use crate::domain::entities::user::User;
use crate::errors::{AuthError, DomainError, DomainResult, TokenError};
use crate::repositories::{TokenRepository, UserRepository};
use crate::services::token::{with_deadline, AccessTokenCodec, RefreshTokenManager};

use super::credentials::{BcryptCredentialVerifier, CredentialVerifier};

/// Orchestrates token issuance on top of the codec and the refresh token manager
pub struct AuthService<U, T, V = BcryptCredentialVerifier>
where
    U: UserRepository,
    T: TokenRepository,
    V: CredentialVerifier,
{
    /// Principal store
    user_repository: Arc<U>,
    /// Access token codec
    codec: Arc<AccessTokenCodec>,
    /// Refresh token manager
    refresh_tokens: Arc<RefreshTokenManager<T>>,
    /// Credential checker
    credential_verifier: Arc<V>,
}

impl<U, T, V> AuthService<U, T, V>
where
    U: UserRepository,
    T: TokenRepository,
    V: CredentialVerifier,
{
    /// Create a new authentication service
    ///
    /// # Arguments
    ///
    /// * `user_repository` - Principal store
    /// * `codec` - Access token codec
    /// * `refresh_tokens` - Refresh token manager
    /// * `credential_verifier` - Credential checker
    pub fn new(
        user_repository: Arc<U>,
        codec: Arc<AccessTokenCodec>,
        refresh_tokens: Arc<RefreshTokenManager<T>>,
        credential_verifier: Arc<V>,
    ) -> Self {
        Self {
            user_repository,
            codec,
            refresh_tokens,
            credential_verifier,
        }
    }

    pub fn codec(&self) -> &Arc<AccessTokenCodec> {
        &self.codec
    }

    pub fn user_repository(&self) -> &Arc<U> {
        &self.user_repository
    }

    pub fn refresh_tokens(&self) -> &Arc<RefreshTokenManager<T>> {
        &self.refresh_tokens
    }

    /// Authenticate with login identifier and credential and issue a token pair
    ///
    /// Unknown identifiers are checked against a dummy hash, and both failure
    /// paths return the same [`AuthError::InvalidCredentials`].
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - Fresh access token and refresh token
    /// * `Err(DomainError)` - Invalid credentials, or store failure
    pub async fn login(&self, identifier: &str, credential: &str) -> DomainResult<TokenPair> {
        let identifier = identifier.trim();
        let user = with_deadline(
            self.refresh_tokens.store_timeout(),
            "find_user_by_email",
            self.user_repository.find_by_email(identifier),
        )
        .await?;

        let hash = match &user {
            Some(user) => user.password_hash.clone(),
            None => self.credential_verifier.dummy_hash().to_string(),
        };

        let matches = self.check_credential(credential.to_string(), hash).await?;

        let user = match (user, matches) {
            (Some(user), true) => user,
            _ => {
                warn!("Login rejected: invalid credentials");
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        let pair = self.issue_pair(&user).await?;
        info!(user_id = %user.id, "User logged in");

        Ok(pair)
    }

    /// Exchange a refresh token for a new pair, consuming the presented token
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - New access token and a rotated refresh token
    /// * `Err(TokenError::InvalidRefreshToken)` - Unknown or already-rotated token
    /// * `Err(TokenError::ExpiredRefreshToken)` - Token expired; it has been deleted
    pub async fn refresh(&self, refresh_token: &str) -> DomainResult<TokenPair> {
        let row = self.refresh_tokens.validate(refresh_token).await?;

        let owner = with_deadline(
            self.refresh_tokens.store_timeout(),
            "find_user_by_id",
            self.user_repository.find_by_id(row.user_id),
        )
        .await?;

        let user = match owner {
            Some(user) => user,
            None => {
                warn!(user_id = %row.user_id, "Refresh token owner no longer exists");
                self.refresh_tokens.revoke(&row.token).await?;
                return Err(TokenError::InvalidRefreshToken {
                    token: refresh_token.to_string(),
                }
                .into());
            }
        };

        // A concurrent exchange of the same value loses here, before minting anything.
        let successor = self.refresh_tokens.rotate(&row).await?;
        let access_token = self.codec.issue(&user)?;
        let expires_at = self.codec.expiry_of(&access_token)?;
        info!(user_id = %user.id, previous = row.log_prefix(), "Refresh token rotated");

        Ok(TokenPair::new(access_token, successor.token, expires_at))
    }

    /// Invalidate a refresh token; unknown values are not an error
    pub async fn logout(&self, refresh_token: &str) -> DomainResult<()> {
        let deleted = self.refresh_tokens.revoke(refresh_token).await?;
        info!(token = token_prefix(refresh_token), deleted, "User logged out");
        Ok(())
    }

    /// Invalidate every refresh token held by `user_id`
    pub async fn logout_all(&self, user_id: Uuid) -> DomainResult<usize> {
        self.refresh_tokens.revoke_all_for_user(user_id).await
    }

    async fn issue_pair(&self, user: &User) -> DomainResult<TokenPair> {
        let access_token = self.codec.issue(user)?;
        let refresh = self.refresh_tokens.create(user).await?;
        let expires_at = self.codec.expiry_of(&access_token)?;

        Ok(TokenPair::new(access_token, refresh.token, expires_at))
    }

    // bcrypt is deliberately slow; keep it off the async workers.
    async fn check_credential(&self, credential: String, hash: String) -> DomainResult<bool> {
        let verifier = Arc::clone(&self.credential_verifier);

        tokio::task::spawn_blocking(move || verifier.verify(&credential, &hash))
            .await
            .map_err(|e| DomainError::internal(format!("Credential check aborted: {}", e)))
    }
}
