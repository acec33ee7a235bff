//! Credential verification collaborator

use crate::errors::{DomainError, DomainResult};
use crate::services::token::generate_token_value;

/// Checks a presented credential against a stored hash
///
/// Implementations are CPU-bound; callers run them off the async executor.
pub trait CredentialVerifier: Send + Sync + 'static {
    /// Returns `true` if `credential` matches `hash`. Malformed hashes never match.
    fn verify(&self, credential: &str, hash: &str) -> bool;

    /// A valid hash of an unguessable credential, checked when the
    /// identifier is unknown so both failure paths cost the same
    fn dummy_hash(&self) -> &str;
}

/// bcrypt-backed verifier
#[derive(Clone)]
pub struct BcryptCredentialVerifier {
    dummy_hash: String,
}

impl BcryptCredentialVerifier {
    /// Creates a verifier whose dummy hash uses bcrypt's default cost
    pub fn new() -> DomainResult<Self> {
        Self::with_cost(bcrypt::DEFAULT_COST)
    }

    /// Creates a verifier whose dummy hash uses `cost`; match it to the cost of stored hashes
    pub fn with_cost(cost: u32) -> DomainResult<Self> {
        let dummy_hash = bcrypt::hash(generate_token_value(), cost)
            .map_err(|e| DomainError::internal(format!("Failed to prepare dummy hash: {}", e)))?;

        Ok(Self { dummy_hash })
    }
}

impl std::fmt::Debug for BcryptCredentialVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BcryptCredentialVerifier").finish_non_exhaustive()
    }
}

impl CredentialVerifier for BcryptCredentialVerifier {
    fn verify(&self, credential: &str, hash: &str) -> bool {
        bcrypt::verify(credential, hash).unwrap_or(false)
    }

    fn dummy_hash(&self) -> &str {
        &self.dummy_hash
    }
}
