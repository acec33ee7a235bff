//! MySQL repository implementations

mod token_repository_impl;
mod user_repository_impl;

pub use token_repository_impl::MySqlTokenRepository;
pub use user_repository_impl::MySqlUserRepository;

use folio_core::errors::DomainError;

/// Map a storage error into the domain taxonomy, tagged with the failed step
pub(crate) fn db_error(context: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e| {
        tracing::error!(error = %e, context, "Database operation failed");
        DomainError::Internal {
            message: format!("{}: {}", context, e),
        }
    }
}
