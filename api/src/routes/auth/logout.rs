use actix_web::{web, HttpResponse};
use validator::Validate;

use folio_core::repositories::{TokenRepository, UserRepository};
use folio_core::services::auth::CredentialVerifier;

use crate::dto::auth::{LogoutAllResponse, LogoutRequest};
use crate::handlers::error::ApiError;
use crate::middleware::auth::AuthContext;

use super::AppState;

/// Handler for POST /api/v1/auth/logout
///
/// Deletes the presented refresh token. Unknown values are accepted, so the
/// response is always 204 unless the store fails.
pub async fn logout<U, T, V>(
    state: web::Data<AppState<U, T, V>>,
    request: web::Json<LogoutRequest>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    V: CredentialVerifier,
{
    request.validate()?;

    state.auth_service.logout(&request.refresh_token).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Handler for POST /api/v1/auth/logout-all
///
/// Requires a valid bearer token; deletes every refresh token of the caller.
///
/// ## Success (200 OK)
/// ```json
/// {
///     "revoked": 1
/// }
/// ```
pub async fn logout_all<U, T, V>(
    state: web::Data<AppState<U, T, V>>,
    auth: AuthContext,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    V: CredentialVerifier,
{
    let revoked = state.auth_service.logout_all(auth.user_id).await?;

    Ok(HttpResponse::Ok().json(LogoutAllResponse { revoked }))
}
