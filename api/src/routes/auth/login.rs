use actix_web::{web, HttpResponse};
use chrono::Utc;
use validator::Validate;

use folio_core::repositories::{TokenRepository, UserRepository};
use folio_core::services::auth::CredentialVerifier;

use crate::dto::auth::{LoginRequest, TokenResponse};
use crate::handlers::error::ApiError;

use super::AppState;

/// Handler for POST /api/v1/auth/login
///
/// Authenticates with a login identifier and credential and returns a fresh
/// access/refresh pair. Any refresh token the user already held is superseded.
///
/// # Request Body
///
/// ```json
/// {
///     "identifier": "reader@folio.test",
///     "credential": "secret"
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "access_token": "eyJ...",
///     "refresh_token": "opaque-72-chars",
///     "token_type": "Bearer",
///     "expires_in": 900,
///     "expires_at": "2024-05-01T10:15:00Z"
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Missing identifier or credential
/// - 401 Unauthorized: Unknown identifier or wrong credential (not distinguished)
/// - 503 Service Unavailable: Token store timed out
pub async fn login<U, T, V>(
    state: web::Data<AppState<U, T, V>>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    V: CredentialVerifier,
{
    request.validate()?;

    let pair = state
        .auth_service
        .login(&request.identifier, &request.credential)
        .await?;

    Ok(HttpResponse::Ok().json(TokenResponse::from_pair(pair, Utc::now())))
}
