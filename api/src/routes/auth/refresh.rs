use actix_web::{web, HttpResponse};
use chrono::Utc;
use validator::Validate;

use folio_core::repositories::{TokenRepository, UserRepository};
use folio_core::services::auth::CredentialVerifier;

use crate::dto::auth::{RefreshTokenRequest, TokenResponse};
use crate::handlers::error::ApiError;

use super::AppState;

/// Handler for POST /api/v1/auth/refresh
///
/// Exchanges a refresh token for a new pair. The presented token is consumed:
/// a second exchange of the same value fails as invalid.
///
/// # Request Body
///
/// ```json
/// {
///     "refresh_token": "string"
/// }
/// ```
///
/// ## Errors
/// - 401 `invalid_refresh_token`: Unknown or already-used token
/// - 401 `refresh_token_expired`: Token expired; details carry `expired_at`
/// - 503 Service Unavailable: Token store timed out
pub async fn refresh<U, T, V>(
    state: web::Data<AppState<U, T, V>>,
    request: web::Json<RefreshTokenRequest>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    V: CredentialVerifier,
{
    request.validate()?;

    let pair = state.auth_service.refresh(&request.refresh_token).await?;

    Ok(HttpResponse::Ok().json(TokenResponse::from_pair(pair, Utc::now())))
}
