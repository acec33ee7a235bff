//! Mapping from domain errors to HTTP responses
//!
//! Every failing handler returns [`ApiError`]; actix renders it through
//! [`ResponseError`] as a JSON [`ErrorResponse`]. Credential and token
//! failures share generic messages so callers cannot tell which check failed.

use actix_web::{
    error::JsonPayloadError,
    http::{header, StatusCode},
    HttpRequest, HttpResponse, ResponseError,
};
use validator::ValidationErrors;

use folio_core::errors::{AuthError, DomainError, TokenError};
use folio_shared::errors::{error_codes, ErrorResponse};

/// Error returned by API handlers and extractors
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] DomainError);

impl ApiError {
    /// The wrapped domain error
    pub fn domain(&self) -> &DomainError {
        &self.0
    }

    fn to_error_response(&self) -> ErrorResponse {
        match &self.0 {
            DomainError::Auth(AuthError::InvalidCredentials) => ErrorResponse::new(
                error_codes::INVALID_CREDENTIALS,
                "Invalid login identifier or credential",
            ),
            DomainError::Token(TokenError::InvalidToken) => {
                ErrorResponse::new(error_codes::INVALID_TOKEN, "Invalid access token")
            }
            DomainError::Token(TokenError::InvalidRefreshToken { token }) => ErrorResponse::new(
                error_codes::INVALID_REFRESH_TOKEN,
                "Invalid refresh token",
            )
            .add_detail("refresh_token", token),
            DomainError::Token(TokenError::ExpiredRefreshToken { expired_at, .. }) => {
                ErrorResponse::new(
                    error_codes::REFRESH_TOKEN_EXPIRED,
                    "Refresh token has expired, please log in again",
                )
                .add_detail("expired_at", expired_at.to_rfc3339())
            }
            DomainError::Validation { message } => {
                ErrorResponse::new(error_codes::VALIDATION_ERROR, message.clone())
            }
            DomainError::NotFound { resource } => ErrorResponse::new(
                error_codes::NOT_FOUND,
                format!("Resource not found: {}", resource),
            ),
            DomainError::Unauthorized => {
                ErrorResponse::new(error_codes::UNAUTHORIZED, "Authentication required")
            }
            DomainError::Forbidden { authority } => ErrorResponse::new(
                error_codes::FORBIDDEN,
                "Insufficient permissions",
            )
            .add_detail("required_authority", authority),
            DomainError::Timeout { .. } => ErrorResponse::new(
                error_codes::SERVICE_UNAVAILABLE,
                "Service temporarily unavailable, please retry",
            ),
            DomainError::Token(TokenError::TokenGenerationFailed)
            | DomainError::Configuration { .. }
            | DomainError::Internal { .. } => {
                ErrorResponse::new(error_codes::INTERNAL_ERROR, "An internal error occurred")
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        ApiError(error.into())
    }
}

impl From<TokenError> for ApiError {
    fn from(error: TokenError) -> Self {
        ApiError(error.into())
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<&str> = errors.field_errors().keys().copied().collect();
        fields.sort_unstable();

        ApiError(DomainError::Validation {
            message: format!("Invalid request fields: {}", fields.join(", ")),
        })
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match &self.0 {
            DomainError::Auth(_) => StatusCode::UNAUTHORIZED,
            DomainError::Token(TokenError::TokenGenerationFailed) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            DomainError::Token(_) => StatusCode::UNAUTHORIZED,
            DomainError::Validation { .. } => StatusCode::BAD_REQUEST,
            DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
            DomainError::Unauthorized => StatusCode::UNAUTHORIZED,
            DomainError::Forbidden { .. } => StatusCode::FORBIDDEN,
            DomainError::Timeout { .. } => StatusCode::SERVICE_UNAVAILABLE,
            DomainError::Configuration { .. } | DomainError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self.0, status = status.as_u16(), "Request failed");
        } else {
            tracing::debug!(error = %self.0, status = status.as_u16(), "Request rejected");
        }

        let mut builder = HttpResponse::build(status);
        if status == StatusCode::UNAUTHORIZED {
            builder.insert_header((header::WWW_AUTHENTICATE, "Bearer"));
        }

        builder.json(self.to_error_response())
    }
}

/// Renders malformed JSON bodies as a 400 [`ErrorResponse`]
pub fn json_error_handler(error: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError(DomainError::Validation {
        message: format!("Malformed request body: {}", error),
    })
    .into()
}
