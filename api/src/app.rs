//! Application factory
//!
//! Builds the actix-web [`App`] with the authentication gate in front of every
//! route. Request tracing is layered on by the caller.

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web, App, HttpResponse,
};

use folio_core::repositories::{TokenRepository, UserRepository};
use folio_core::services::auth::CredentialVerifier;
use folio_shared::errors::{error_codes, ErrorResponse};

use crate::handlers::error::json_error_handler;
use crate::middleware::auth::JwtAuth;
use crate::routes::auth::{login, logout, logout_all, me, refresh, AppState};
use crate::routes::health::health_check;

/// Create and configure the application with all dependencies
pub fn create_app<U, T, V>(
    app_state: web::Data<AppState<U, T, V>>,
    gate: JwtAuth,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    V: CredentialVerifier,
{
    App::new()
        .app_data(app_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .wrap(gate)
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/api/v1").service(
                web::scope("/auth")
                    .route("/login", web::post().to(login::<U, T, V>))
                    .route("/refresh", web::post().to(refresh::<U, T, V>))
                    .route("/logout", web::post().to(logout::<U, T, V>))
                    .route("/logout-all", web::post().to(logout_all::<U, T, V>))
                    .route("/me", web::get().to(me)),
            ),
        )
        .default_service(web::route().to(not_found))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
