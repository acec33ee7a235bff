use actix_web::{web, HttpServer};
use anyhow::Context;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{error, info};
use tracing_actix_web::TracingLogger;

use folio_api::app::create_app;
use folio_api::middleware::auth::JwtAuth;
use folio_api::routes::auth::AppState;
use folio_api::telemetry::init_tracing;
use folio_core::repositories::UserRepository;
use folio_core::services::auth::{AuthService, BcryptCredentialVerifier};
use folio_core::services::token::{
    AccessTokenCodec, RefreshTokenManager, SigningKey, TokenCleanupConfig, TokenCleanupService,
    TokenServiceConfig,
};
use folio_infra::{DatabasePool, MySqlTokenRepository, MySqlUserRepository};
use folio_shared::config::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.logging_config())?;

    info!(environment = %config.environment, "Starting Folio API server");

    // A bad signing secret halts startup.
    let signing_key = SigningKey::from_config(&config.auth.jwt, config.environment)
        .context("Invalid signing key configuration")?;
    let token_config = TokenServiceConfig::from_auth_config(&config.auth)
        .context("Invalid token lifetime configuration")?;
    let cleanup_config =
        TokenCleanupConfig::from_sweep_config(&config.sweep, token_config.store_timeout)
            .context("Invalid sweep configuration")?;

    let pool = DatabasePool::new(&config.database)
        .await
        .context("Failed to connect to database")?;
    if config.database.run_migrations {
        pool.run_migrations().await.context("Failed to run migrations")?;
    }
    info!("{}", pool.get_statistics());

    let user_repository = Arc::new(MySqlUserRepository::new(pool.get_pool().clone()));
    let token_repository = Arc::new(MySqlTokenRepository::new(pool.get_pool().clone()));

    let codec = Arc::new(AccessTokenCodec::from_config(signing_key, &token_config));
    let refresh_tokens = Arc::new(RefreshTokenManager::new(
        Arc::clone(&token_repository),
        &token_config,
    ));
    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&user_repository),
        Arc::clone(&codec),
        refresh_tokens,
        Arc::new(BcryptCredentialVerifier::new().context("Failed to prepare credential verifier")?),
    ));
    let app_state = web::Data::new(AppState::new(auth_service));

    let principals: Arc<dyn UserRepository> = user_repository;
    let gate = JwtAuth::new(codec, principals).with_lookup_timeout(token_config.store_timeout);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let sweeper = Arc::new(TokenCleanupService::new(token_repository, cleanup_config));
    let sweeper_handle = sweeper.start_background_task(async move {
        let _ = shutdown_rx.await;
    });

    let bind_address = config.server.bind_address();
    info!(address = %bind_address, "Server will bind");

    let mut server = HttpServer::new(move || {
        create_app(app_state.clone(), gate.clone()).wrap(TracingLogger::default())
    });
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    let result = server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await;

    info!("Server stopped, shutting down background tasks");
    let _ = shutdown_tx.send(());
    if let Some(handle) = sweeper_handle {
        if let Err(e) = handle.await {
            error!(error = %e, "Sweep task ended abnormally");
        }
    }
    pool.close().await;

    result.context("Server error")
}
