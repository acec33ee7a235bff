//! Shared setup for the HTTP tests: in-memory stores behind the real app

#![allow(dead_code)]

use actix_web::web;
use std::sync::Arc;

use folio_api::middleware::auth::JwtAuth;
use folio_api::routes::auth::AppState;
use folio_core::domain::entities::user::{User, ROLE_USER};
use folio_core::repositories::{MockTokenRepository, MockUserRepository, UserRepository};
use folio_core::services::auth::{AuthService, BcryptCredentialVerifier};
use folio_core::services::token::{
    AccessTokenCodec, RefreshTokenManager, SigningKey, TokenServiceConfig,
};

pub const EMAIL: &str = "reader@folio.test";
pub const PASSWORD: &str = "correct horse battery staple";
const SECRET: &str = "api-test-signing-secret-0123456789abcdef";

pub struct TestContext {
    pub state: web::Data<AppState<MockUserRepository, MockTokenRepository>>,
    pub gate: JwtAuth,
    pub codec: Arc<AccessTokenCodec>,
    pub users: Arc<MockUserRepository>,
    pub tokens: Arc<MockTokenRepository>,
    pub user: User,
}

pub async fn setup() -> TestContext {
    let config = TokenServiceConfig::default();
    let users = Arc::new(MockUserRepository::new());
    let tokens = Arc::new(MockTokenRepository::new());

    let codec = Arc::new(AccessTokenCodec::from_config(
        SigningKey::new(SECRET).unwrap(),
        &config,
    ));
    let refresh_tokens = Arc::new(RefreshTokenManager::new(Arc::clone(&tokens), &config));
    let verifier = Arc::new(BcryptCredentialVerifier::with_cost(4).unwrap());

    let user = users
        .insert(
            User::new(EMAIL, bcrypt::hash(PASSWORD, 4).unwrap()).with_authorities([ROLE_USER]),
        )
        .await
        .unwrap();

    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&users),
        Arc::clone(&codec),
        refresh_tokens,
        verifier,
    ));

    let principals: Arc<dyn UserRepository> = users.clone();

    TestContext {
        state: web::Data::new(AppState::new(auth_service)),
        gate: JwtAuth::new(Arc::clone(&codec), principals),
        codec,
        users,
        tokens,
        user,
    }
}

pub fn login_body() -> serde_json::Value {
    serde_json::json!({ "identifier": EMAIL, "credential": PASSWORD })
}
