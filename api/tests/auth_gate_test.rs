//! Integration tests for the bearer authentication gate

mod common;

use actix_web::{http::StatusCode, test, web, App, HttpResponse};
use chrono::{Duration, Utc};
use serde_json::Value;

use folio_api::app::create_app;
use folio_api::handlers::error::ApiError;
use folio_api::middleware::auth::{AuthContext, OptionalAuth};
use folio_core::domain::entities::user::{User, ROLE_ADMIN};

use common::{setup, EMAIL};

async fn admin_only(auth: AuthContext) -> Result<HttpResponse, ApiError> {
    auth.require_authority(ROLE_ADMIN)?;
    Ok(HttpResponse::Ok().finish())
}

async fn whoami(auth: OptionalAuth) -> HttpResponse {
    match auth.0 {
        Some(context) => HttpResponse::Ok().body(context.email),
        None => HttpResponse::Ok().body("anonymous"),
    }
}

#[actix_web::test]
async fn test_me_requires_valid_bearer_token() {
    let ctx = setup().await;
    let app = test::init_service(create_app(ctx.state.clone(), ctx.gate.clone())).await;

    let req = test::TestRequest::get().uri("/api/v1/auth/me").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().contains_key("www-authenticate"));

    let access = ctx.codec.issue(&ctx.user).unwrap();
    let req = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header(("Authorization", format!("Bearer {}", access)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["email"], EMAIL);
    assert_eq!(body["user_id"], ctx.user.id.to_string());
    assert_eq!(body["authorities"][0], "ROLE_USER");
}

#[actix_web::test]
async fn test_tampered_and_expired_tokens_leave_request_unauthenticated() {
    let ctx = setup().await;
    let app = test::init_service(create_app(ctx.state.clone(), ctx.gate.clone())).await;

    let access = ctx.codec.issue(&ctx.user).unwrap();
    let mut tampered = access.clone().into_bytes();
    let last = tampered.len() - 10;
    tampered[last] = if tampered[last] == b'A' { b'B' } else { b'A' };
    let tampered = String::from_utf8(tampered).unwrap();

    let expired = ctx
        .codec
        .issue_at(&ctx.user, Utc::now() - Duration::hours(2))
        .unwrap();

    for token in [tampered, expired, "not.a.jwt".to_string()] {
        let req = test::TestRequest::get()
            .uri("/api/v1/auth/me")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}

#[actix_web::test]
async fn test_gate_never_rejects_public_routes() {
    let ctx = setup().await;
    let app = test::init_service(create_app(ctx.state.clone(), ctx.gate.clone())).await;

    let req = test::TestRequest::get()
        .uri("/health")
        .insert_header(("Authorization", "Bearer garbage"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_token_of_deleted_user_is_not_authenticated() {
    let ctx = setup().await;
    let app = test::init_service(create_app(ctx.state.clone(), ctx.gate.clone())).await;

    let access = ctx.codec.issue(&ctx.user).unwrap();
    ctx.users.remove(ctx.user.id).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header(("Authorization", format!("Bearer {}", access)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_authorities_come_from_principal_store() {
    let ctx = setup().await;
    let admin = ctx
        .users
        .insert(User::new("librarian@folio.test", "unused-hash").with_authorities([ROLE_ADMIN]))
        .await
        .unwrap();

    let app = test::init_service(
        App::new()
            .wrap(ctx.gate.clone())
            .route("/admin", web::get().to(admin_only))
            .route("/whoami", web::get().to(whoami)),
    )
    .await;

    let reader_token = ctx.codec.issue(&ctx.user).unwrap();
    let admin_token = ctx.codec.issue(&admin).unwrap();

    let req = test::TestRequest::get()
        .uri("/admin")
        .insert_header(("Authorization", format!("Bearer {}", reader_token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri("/admin")
        .insert_header(("Authorization", format!("Bearer {}", admin_token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/admin").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get().uri("/whoami").to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert_eq!(body, "anonymous");

    let req = test::TestRequest::get()
        .uri("/whoami")
        .insert_header(("Authorization", format!("Bearer {}", admin_token)))
        .to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert_eq!(body, "librarian@folio.test");
}
