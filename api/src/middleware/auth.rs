//! Bearer token authentication gate.
//!
//! The gate reads `Authorization: Bearer <token>`, verifies the token with the
//! [`AccessTokenCodec`], resolves the subject against the principal store and
//! inserts an [`AuthContext`] into the request extensions. It never rejects a
//! request itself: a missing or bad token simply leaves the request
//! unauthenticated, and the [`AuthContext`] extractor answers 401 for routes
//! that need an identity.

use actix_web::{
    dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderMap, AUTHORIZATION},
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    time::Duration,
};
use tracing::{debug, warn};
use uuid::Uuid;

use folio_core::domain::entities::user::User;
use folio_core::errors::DomainError;
use folio_core::repositories::UserRepository;
use folio_core::services::token::AccessTokenCodec;

use crate::handlers::error::ApiError;

const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Identity attached to an authenticated request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// Principal id
    pub user_id: Uuid,
    /// Login identifier, the token subject
    pub email: String,
    /// Authorities as currently held in the principal store
    pub authorities: Vec<String>,
}

impl AuthContext {
    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
            authorities: user.authorities.clone(),
        }
    }

    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|a| a == authority)
    }

    /// Fails with 403 unless the principal holds `authority`
    pub fn require_authority(&self, authority: &str) -> Result<(), ApiError> {
        if self.has_authority(authority) {
            Ok(())
        } else {
            Err(DomainError::Forbidden {
                authority: authority.to_string(),
            }
            .into())
        }
    }
}

/// Authentication gate middleware factory
#[derive(Clone)]
pub struct JwtAuth {
    codec: Arc<AccessTokenCodec>,
    principals: Arc<dyn UserRepository>,
    lookup_timeout: Duration,
}

impl JwtAuth {
    /// Creates a gate verifying with `codec` and resolving subjects in `principals`
    pub fn new(codec: Arc<AccessTokenCodec>, principals: Arc<dyn UserRepository>) -> Self {
        Self {
            codec,
            principals,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    /// Deadline for the principal lookup; an elapsed deadline leaves the request unauthenticated
    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
            gate: self.clone(),
        }))
    }
}

/// Authentication gate middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
    gate: JwtAuth,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    actix_web::dev::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let gate = self.gate.clone();

        Box::pin(async move {
            if let Some(token) = extract_bearer_token(req.headers()) {
                if let Some(context) = gate.authenticate(&token).await {
                    req.extensions_mut().insert(context);
                }
            }

            service.call(req).await
        })
    }
}

impl JwtAuth {
    async fn authenticate(&self, token: &str) -> Option<AuthContext> {
        let claims = match self.codec.verify(token) {
            Ok(claims) => claims,
            Err(_) => {
                debug!("Bearer token rejected, continuing unauthenticated");
                return None;
            }
        };

        let lookup = self.principals.find_by_email(&claims.sub);
        match tokio::time::timeout(self.lookup_timeout, lookup).await {
            Ok(Ok(Some(user))) => Some(AuthContext::from_user(&user)),
            Ok(Ok(None)) => {
                debug!("Token subject no longer exists, continuing unauthenticated");
                None
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Principal lookup failed, continuing unauthenticated");
                None
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.lookup_timeout.as_millis() as u64,
                    "Principal lookup timed out, continuing unauthenticated"
                );
                None
            }
        }
    }
}

/// Extracts the bearer credential from the Authorization header
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| ApiError::from(DomainError::Unauthorized));

        ready(result)
    }
}

/// Extractor for optional authentication
pub struct OptionalAuth(pub Option<AuthContext>);

impl FromRequest for OptionalAuth {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let auth = req.extensions().get::<AuthContext>().cloned();
        ready(Ok(OptionalAuth(auth)))
    }
}
