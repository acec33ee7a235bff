pub mod auth;

pub use auth::{extract_bearer_token, AuthContext, JwtAuth, OptionalAuth};
