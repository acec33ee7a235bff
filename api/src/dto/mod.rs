pub mod auth;

pub use auth::{
    LoginRequest, LogoutAllResponse, LogoutRequest, MeResponse, RefreshTokenRequest,
    TokenResponse,
};
