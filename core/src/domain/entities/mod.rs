//! Domain entities representing core business objects.

pub mod token;
pub mod user;

// Re-export commonly used types
pub use token::{Claims, RefreshToken, TokenPair, TOKEN_TYPE_BEARER};
pub use user::{User, ROLE_ADMIN, ROLE_USER};
