//! Authentication: token codec, identity, credential checks.

mod handlers;
pub mod identity;
pub mod jwt;
pub mod password;
mod service;

pub use handlers::{authenticate, LoginRequest, TokenResponse};
pub use identity::{Identity, RequestContext, ROLE_ADMIN, ROLE_MEMBER};
pub use jwt::{Claims, KeyError, SigningKey, TokenCodec, TokenError};
pub use password::{Argon2Encoder, PasswordEncoder};
pub use service::{AuthError, Authenticator};
