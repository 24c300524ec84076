pub mod password;
pub mod token;
pub mod service;

pub use service::{AuthError, AuthService, LoginRequest, LoginResponse, RegisterRequest};
pub use token::{AccessClaims, TokenIssuer, TOKEN_VALIDITY_DAYS};
