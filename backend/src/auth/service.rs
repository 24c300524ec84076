use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::auth::password;
use crate::auth::token::TokenIssuer;
use crate::models::user::{User, ROLE_ADMIN, ROLE_CUSTOMER};
use crate::store::{Store, StoreError};

/// Body of POST /api/auth/register.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub name: String,
    /// Requested role. Anything but "Admin" (case-insensitive) becomes
    /// "Customer".
    #[serde(default)]
    pub role: String,
}

/// Body of POST /api/auth/login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Payload returned by a successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub email: String,
    pub token: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Username already exists")]
    DuplicateUsername,
    /// Shared by the unknown-username and wrong-password paths so a caller
    /// cannot probe which usernames exist.
    #[error("Username or password is incorrect")]
    InvalidCredentials,
    /// Registration failure with the underlying diagnostic echoed verbatim.
    #[error("{0}")]
    RegistrationFailed(String),
    #[error("Token issuance failed: {0}")]
    TokenIssuance(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Orchestrates registration and login against the store and token issuer.
///
/// The signing secret reaches this service only through the injected
/// [`TokenIssuer`]; there is no process-wide signing state.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<Store>,
    tokens: TokenIssuer,
}

impl AuthService {
    pub fn new(store: Arc<Store>, tokens: TokenIssuer) -> Self {
        Self { store, tokens }
    }

    /// Register a new account and assign its role.
    pub fn register(&self, request: &RegisterRequest) -> Result<(), AuthError> {
        if self
            .store
            .find_user_by_username(&request.username)?
            .is_some()
        {
            return Err(AuthError::DuplicateUsername);
        }

        let password_hash = password::hash_password(&request.password)
            .map_err(|e| AuthError::RegistrationFailed(e.to_string()))?;
        let user = User::new(&request.username, &request.name, password_hash);

        let role = if request.role.eq_ignore_ascii_case(ROLE_ADMIN) {
            ROLE_ADMIN
        } else {
            // Unrecognized role strings silently fall back to Customer.
            ROLE_CUSTOMER
        };

        self.persist_registration(&user, role)
            .map_err(|e| AuthError::RegistrationFailed(e.to_string()))?;

        tracing::info!("Registered user {} with role {}", user.username, role);
        Ok(())
    }

    fn persist_registration(&self, user: &User, role: &str) -> Result<(), StoreError> {
        self.store.insert_user(user)?;

        // Lazy role bootstrap: both roles come into existence together on the
        // first registration ever.
        if !self.store.role_exists(ROLE_ADMIN)? {
            self.store.insert_role(ROLE_ADMIN)?;
            self.store.insert_role(ROLE_CUSTOMER)?;
        }

        self.store.assign_role(&user.id, role)
    }

    /// Verify credentials and issue a signed access token.
    pub fn login(&self, request: &LoginRequest) -> Result<LoginResponse, AuthError> {
        let user = self
            .store
            .find_user_by_username(&request.username)?
            .ok_or(AuthError::InvalidCredentials)?;

        if !password::verify_password(&request.password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        // Only the first assigned role is embedded in the token.
        let roles = self.store.roles_for_user(&user.id)?;
        let role = roles.first().cloned().unwrap_or_default();

        let token = self
            .tokens
            .issue(&user, &role)
            .map_err(|e| AuthError::TokenIssuance(e.to_string()))?;

        if user.email.is_empty() || token.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(LoginResponse {
            email: user.email,
            token,
        })
    }
}
