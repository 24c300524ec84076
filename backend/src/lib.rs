pub mod config;
pub mod routes;
pub mod auth;
pub mod store;
pub mod models;
pub mod logging;
pub mod test_util;

pub use config::Config;
pub use auth::{AuthService, TokenIssuer};
pub use models::api::ApiResponse;
pub use store::Store;

use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: Arc<Store>,
    pub auth_service: AuthService,
}
