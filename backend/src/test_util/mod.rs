use std::sync::Arc;

use crate::auth::{AuthService, TokenIssuer};
use crate::config::{AuthConfig, Config, CorsConfig, DatabaseConfig, LoggingConfig};
use crate::store::Store;
use crate::AppState;

pub const TEST_SECRET: &str = "test-signing-secret-0123456789abcdef";

pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 8080,
        auth: AuthConfig {
            secret: TEST_SECRET.to_string(),
        },
        database: DatabaseConfig {
            url: ":memory:".to_string(),
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
        },
        cors: CorsConfig {
            origins: "*".to_string(),
        },
    }
}

pub fn create_test_state() -> Arc<AppState> {
    let config = test_config();
    let store = Arc::new(Store::new(&config.database.url).unwrap());
    let auth_service = AuthService::new(store.clone(), TokenIssuer::new(&config.auth.secret));

    Arc::new(AppState {
        config,
        store,
        auth_service,
    })
}
