use serde::Deserialize;

/// Application configuration, loaded from defaults, an optional `config.toml`
/// and `TAVOLA_`-prefixed environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server host (default: 0.0.0.0)
    pub host: String,
    /// Server port (default: 8080)
    pub port: u16,
    pub auth: AuthConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Secret used to sign access tokens. Required; no default.
    pub secret: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database URL (default: sqlite:./data/tavola.db)
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (default: info)
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// Allowed origins, comma-separated (default: *)
    pub origins: String,
}

impl Config {
    /// Load configuration. Environment variables use `__` as the section
    /// separator, e.g. `TAVOLA_AUTH__SECRET` sets `auth.secret`.
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8080)?
            .set_default("database.url", "sqlite:./data/tavola.db")?
            .set_default("logging.level", "info")?
            .set_default("cors.origins", "*")?
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("TAVOLA").separator("__"))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_fails_without_secret() {
        // auth.secret has no default, so a bare environment cannot satisfy it.
        let result = Config::load();
        assert!(result.is_err());
    }

    #[test]
    fn test_defaults_deserialize() {
        let config: Config = config::Config::builder()
            .set_default("host", "0.0.0.0")
            .unwrap()
            .set_default("port", 8080)
            .unwrap()
            .set_default("auth.secret", "unit-test-secret")
            .unwrap()
            .set_default("database.url", "sqlite:./data/tavola.db")
            .unwrap()
            .set_default("logging.level", "info")
            .unwrap()
            .set_default("cors.origins", "*")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.auth.secret, "unit-test-secret");
        assert_eq!(config.database.url, "sqlite:./data/tavola.db");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.cors.origins, "*");
    }
}
