pub(crate) use crate::config::auth::AuthConfig;
pub(crate) use crate::config::cache::{CacheConfig, CacheStore};
pub(crate) use crate::config::database::DatabaseConfig;
use confique::Config;
use thiserror::Error;

pub mod auth;
pub mod cache;
pub mod database;

/// Optional configuration file read in addition to the environment
pub const CONFIG_FILE: &str = "drinks.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Load(#[from] confique::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure for the drinks server
#[derive(Debug, Config, Clone, Default)]
pub struct DrinksConfig {
    /// The port the server will listen to (default: 8080)
    #[config(env = "DRINKS_PORT", default = 8080)]
    pub port: u16,

    #[config(nested)]
    pub auth: AuthConfig,

    #[config(nested)]
    pub database: DatabaseConfig,

    #[config(nested)]
    pub cache: CacheConfig,
}

impl DrinksConfig {
    /// Load the configuration from the environment and `drinks.toml`.
    ///
    /// Environment variables take precedence over the file.
    pub fn new() -> Result<Self, ConfigError> {
        let config = Self::builder().env().file(CONFIG_FILE).load()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the values confique cannot check on its own
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.domain.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "auth domain must not be empty".to_string(),
            ));
        }
        if self.auth.audience.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "auth audience must not be empty".to_string(),
            ));
        }
        self.auth.get_algorithms()?;
        self.auth.get_jwks_url()?;
        Ok(())
    }

    #[cfg(test)]
    pub fn for_test_with_mocks(jwks_mock: &wiremock::MockServer) -> Self {
        Self {
            port: 0, // Let the OS choose a port
            auth: AuthConfig {
                domain: "drinks.test.auth0.com".to_string(),
                audience: "drinks".to_string(),
                algorithms: "RS256".to_string(),
                jwks_url: Some(format!("{}/.well-known/jwks.json", jwks_mock.uri())),
                jwks_timeout: 2,
                leeway: 0,
            },
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
                reset_on_start: false,
            },
            cache: CacheConfig {
                ttl: 60,
                store: CacheStore::None,
                memory: cache::InMemoryConfig { capacity: 1 },
            },
        }
    }
}
