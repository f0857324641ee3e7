use super::ConfigError;
use confique::Config;
use drinks_auth::{jwks_url_for_domain, Algorithm};
use std::time::Duration;
use url::Url;

/// Identity provider configuration
#[derive(Debug, Config, Clone, Default)]
pub struct AuthConfig {
    /// Identity provider domain, e.g. `coffee.eu.auth0.com`
    #[config(env = "DRINKS_AUTH_DOMAIN")]
    pub domain: String,

    /// Expected `aud` claim of incoming tokens
    #[config(env = "DRINKS_AUTH_AUDIENCE")]
    pub audience: String,

    /// Accepted signing algorithms, comma separated (default: RS256)
    #[config(env = "DRINKS_AUTH_ALGORITHMS", default = "RS256")]
    pub algorithms: String,

    /// Key set URL override (default: derived from the domain)
    #[config(env = "DRINKS_AUTH_JWKS_URL")]
    pub jwks_url: Option<String>,

    /// Timeout for key set requests in seconds (default: 5)
    #[config(env = "DRINKS_AUTH_JWKS_TIMEOUT", default = 5)]
    pub jwks_timeout: u64,

    /// Tolerated clock skew on token expiry in seconds (default: 0)
    #[config(env = "DRINKS_AUTH_LEEWAY", default = 0)]
    pub leeway: u64,
}

impl AuthConfig {
    /// Parse the configured algorithm list
    pub fn get_algorithms(&self) -> Result<Vec<Algorithm>, ConfigError> {
        let algorithms = self
            .algorithms
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<Algorithm>()
                    .map_err(|_| ConfigError::Invalid(format!("unknown algorithm '{s}'")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if algorithms.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one signing algorithm is required".to_string(),
            ));
        }
        Ok(algorithms)
    }

    /// The key set URL, either the override or the provider's well-known one
    pub fn get_jwks_url(&self) -> Result<Url, ConfigError> {
        let url = match &self.jwks_url {
            Some(url) => Url::parse(url),
            None => jwks_url_for_domain(&self.domain),
        };
        url.map_err(|e| ConfigError::Invalid(format!("invalid key set URL: {e}")))
    }

    pub fn get_jwks_timeout(&self) -> Duration {
        Duration::from_secs(self.jwks_timeout)
    }
}
