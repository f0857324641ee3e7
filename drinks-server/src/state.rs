use crate::cache::{Cache, CachedKeySet};
use crate::config::{ConfigError, DrinksConfig};
use drinks_auth::{Authorizer, RemoteKeySet, TokenVerifier};
use log::info;
use sqlx::SqlitePool;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to create key set client: {0}")]
    Client(#[from] reqwest::Error),
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<DrinksConfig>,
    pub db: SqlitePool,
    pub cache: Arc<Cache>,
    pub authorizer: Arc<Authorizer>,
}

impl AppState {
    /// Build the authorization pipeline from the auth configuration, putting
    /// the cache in front of the key set endpoint.
    fn create_authorizer(
        config: &DrinksConfig,
        cache: Arc<Cache>,
    ) -> Result<Authorizer, StateError> {
        let auth = &config.auth;
        let url = auth.get_jwks_url()?;

        info!(
            "Verifying tokens from {} (key set: {}, caching: {})",
            auth.domain,
            url,
            cache.is_enabled()
        );

        let key = url.to_string();
        let remote = RemoteKeySet::new(url, auth.get_jwks_timeout())?;
        let key_set = CachedKeySet::new(remote, cache, key);
        let verifier =
            TokenVerifier::new(&auth.domain, auth.audience.clone(), auth.get_algorithms()?)
                .with_leeway(auth.leeway);

        Ok(Authorizer::new(Arc::new(key_set), verifier))
    }

    pub fn new(config: DrinksConfig, db: SqlitePool, cache: Cache) -> Result<Self, StateError> {
        let cache = Arc::new(cache);
        let authorizer = Self::create_authorizer(&config, cache.clone())?;
        Ok(Self {
            config: Arc::new(config),
            db,
            cache,
            authorizer: Arc::new(authorizer),
        })
    }
}
