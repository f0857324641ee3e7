use super::{Cache, CacheBackend};
use async_trait::async_trait;
use drinks_auth::{AuthError, KeySet, KeySetSource};
use log::{debug, info, warn};
use std::sync::Arc;

/// Key set source that consults the cache before the wrapped source.
///
/// Entries are keyed by the key set URL. Cache failures are logged and
/// fall through to the wrapped source; fetch failures are never cached.
pub struct CachedKeySet<S> {
    source: S,
    cache: Arc<Cache>,
    key: String,
}

impl<S: KeySetSource> CachedKeySet<S> {
    pub fn new(source: S, cache: Arc<Cache>, key: impl Into<String>) -> Self {
        Self {
            source,
            cache,
            key: key.into(),
        }
    }

    async fn fetch_and_store(&self) -> Result<KeySet, AuthError> {
        self.fetch_and_store().await
    }

    /// Replaces the cached entry, so rotated keys are picked up before the
    /// TTL runs out
    async fn refresh(&self) -> Result<Option<KeySet>, AuthError> {
        if !self.cache.is_enabled() {
            return Ok(None);
        }
        info!("Refreshing cached key set for {}", self.key);
        self.fetch_and_store().await.map(Some)
    }
}

#[async_trait]
impl<S: KeySetSource> KeySetSource for CachedKeySet<S> {
    async fn key_set(&self) -> Result<KeySet, AuthError> {
        match self.cache.get::<KeySet>(&self.key).await {
            Ok(Some(key_set)) => {
                debug!("Using cached key set for {}", self.key);
                return Ok(key_set);
            }
            Ok(None) => {}
            Err(e) => warn!("Failed to read cached key set for {}: {}", self.key, e),
        }

        let key_set = self.source.key_set().await?;
        if let Err(e) = self.cache.set(&self.key, &key_set).await {
            warn!("Failed to cache key set for {}: {}", self.key, e);
        }
        Ok(key_set)
    }
}
