use confique::Config;
use serde::{de, Deserialize, Deserializer};

/// Specifies which cache store implementation to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheStore {
    InMemory,
    #[default]
    None,
}

impl<'de> Deserialize<'de> for CacheStore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        match value.trim().to_ascii_lowercase().as_str() {
            "in-memory" => Ok(Self::InMemory),
            "none" | "" => Ok(Self::None),
            other => Err(de::Error::unknown_variant(other, &["in-memory", "none"])),
        }
    }
}

/// Configuration for the key set cache
#[derive(Debug, Config, Clone, Default)]
pub struct CacheConfig {
    /// Cache store type: "in-memory" or "none" (default)
    #[config(env = "DRINKS_CACHE_STORE", default = "none")]
    pub store: CacheStore,

    /// Cache TTL in seconds (default: 10 minutes)
    #[config(env = "DRINKS_CACHE_TTL", default = 600)]
    pub ttl: u64,

    #[config(nested)]
    pub memory: InMemoryConfig,
}

/// In-memory cache configuration options
#[derive(Debug, Config, Clone, Default)]
pub struct InMemoryConfig {
    /// Maximum capacity in MiB (default: 1 MiB)
    #[config(env = "DRINKS_CACHE_MEMORY_CAPACITY", default = 1)]
    pub capacity: usize,
}
