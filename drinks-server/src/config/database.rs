use confique::Config;

/// SQLite storage configuration
#[derive(Debug, Config, Clone, Default)]
pub struct DatabaseConfig {
    /// Connection string (default: sqlite://drinks.db)
    #[config(env = "DRINKS_DATABASE_URL", default = "sqlite://drinks.db")]
    pub url: String,

    /// Maximum number of pooled connections (default: 5)
    #[config(env = "DRINKS_DATABASE_MAX_CONNECTIONS", default = 5)]
    pub max_connections: u32,

    /// Drop all drinks on startup and seed a single one (default: false)
    #[config(env = "DRINKS_DATABASE_RESET_ON_START", default = false)]
    pub reset_on_start: bool,
}
