//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `CONVERSATION_STORE`
//! prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use conversation_store::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Storage backend: {}", config.storage.backend);
//! ```

mod auth;
mod database;
mod error;
mod redis;
mod server;
mod storage;

pub use auth::AuthConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use self::redis::RedisConfig;
pub use server::{Environment, ServerConfig};
pub use storage::{StorageBackend, StorageConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Which persistence adapter to run against
    #[serde(default)]
    pub storage: StorageConfig,

    /// PostgreSQL connection; required when `storage.backend = postgres`
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// Redis connection; required when `storage.backend = redis`
    #[serde(default)]
    pub redis: Option<RedisConfig>,

    /// Bearer token validation (OIDC)
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `CONVERSATION_STORE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `CONVERSATION_STORE__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `CONVERSATION_STORE__STORAGE__BACKEND=postgres` -> `storage.backend`
    /// - `CONVERSATION_STORE__DATABASE__URL=...` -> `database.url = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CONVERSATION_STORE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Only the section of the selected backend is required and validated.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.auth.validate(&self.server.environment)?;

        match self.storage.backend {
            StorageBackend::Postgres => self
                .database
                .as_ref()
                .ok_or(ValidationError::MissingRequired("DATABASE__URL"))?
                .validate()?,
            StorageBackend::Redis => self
                .redis
                .as_ref()
                .ok_or(ValidationError::MissingRequired("REDIS__URL"))?
                .validate()?,
            StorageBackend::Memory => {}
        }

        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
