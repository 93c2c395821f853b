//! Storage backend selection

use serde::Deserialize;

/// Which persistence adapter the process runs against.
///
/// Chosen once at startup; the store never switches at runtime.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Relational table with a JSON message column (PostgreSQL)
    Postgres,
    /// Document store (Redis)
    Redis,
    /// Process-local map; data is lost on restart
    #[default]
    Memory,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StorageBackend::Postgres => "postgres",
            StorageBackend::Redis => "redis",
            StorageBackend::Memory => "memory",
        };
        f.write_str(name)
    }
}

/// Storage configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
}
