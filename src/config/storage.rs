use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Storage engine settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Database URL for SQLite. The file is created on first open.
    /// TOML: `storage.database_url`. Default: `sqlite://inventory.db`.
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// How long a statement waits on a locked database before failing.
    /// TOML: `storage.busy_timeout_secs`. Default: `5`.
    #[serde(default = "default_busy_timeout_secs")]
    pub busy_timeout_secs: u64,

    /// TOML: `storage.max_connections`. Default: `4`.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            busy_timeout_secs: default_busy_timeout_secs(),
            max_connections: default_max_connections(),
        }
    }
}

impl StorageConfig {
    /// Settings for a given database URL, everything else defaulted.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Self::default()
        }
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_secs(self.busy_timeout_secs)
    }
}

fn default_database_url() -> String {
    "sqlite://inventory.db".to_string()
}

fn default_busy_timeout_secs() -> u64 {
    5
}

fn default_max_connections() -> u32 {
    4
}
