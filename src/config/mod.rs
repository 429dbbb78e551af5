mod basic;
mod storage;

pub use basic::BasicConfig;
pub use storage::StorageConfig;

use figment::{
    Figment,
    providers::{Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::InventoryError;

/// Application configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Core settings (see `basic` table in inventory.toml).
    #[serde(default)]
    pub basic: BasicConfig,

    /// Database settings (see `storage` table in inventory.toml).
    #[serde(default)]
    pub storage: StorageConfig,
}

pub const DEFAULT_CONFIG_FILE: &str = "inventory.toml";

impl Config {
    /// Builds a Figment that merges defaults and the given TOML file when it exists.
    pub fn figment(path: &Path) -> Figment {
        let figment = Figment::new().merge(Serialized::defaults(Config::default()));
        if path.is_file() {
            figment.merge(Toml::file(path))
        } else {
            figment
        }
    }

    /// Loads configuration by merging defaults and `path` if present.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, InventoryError> {
        Ok(Self::figment(path.as_ref()).extract()?)
    }

    /// Loads configuration from `inventory.toml` in the working directory, if present.
    pub fn from_optional_toml() -> Result<Self, InventoryError> {
        Self::load(DEFAULT_CONFIG_FILE)
    }
}
