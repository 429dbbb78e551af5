#![allow(dead_code)]

use inventory::config::StorageConfig;
use inventory::contract::Column;
use inventory::{ContentValues, ProductProvider};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use std::time::SystemTime;

/// A SQLite file in the temp dir, removed (with its WAL side files) on drop.
pub struct TempDb {
    pub path: PathBuf,
}

impl TempDb {
    pub fn new(tag: &str) -> Self {
        let mut hasher = DefaultHasher::new();
        SystemTime::now().hash(&mut hasher);
        tag.hash(&mut hasher);
        std::thread::current().id().hash(&mut hasher);
        let db_file_name = format!("test_inventory_{tag}_{}.sqlite", hasher.finish());
        Self {
            path: std::env::temp_dir().join(db_file_name),
        }
    }

    pub fn url(&self) -> String {
        format!("sqlite:{}", self.path.to_str().unwrap())
    }

    pub fn settings(&self) -> StorageConfig {
        StorageConfig::with_url(self.url())
    }

    pub async fn provider(&self) -> ProductProvider {
        ProductProvider::open(&self.settings()).await.unwrap()
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        let base = self.path.to_string_lossy().to_string();
        let _ = std::fs::remove_file(format!("{base}-wal"));
        let _ = std::fs::remove_file(format!("{base}-shm"));
        let _ = std::fs::remove_file(&self.path);
    }
}

pub fn widget() -> ContentValues {
    ContentValues::new()
        .with(Column::Name, "Widget")
        .with(Column::Quantity, 10)
        .with(Column::Price, 500)
}

pub fn product(name: &str, quantity: i64) -> ContentValues {
    ContentValues::new()
        .with(Column::Name, name)
        .with(Column::Quantity, quantity)
}
