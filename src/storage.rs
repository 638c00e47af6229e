//! Key-value backends for the favorites blob.

pub mod in_memory;
pub mod json_file;
pub mod sqlite;

pub use in_memory::InMemoryKv;
pub use json_file::JsonFileKv;
pub use sqlite::SqliteKv;

use crate::app::ports::KeyValueStore;
use crate::config::{FavoritesConfig, StorageBackend};
use crate::error::{CatalogError, Result};
use std::sync::{Arc, MutexGuard, PoisonError};
use tracing::info;

/// Open the backend named in configuration.
pub fn open_store(config: &FavoritesConfig) -> Result<Arc<dyn KeyValueStore>> {
    let store: Arc<dyn KeyValueStore> = match config.backend {
        StorageBackend::JsonFile => Arc::new(JsonFileKv::new(&config.path)),
        StorageBackend::Sqlite => Arc::new(SqliteKv::open(&config.path)?),
        StorageBackend::Memory => Arc::new(InMemoryKv::new()),
    };
    info!("Favorites backend {:?} at {}", config.backend, config.path.display());
    Ok(store)
}

pub(crate) fn poisoned<T>(_: PoisonError<MutexGuard<'_, T>>) -> CatalogError {
    CatalogError::Persistence("store lock poisoned".into())
}
