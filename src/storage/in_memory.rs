use super::poisoned;
use crate::app::ports::KeyValueStore;
use crate::error::Result;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

/// In-memory storage implementation for development/testing
pub struct InMemoryKv {
    entries: Mutex<HashMap<String, String>>,
}

impl Default for InMemoryKv {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryKv {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Seed a value, e.g. a blob written by an earlier session.
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        if let Ok(mut entries) = store.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
        store
    }
}

impl KeyValueStore for InMemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().map_err(poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().map_err(poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        debug!("Stored {} bytes under {}", value.len(), key);
        Ok(())
    }
}
