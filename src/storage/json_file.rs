use super::poisoned;
use crate::app::ports::KeyValueStore;
use crate::error::{CatalogError, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// All keys live in one JSON object on disk: `{"key": "value", ...}`.
///
/// Every `set` rewrites the whole file through a temp file and rename.
pub struct JsonFileKv {
    path: PathBuf,
    // serialises read-modify-write cycles within the process
    lock: Mutex<()>,
}

impl JsonFileKv {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&content)? {
            Value::Object(map) => Ok(map),
            other => Err(CatalogError::Persistence(format!(
                "{} holds {} instead of an object",
                self.path.display(),
                type_name(&other)
            ))),
        }
    }

    fn write_all(&self, map: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(map)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl KeyValueStore for JsonFileKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().map_err(poisoned)?;
        let map = self.read_all()?;
        match map.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => {
                warn!("Key {} in {} is not a string", key, self.path.display());
                Ok(Some(other.to_string()))
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock().map_err(poisoned)?;
        // unreadable file gets replaced wholesale
        let mut map = self.read_all().unwrap_or_else(|e| {
            warn!("Discarding unreadable store {}: {}", self.path.display(), e);
            Map::new()
        });
        map.insert(key.to_string(), Value::String(value.to_string()));
        self.write_all(&map)?;
        debug!("Wrote {} to {}", key, self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = tempdir().unwrap();
        let store = JsonFileKv::new(dir.path().join("favorites.json"));
        assert_eq!(store.get("favoritos").unwrap(), None);
    }

    #[test]
    fn test_set_creates_parent_dirs_and_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("favorites.json");
        JsonFileKv::new(&path).set("favoritos", r#"{"1":true}"#).unwrap();

        let reopened = JsonFileKv::new(&path);
        assert_eq!(reopened.get("favoritos").unwrap().as_deref(), Some(r#"{"1":true}"#));
    }

    #[test]
    fn test_keys_are_independent() {
        let dir = tempdir().unwrap();
        let store = JsonFileKv::new(dir.path().join("kv.json"));
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_corrupt_file_is_read_error_but_set_recovers() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("kv.json");
        fs::write(&path, "not json at all").unwrap();

        let store = JsonFileKv::new(&path);
        assert!(store.get("favoritos").is_err());

        store.set("favoritos", "{}").unwrap();
        assert_eq!(store.get("favoritos").unwrap().as_deref(), Some("{}"));
    }
}
