use crate::constants::{
    DEFAULT_BASE_URL, DEFAULT_DEBOUNCE_MS, DEFAULT_FAVORITES_PATH, DEFAULT_LOG_DIR,
    DEFAULT_TIMEOUT_SECONDS,
};
use crate::error::{CatalogError, Result};
use crate::favorites::TogglePolicy;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub favorites: FavoritesConfig,
    pub search: SearchConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl CatalogConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Which key-value backend holds the favorites blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    JsonFile,
    Sqlite,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FavoritesConfig {
    pub backend: StorageBackend,
    pub path: PathBuf,
    pub policy: TogglePolicy,
}

impl Default for FavoritesConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::JsonFile,
            path: PathBuf::from(DEFAULT_FAVORITES_PATH),
            policy: TogglePolicy::Toggle,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub debounce_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub dir: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_LOG_DIR),
        }
    }
}

impl Config {
    /// Load from a TOML file. A missing file yields the defaults.
    pub fn load(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        let config_content = fs::read_to_string(config_path).map_err(|e| {
            CatalogError::Config(format!(
                "Failed to read config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;

        Self::from_toml(&config_content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        if config.catalog.base_url.trim().is_empty() {
            return Err(CatalogError::Config("catalog.base_url must not be empty".into()));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.catalog.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.favorites.backend, StorageBackend::JsonFile);
        assert_eq!(config.favorites.policy, TogglePolicy::Toggle);
        assert_eq!(config.search.debounce(), Duration::from_millis(300));
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config = Config::from_toml(
            r#"
            [catalog]
            timeout_seconds = 3

            [favorites]
            backend = "sqlite"
            path = "fav.db"
            policy = "add_only"
            "#,
        )
        .unwrap();
        assert_eq!(config.catalog.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.catalog.timeout(), Duration::from_secs(3));
        assert_eq!(config.favorites.backend, StorageBackend::Sqlite);
        assert_eq!(config.favorites.path, PathBuf::from("fav.db"));
        assert_eq!(config.favorites.policy, TogglePolicy::AddOnly);
    }

    #[test]
    fn test_rejects_empty_base_url() {
        let err = Config::from_toml("[catalog]\nbase_url = \"  \"\n").unwrap_err();
        assert!(matches!(err, CatalogError::Config(_)));
    }

    #[test]
    fn test_rejects_unknown_backend() {
        let err = Config::from_toml("[favorites]\nbackend = \"redis\"\n").unwrap_err();
        assert!(matches!(err, CatalogError::Toml(_)));
    }
}
