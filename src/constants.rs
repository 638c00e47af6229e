/// Catalog and storage constants shared across the codebase

// Remote catalog
pub const DEFAULT_BASE_URL: &str = "https://rickandmortyapi.com/api";
pub const CHARACTER_PATH: &str = "character";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// Pagination starts here and advances by one per successful page.
pub const FIRST_PAGE: u32 = 1;

// Local persistence
// Key kept compatible with favorites blobs written by the mobile app
pub const FAVORITES_KEY: &str = "favoritos";
pub const DEFAULT_FAVORITES_PATH: &str = "data/favorites.json";

// Search
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

// Logging
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const LOG_FILE_NAME: &str = "character_browser.log";

pub const DEFAULT_CONFIG_PATH: &str = "character_browser.toml";
