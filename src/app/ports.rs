use crate::domain::{CatalogPage, Character, CharacterId};
use crate::error::Result;
use async_trait::async_trait;

// Transport-side ports
#[async_trait]
pub trait HttpClientPort: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpGetResult>;
}

#[derive(Clone, Debug)]
pub struct HttpGetResult {
    pub status: u16,
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl HttpGetResult {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Queries against the remote character catalog. Each call is attempted once.
#[async_trait]
pub trait CatalogPort: Send + Sync {
    /// `page` starts at 1.
    async fn fetch_page(&self, page: u32) -> Result<CatalogPage>;

    /// A miss is an empty vector, not an error. `term` must be non-empty.
    async fn search_by_name(&self, term: &str) -> Result<Vec<Character>>;

    async fn fetch_character(&self, id: CharacterId) -> Result<Character>;
}

/// Opaque key-value persistence behind the favorites store.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}
