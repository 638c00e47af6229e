//! Client for the remote character catalog.
//!
//! Every call is attempted exactly once; callers degrade failures to an empty
//! result themselves.

use crate::app::ports::{CatalogPort, HttpClientPort, HttpGetResult};
use crate::constants::CHARACTER_PATH;
use crate::domain::{CatalogPage, Character, CharacterId, PageResponse, SearchResponse};
use crate::error::{CatalogError, Result};
use async_trait::async_trait;
use metrics::counter;
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

pub struct RemoteCatalog {
    http: Arc<dyn HttpClientPort>,
    base_url: String,
}

impl RemoteCatalog {
    pub fn new(http: Arc<dyn HttpClientPort>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    fn page_url(&self, page: u32) -> String {
        format!("{}/{}?page={}", self.base_url, CHARACTER_PATH, page)
    }

    fn search_url(&self, term: &str) -> Result<String> {
        let base = format!("{}/{}/", self.base_url, CHARACTER_PATH);
        let url = Url::parse_with_params(&base, &[("name", term)])
            .map_err(|e| CatalogError::Config(format!("Invalid catalog url '{}': {}", base, e)))?;
        Ok(url.to_string())
    }

    fn character_url(&self, id: CharacterId) -> String {
        format!("{}/{}/{}", self.base_url, CHARACTER_PATH, id)
    }

    async fn get(&self, op: &'static str, url: &str) -> Result<HttpGetResult> {
        counter!("catalog_requests_total", "op" => op).increment(1);
        match self.http.get(url).await {
            Ok(resp) => Ok(resp),
            Err(e) => {
                counter!("catalog_failures_total", "op" => op).increment(1);
                warn!("{} request to {} failed: {}", op, url, e);
                Err(e)
            }
        }
    }
}

fn decode<T: DeserializeOwned>(resp: &HttpGetResult) -> Result<T> {
    serde_json::from_slice(&resp.bytes).map_err(|e| {
        debug!("Undecodable body ({}): {}", resp.content_type, e);
        CatalogError::Json(e)
    })
}

fn non_success(resp: &HttpGetResult) -> CatalogError {
    CatalogError::Network {
        status: Some(resp.status),
        message: format!("catalog responded with status {}", resp.status),
    }
}

#[async_trait]
impl CatalogPort for RemoteCatalog {
    #[instrument(skip(self))]
    async fn fetch_page(&self, page: u32) -> Result<CatalogPage> {
        if page == 0 {
            return Err(CatalogError::InvalidArgument("page numbers start at 1".into()));
        }
        let resp = self.get("page", &self.page_url(page)).await?;
        if !resp.is_success() {
            return Err(non_success(&resp));
        }
        let body: PageResponse = decode(&resp)?;
        debug!("Page {} returned {} characters", page, body.results.len());
        Ok(CatalogPage {
            characters: body.results,
            has_more: body.info.next.is_some(),
        })
    }

    #[instrument(skip(self))]
    async fn search_by_name(&self, term: &str) -> Result<Vec<Character>> {
        if term.trim().is_empty() {
            return Err(CatalogError::InvalidArgument("search term must not be empty".into()));
        }
        let resp = self.get("search", &self.search_url(term)?).await?;

        // A miss comes back as 404 with an error body
        if resp.status == 404 {
            if let Ok(SearchResponse::NotFound { error }) = decode::<SearchResponse>(&resp) {
                debug!("No match for '{}': {}", term, error);
                return Ok(Vec::new());
            }
        }
        if !resp.is_success() {
            return Err(non_success(&resp));
        }
        match decode::<SearchResponse>(&resp)? {
            SearchResponse::Found { results } => {
                debug!("Search '{}' matched {} characters", term, results.len());
                Ok(results)
            }
            SearchResponse::NotFound { error } => {
                debug!("No match for '{}': {}", term, error);
                Ok(Vec::new())
            }
        }
    }

    #[instrument(skip(self))]
    async fn fetch_character(&self, id: CharacterId) -> Result<Character> {
        let resp = self.get("character", &self.character_url(id)).await?;
        if !resp.is_success() {
            return Err(non_success(&resp));
        }
        decode(&resp)
    }
}
