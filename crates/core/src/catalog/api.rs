//! Transport to the Open Library HTTP API.
//!
//! Open Library needs no API key but asks clients to send an identifying
//! User-Agent.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::types::SearchCriteria;
use super::CatalogError;
use crate::config::CatalogConfig;

/// Output fields requested from the search endpoint.
pub const SEARCH_FIELDS: &str =
    "key,title,author_name,first_publish_year,cover_i,publisher,isbn,language,subject";

/// Parameters of one `/search.json` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub limit: u32,
    pub offset: u32,
}

impl SearchQuery {
    /// Build a query from criteria, keeping only trimmed non-blank fields.
    pub fn new(criteria: &SearchCriteria, limit: u32, offset: u32) -> Self {
        Self {
            title: criteria.title().map(str::to_string),
            author: criteria.author().map(str::to_string),
            subject: criteria.subject().map(str::to_string),
            limit,
            offset,
        }
    }

    /// Query string pairs in request order.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(6);
        if let Some(title) = &self.title {
            params.push(("title", title.clone()));
        }
        if let Some(author) = &self.author {
            params.push(("author", author.clone()));
        }
        if let Some(subject) = &self.subject {
            params.push(("subject", subject.clone()));
        }
        params.push(("limit", self.limit.to_string()));
        params.push(("offset", self.offset.to_string()));
        params.push(("fields", SEARCH_FIELDS.to_string()));
        params
    }
}

/// Raw access to the catalog service.
///
/// Implementations return the response body as JSON without interpreting
/// it; shape handling belongs to the normalizer.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// `GET /search.json`.
    async fn search(&self, query: &SearchQuery) -> Result<Value, CatalogError>;

    /// `GET {work_key}.json`, `work_key` being canonical (`/works/{id}`).
    async fn get_work(&self, work_key: &str) -> Result<Value, CatalogError>;

    /// `GET {work_key}/editions.json`.
    async fn get_editions(&self, work_key: &str) -> Result<Value, CatalogError>;
}

/// reqwest-backed [`CatalogApi`].
pub struct OpenLibraryApi {
    client: Client,
    base_url: String,
}

impl OpenLibraryApi {
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CatalogError::NotConfigured(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json(
        &self,
        path: &str,
        params: &[(&'static str, String)],
    ) -> Result<Value, CatalogError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Catalog GET {} {:?}", url, params);

        let response = self.client.get(&url).query(params).send().await?;

        let status = response.status();
        if status == 404 {
            return Err(CatalogError::NotFound(path.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        response.json().await.map_err(|e| {
            CatalogError::ParseError(format!("Failed to parse response from {}: {}", path, e))
        })
    }
}

/// Path-encode the id segment of a canonical work key.
fn work_path(work_key: &str) -> String {
    let id = work_key.trim_start_matches("/works/");
    format!("/works/{}", urlencoding::encode(id))
}

#[async_trait]
impl CatalogApi for OpenLibraryApi {
    async fn search(&self, query: &SearchQuery) -> Result<Value, CatalogError> {
        self.get_json("/search.json", &query.to_params()).await
    }

    async fn get_work(&self, work_key: &str) -> Result<Value, CatalogError> {
        self.get_json(&format!("{}.json", work_path(work_key)), &[])
            .await
    }

    async fn get_editions(&self, work_key: &str) -> Result<Value, CatalogError> {
        self.get_json(&format!("{}/editions.json", work_path(work_key)), &[])
            .await
    }
}
