//! The catalog client used by the search and detail views.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::api::{CatalogApi, OpenLibraryApi, SearchQuery};
use super::cache::{search_cache_key, ResponseCache};
use super::fallback::fallback_result;
use super::format::cover_url_with_base;
use super::normalize::{detail_from_work, is_displayable, last_segment, summary_from_doc};
use super::types::{BookDetail, CoverSize, SearchCriteria, SearchResult};
use super::CatalogError;
use crate::config::{CacheConfig, CatalogConfig};
use crate::metrics;

/// Single point of contact with the catalog service.
///
/// Hides transport, caching, timeouts and degradation from the views.
/// Construct one per process; the search cache lives inside it.
pub struct CatalogClient {
    api: Arc<dyn CatalogApi>,
    cache: ResponseCache<SearchResult>,
    timeout: Duration,
    max_results: usize,
    covers_url: String,
}

impl CatalogClient {
    /// Client talking to the configured Open Library host.
    pub fn new(catalog: &CatalogConfig, cache: &CacheConfig) -> Result<Self, CatalogError> {
        let api = OpenLibraryApi::new(catalog)?;
        info!("Catalog client using {}", api.base_url());
        Ok(Self::with_api(Arc::new(api), catalog, cache))
    }

    /// Client over an arbitrary transport.
    pub fn with_api(api: Arc<dyn CatalogApi>, catalog: &CatalogConfig, cache: &CacheConfig) -> Self {
        Self {
            api,
            cache: ResponseCache::new(Duration::from_secs(cache.ttl_secs)),
            timeout: Duration::from_secs(catalog.timeout_secs),
            max_results: catalog.max_results,
            covers_url: catalog.covers_url.clone(),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Search the catalog.
    ///
    /// Never fails: when the catalog is unreachable, times out, or answers
    /// with an error status, the built-in fallback list (filtered by title
    /// and author) is returned instead.
    pub async fn search(&self, criteria: &SearchCriteria, limit: u32, offset: u32) -> SearchResult {
        match self.fetch_search(criteria, limit, offset).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Search failed, serving fallback list: {}", e);
                let result = fallback_result(criteria);
                metrics::FALLBACK_RESULTS.inc();
                result
            }
        }
    }

    /// Search without the fallback: cache, then network, errors propagated.
    pub async fn fetch_search(
        &self,
        criteria: &SearchCriteria,
        limit: u32,
        offset: u32,
    ) -> Result<SearchResult, CatalogError> {
        let key = search_cache_key(criteria, limit, offset);
        if let Some(mut cached) = self.cache.get(&key).await {
            cached.from_cache = true;
            return Ok(cached);
        }

        let query = SearchQuery::new(criteria, limit, offset);
        let body = self
            .call("search", self.api.search(&query))
            .await?;

        let raw_docs = body
            .get("docs")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let docs: Vec<_> = raw_docs
            .iter()
            .filter(|doc| is_displayable(doc))
            .take(self.max_results)
            .map(summary_from_doc)
            .collect();

        let num_found = body
            .get("numFound")
            .or_else(|| body.get("num_found"))
            .and_then(Value::as_u64)
            .unwrap_or(raw_docs.len() as u64);

        debug!(
            "Search {:?}: {} of {} raw docs kept, {} total",
            query,
            docs.len(),
            raw_docs.len(),
            num_found
        );

        let result = SearchResult {
            docs,
            num_found,
            start: body.get("start").and_then(Value::as_u64),
            from_cache: false,
            fallback: false,
        };

        self.cache.insert(key, result.clone()).await;
        Ok(result)
    }

    /// Full record for one work.
    ///
    /// The work document is required; its editions listing is best-effort
    /// and only enriches the record when it loads.
    pub async fn get_details(&self, identifier: &str) -> Result<BookDetail, CatalogError> {
        let key = canonical_work_key(identifier)?;

        let work = self
            .call("work", self.api.get_work(&key))
            .await
            .map_err(|e| CatalogError::DetailsUnavailable {
                key: key.clone(),
                source: Box::new(e),
            })?;

        let editions = match self.call("editions", self.api.get_editions(&key)).await {
            Ok(editions) => Some(editions),
            Err(e) => {
                warn!("Editions for {} unavailable, using work data only: {}", key, e);
                None
            }
        };

        Ok(detail_from_work(&key, &work, editions.as_ref()))
    }

    /// Cover URL on the configured covers host.
    pub fn cover_url(&self, cover_id: Option<i64>, size: CoverSize) -> Option<String> {
        cover_url_with_base(&self.covers_url, cover_id, size)
    }

    /// Run one upstream call under the timeout and record metrics.
    async fn call<F>(&self, operation: &str, request: F) -> Result<Value, CatalogError>
    where
        F: Future<Output = Result<Value, CatalogError>>,
    {
        let started = Instant::now();
        let outcome = match tokio::time::timeout(self.timeout, request).await {
            Ok(result) => result,
            Err(_) => Err(CatalogError::Timeout(self.timeout)),
        };

        let status = if outcome.is_ok() { "success" } else { "error" };
        metrics::CATALOG_REQUESTS
            .with_label_values(&[operation, status])
            .inc();
        metrics::CATALOG_REQUEST_DURATION
            .with_label_values(&[operation])
            .observe(started.elapsed().as_secs_f64());

        outcome
    }
}

/// Canonical `/works/{id}` key for an identifier in any of the shapes the
/// views pass around: `OL45883W`, `works/OL45883W`, `/works/OL45883W.json`,
/// or a full URL.
pub fn canonical_work_key(identifier: &str) -> Result<String, CatalogError> {
    let trimmed = identifier.trim();
    let trimmed = trimmed.strip_suffix(".json").unwrap_or(trimmed);

    last_segment(trimmed)
        .map(|id| id.trim())
        .filter(|id| !id.is_empty())
        .map(|id| format!("/works/{}", id))
        .ok_or_else(|| CatalogError::InvalidIdentifier(identifier.to_string()))
}
