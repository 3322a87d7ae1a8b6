//! Mock catalog transport for testing.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::catalog::{CatalogApi, CatalogError, SearchQuery};

/// A recorded transport call for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCatalogCall {
    Search(SearchQuery),
    GetWork { key: String },
    GetEditions { key: String },
}

/// Mock implementation of the CatalogApi trait.
///
/// Provides controllable behavior for testing:
/// - Return configured search bodies (a default, or per query)
/// - Return configured work and editions documents by key
/// - Track calls for assertions
/// - Simulate failures and slow responses
#[derive(Debug, Default)]
pub struct MockCatalogApi {
    /// Body returned by searches without a specific response.
    default_search: Arc<RwLock<Option<Value>>>,
    /// Bodies for specific queries, matched on the title/author/subject fields.
    search_responses: Arc<RwLock<HashMap<(Option<String>, Option<String>, Option<String>), Value>>>,
    /// Work documents by canonical key.
    works: Arc<RwLock<HashMap<String, Value>>>,
    /// Editions listings by canonical work key.
    editions: Arc<RwLock<HashMap<String, Value>>>,
    /// Recorded calls.
    calls: Arc<RwLock<Vec<RecordedCatalogCall>>>,
    /// Every search fails while set.
    fail_searches: Arc<RwLock<bool>>,
    /// Every editions call fails while set.
    fail_editions: Arc<RwLock<bool>>,
    /// If set, the next call will fail with this error.
    next_error: Arc<RwLock<Option<CatalogError>>>,
    /// Artificial latency applied to every call.
    delay: Arc<RwLock<Option<Duration>>>,
}

impl MockCatalogApi {
    /// Create a new mock with no configured responses.
    ///
    /// Unconfigured searches return an empty page; unconfigured works and
    /// editions return `NotFound`.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Response Configuration
    // =========================================================================

    /// Body returned by any search without a specific response.
    pub async fn set_search_response(&self, body: Value) {
        *self.default_search.write().await = Some(body);
    }

    /// Body returned for searches matching exactly these fields.
    pub async fn add_search_response(
        &self,
        title: Option<&str>,
        author: Option<&str>,
        subject: Option<&str>,
        body: Value,
    ) {
        self.search_responses.write().await.insert(
            (
                title.map(str::to_string),
                author.map(str::to_string),
                subject.map(str::to_string),
            ),
            body,
        );
    }

    /// Add a work document.
    pub async fn add_work(&self, key: &str, work: Value) {
        self.works.write().await.insert(key.to_string(), work);
    }

    /// Add an editions listing.
    pub async fn add_editions(&self, key: &str, editions: Value) {
        self.editions.write().await.insert(key.to_string(), editions);
    }

    // =========================================================================
    // Failure Injection
    // =========================================================================

    /// Make every search fail as if the service were unreachable.
    pub async fn set_fail_searches(&self, fail: bool) {
        *self.fail_searches.write().await = fail;
    }

    /// Make every editions call fail.
    pub async fn set_fail_editions(&self, fail: bool) {
        *self.fail_editions.write().await = fail;
    }

    /// Configure the next call to fail with the given error.
    pub async fn set_next_error(&self, error: CatalogError) {
        *self.next_error.write().await = Some(error);
    }

    /// Delay every call by `delay`.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    // =========================================================================
    // Call Recording
    // =========================================================================

    /// Get all recorded calls.
    pub async fn recorded_calls(&self) -> Vec<RecordedCatalogCall> {
        self.calls.read().await.clone()
    }

    /// Number of search calls that reached the transport.
    pub async fn search_count(&self) -> usize {
        self.calls
            .read()
            .await
            .iter()
            .filter(|c| matches!(c, RecordedCatalogCall::Search(_)))
            .count()
    }

    /// Get the number of calls performed.
    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }

    /// Clear recorded calls.
    pub async fn clear_recorded(&self) {
        self.calls.write().await.clear();
    }

    /// Record a call, apply latency, and take any injected error.
    async fn enter(&self, call: RecordedCatalogCall) -> Result<(), CatalogError> {
        self.calls.write().await.push(call);

        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match self.next_error.write().await.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn unreachable_error() -> CatalogError {
    CatalogError::ApiError {
        status: 503,
        message: "mock catalog unavailable".to_string(),
    }
}

#[async_trait]
impl CatalogApi for MockCatalogApi {
    async fn search(&self, query: &SearchQuery) -> Result<Value, CatalogError> {
        self.enter(RecordedCatalogCall::Search(query.clone())).await?;

        if *self.fail_searches.read().await {
            return Err(unreachable_error());
        }

        let lookup = (
            query.title.clone(),
            query.author.clone(),
            query.subject.clone(),
        );
        if let Some(body) = self.search_responses.read().await.get(&lookup) {
            return Ok(body.clone());
        }

        Ok(self
            .default_search
            .read()
            .await
            .clone()
            .unwrap_or_else(|| json!({"numFound": 0, "start": 0, "docs": []})))
    }

    async fn get_work(&self, work_key: &str) -> Result<Value, CatalogError> {
        self.enter(RecordedCatalogCall::GetWork {
            key: work_key.to_string(),
        })
        .await?;

        self.works
            .read()
            .await
            .get(work_key)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("{}.json", work_key)))
    }

    async fn get_editions(&self, work_key: &str) -> Result<Value, CatalogError> {
        self.enter(RecordedCatalogCall::GetEditions {
            key: work_key.to_string(),
        })
        .await?;

        if *self.fail_editions.read().await {
            return Err(unreachable_error());
        }

        self.editions
            .read()
            .await
            .get(work_key)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("{}/editions.json", work_key)))
    }
}
