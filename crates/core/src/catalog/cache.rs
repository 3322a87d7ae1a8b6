//! Short-lived in-memory response cache.

use std::collections::HashMap;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

use super::types::SearchCriteria;
use crate::metrics;

/// Default lifetime of a cache entry.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
}

/// TTL cache keyed by request parameters.
///
/// Entries are never evicted; a stale entry is ignored on read and replaced
/// by the next insert for the same key.
#[derive(Debug)]
pub struct ResponseCache<V> {
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    ttl: Duration,
}

impl<V: Clone> ResponseCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Value stored under `key` if it is younger than the TTL.
    pub async fn get(&self, key: &str) -> Option<V> {
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => {
                metrics::CACHE_LOOKUPS.with_label_values(&["hit"]).inc();
                debug!("Cache hit for {}", key);
                Some(entry.value.clone())
            }
            Some(_) => {
                metrics::CACHE_LOOKUPS.with_label_values(&["expired"]).inc();
                debug!("Cache entry expired for {}", key);
                None
            }
            None => {
                metrics::CACHE_LOOKUPS.with_label_values(&["miss"]).inc();
                None
            }
        }
    }

    /// Store `value` under `key`, stamped with the current time.
    pub async fn insert(&self, key: String, value: V) {
        self.entries.write().await.insert(
            key,
            CacheEntry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    /// Number of stored entries, stale ones included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[derive(Serialize)]
struct SearchKey<'a> {
    title: Option<&'a str>,
    author: Option<&'a str>,
    subject: Option<&'a str>,
    limit: u32,
    offset: u32,
}

/// Deterministic cache key for a search request.
///
/// Strings are trimmed and blank ones treated as absent, so `" Dune "` and
/// `"Dune"` share an entry.
pub fn search_cache_key(criteria: &SearchCriteria, limit: u32, offset: u32) -> String {
    let key = SearchKey {
        title: criteria.title(),
        author: criteria.author(),
        subject: criteria.subject(),
        limit,
        offset,
    };
    // Serializing plain strings and integers cannot fail.
    serde_json::to_string(&key).unwrap_or_default()
}
