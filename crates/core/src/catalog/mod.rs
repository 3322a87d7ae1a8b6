//! Open Library catalog access.
//!
//! [`CatalogClient`] is the only component that talks to the catalog
//! service. It builds requests, caches search pages for a few minutes,
//! bounds every call with a timeout, degrades to a built-in book list when
//! search fails, and normalizes the loosely shaped responses into
//! [`BookSummary`] and [`BookDetail`] records.

mod api;
mod cache;
mod client;
mod fallback;
mod format;
mod normalize;
mod popular;
mod types;

pub use api::{CatalogApi, OpenLibraryApi, SearchQuery, SEARCH_FIELDS};
pub use cache::{search_cache_key, ResponseCache, DEFAULT_CACHE_TTL};
pub use client::{canonical_work_key, CatalogClient};
pub use fallback::{fallback_books, fallback_result};
pub use format::{build_cover_url, format_author_list, DEFAULT_COVERS_URL};
pub use normalize::{AuthorRef, KeyRef, MAX_SUBJECTS, UNKNOWN_AUTHOR, UNTITLED};
pub use popular::{is_popular_candidate, COVER_ID_CEILING, RELAXED_COVER_ID_CEILING};
pub use types::*;

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur when talking to the catalog service.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed (connection, TLS, body read).
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The call did not finish in time.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Resource not found (404).
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Body was not JSON.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Identifier has no usable work id.
    #[error("Invalid work identifier: {0:?}")]
    InvalidIdentifier(String),

    /// Detail page data could not be loaded.
    #[error("Failed to fetch details for {key}")]
    DetailsUnavailable {
        key: String,
        #[source]
        source: Box<CatalogError>,
    },

    /// Client could not be constructed.
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

impl CatalogError {
    /// Timeouts and connection failures, as opposed to answers from the
    /// service.
    pub fn is_transient(&self) -> bool {
        match self {
            CatalogError::HttpError(_) | CatalogError::Timeout(_) => true,
            CatalogError::DetailsUnavailable { source, .. } => source.is_transient(),
            _ => false,
        }
    }
}
