//! Testing utilities and a mock catalog transport.
//!
//! # Example
//!
//! ```rust,ignore
//! use bookshelf_core::testing::{fixtures, MockCatalogApi};
//!
//! let api = Arc::new(MockCatalogApi::new());
//! api.set_search_response(fixtures::search_body(vec![fixtures::search_doc("OL1W", "Dune", 100)])).await;
//! let client = CatalogClient::with_api(api.clone(), &CatalogConfig::default(), &CacheConfig::default());
//! ```

mod mock_catalog_api;

pub use mock_catalog_api::{MockCatalogApi, RecordedCatalogCall};

/// Test fixtures shaped like catalog responses.
pub mod fixtures {
    use serde_json::{json, Value};

    /// A search document with a title, one author, a cover and a year.
    pub fn search_doc(id: &str, title: &str, cover_id: i64) -> Value {
        json!({
            "key": format!("/works/{}", id),
            "title": title,
            "author_name": [format!("Author of {}", title)],
            "first_publish_year": 1990,
            "cover_i": cover_id,
            "publisher": ["Test House"],
            "isbn": ["9780000000001"],
            "language": ["eng"],
            "subject": ["Fiction"],
        })
    }

    /// A `/search.json` body wrapping `docs`.
    pub fn search_body(docs: Vec<Value>) -> Value {
        json!({
            "numFound": docs.len(),
            "start": 0,
            "numFoundExact": true,
            "docs": docs,
        })
    }

    /// A work document in the shape returned by `/works/{id}.json`.
    pub fn work(id: &str, title: &str) -> Value {
        json!({
            "key": format!("/works/{}", id),
            "title": title,
            "authors": [
                {"author": {"key": "/authors/OL1A"}, "type": {"key": "/type/author_role"}}
            ],
            "description": {"type": "/type/text", "value": format!("About {}.", title)},
            "subjects": ["Fiction", "Adventure"],
            "covers": [12345],
            "first_publish_date": "March 3, 1965",
        })
    }

    /// An editions listing with a single entry.
    pub fn editions(publisher: &str, isbn_13: &str) -> Value {
        json!({
            "size": 3,
            "entries": [{
                "publishers": [publisher],
                "isbn_13": [isbn_13],
                "languages": [{"key": "/languages/eng"}],
            }]
        })
    }
}
