use serde::{Deserialize, Serialize};

/// Root configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Catalog service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Catalog API base URL (default: https://openlibrary.org)
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Covers host used to build image URLs
    #[serde(default = "default_covers_url")]
    pub covers_url: String,
    /// Per-request timeout in seconds (default: 8)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// User-Agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Maximum records kept from one search page (default: 15)
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            covers_url: default_covers_url(),
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
            max_results: default_max_results(),
        }
    }
}

fn default_base_url() -> String {
    "https://openlibrary.org".to_string()
}

fn default_covers_url() -> String {
    crate::catalog::DEFAULT_COVERS_URL.to_string()
}

fn default_timeout() -> u64 {
    8
}

fn default_user_agent() -> String {
    format!(
        "Bookshelf/{} ( https://github.com/lelloman/bookshelf )",
        env!("CARGO_PKG_VERSION")
    )
}

fn default_max_results() -> usize {
    15
}

/// Search cache configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Entry lifetime in seconds (default: 300)
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl(),
        }
    }
}

fn default_ttl() -> u64 {
    300
}
