pub mod catalog;
pub mod config;
pub mod metrics;
pub mod testing;

pub use catalog::{
    build_cover_url, canonical_work_key, format_author_list, BookDetail, BookSummary,
    CatalogApi, CatalogClient, CatalogError, CoverSize, OpenLibraryApi, SearchCriteria,
    SearchResult, DEFAULT_POPULAR_COUNT, DEFAULT_SEARCH_LIMIT,
};
pub use config::{
    load_config, load_config_from_str, load_config_or_default, validate_config, CacheConfig,
    CatalogConfig, Config, ConfigError,
};
