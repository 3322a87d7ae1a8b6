use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - catalog and covers URLs are http(s)
/// - timeout, result cap and cache TTL are not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    for (name, url) in [
        ("catalog.base_url", &config.catalog.base_url),
        ("catalog.covers_url", &config.catalog.covers_url),
    ] {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "{} must be an http(s) URL, got {:?}",
                name, url
            )));
        }
    }

    if config.catalog.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "catalog.timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.catalog.max_results == 0 {
        return Err(ConfigError::ValidationError(
            "catalog.max_results cannot be 0".to_string(),
        ));
    }

    // A zero TTL would make every entry stale on arrival.
    if config.cache.ttl_secs == 0 {
        return Err(ConfigError::ValidationError(
            "cache.ttl_secs cannot be 0".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CacheConfig, CatalogConfig};

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_bad_url_fails() {
        let config = Config {
            catalog: CatalogConfig {
                base_url: "openlibrary.org".to_string(),
                ..Default::default()
            },
            cache: CacheConfig::default(),
        };
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        assert!(err.to_string().contains("catalog.base_url"));
    }

    #[test]
    fn test_validate_zero_timeout_fails() {
        let config = Config {
            catalog: CatalogConfig {
                timeout_secs: 0,
                ..Default::default()
            },
            cache: CacheConfig::default(),
        };
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validate_zero_ttl_fails() {
        let config = Config {
            catalog: CatalogConfig::default(),
            cache: CacheConfig { ttl_secs: 0 },
        };
        assert!(validate_config(&config).is_err());
    }
}
