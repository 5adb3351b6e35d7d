use crate::config::types::Config;
use crate::ConfigError;
use url::Url;

/// Validates a parsed configuration
///
/// Checks that the site endpoints are absolute URLs, that delay ranges are
/// ordered, and that the downloader concurrency bound is at least 1.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_url(&config.site.listing_url)?;
    validate_url(&config.site.collection_url)?;
    validate_url(&config.site.page_base)?;
    validate_url(&config.site.media_prefix)?;

    validate_delay_range("crawler.detail-delay-ms", config.crawler.detail_delay_ms)?;
    validate_delay_range("crawler.download-delay-ms", config.crawler.download_delay_ms)?;

    if config.crawler.max_concurrent_sets == 0 {
        return Err(ConfigError::Validation(
            "crawler.max-concurrent-sets must be at least 1".to_string(),
        ));
    }

    if config.output.data_root.is_empty() {
        return Err(ConfigError::Validation(
            "output.data-root must not be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_url(raw: &str) -> Result<(), ConfigError> {
    let url = Url::parse(raw).map_err(|_| ConfigError::InvalidUrl(raw.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        _ => Err(ConfigError::InvalidUrl(raw.to_string())),
    }
}

fn validate_delay_range(key: &str, range: [u64; 2]) -> Result<(), ConfigError> {
    if range[0] > range[1] {
        return Err(ConfigError::Validation(format!(
            "{} range is inverted: [{}, {}]",
            key, range[0], range[1]
        )));
    }
    Ok(())
}
