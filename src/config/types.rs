use serde::Deserialize;

/// Main configuration structure for Memoria
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub collections: Vec<u64>,
}

/// Upstream site endpoints and the media URL prefix
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Listing endpoint accepting collection id, sort order and offset
    #[serde(rename = "listing-url")]
    pub listing_url: String,

    /// Collection overview page, used to resolve the display name
    #[serde(rename = "collection-url")]
    pub collection_url: String,

    /// Base URL prepended to relative detail-page links found in listing rows
    #[serde(rename = "page-base")]
    pub page_base: String,

    /// URL prefix that all downloadable image URLs are expected to share
    #[serde(rename = "media-prefix")]
    pub media_prefix: String,

    /// Sort criterion passed to the listing endpoint (site default: 4,
    /// most recent death first)
    #[serde(rename = "sort-order", default = "default_sort_order")]
    pub sort_order: u32,
}

/// Crawler pacing configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Delay range in milliseconds imposed after each detail-page fetch
    #[serde(rename = "detail-delay-ms", default = "default_detail_delay")]
    pub detail_delay_ms: [u64; 2],

    /// Delay range in milliseconds imposed after each successful image download
    #[serde(rename = "download-delay-ms", default = "default_download_delay")]
    pub download_delay_ms: [u64; 2],

    /// Maximum number of record sets downloaded concurrently
    #[serde(rename = "max-concurrent-sets", default = "default_concurrent_sets")]
    pub max_concurrent_sets: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            detail_delay_ms: default_detail_delay(),
            download_delay_ms: default_download_delay(),
            max_concurrent_sets: default_concurrent_sets(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Root directory under which per-collection directories are created
    #[serde(rename = "data-root")]
    pub data_root: String,
}

fn default_sort_order() -> u32 {
    4
}

fn default_detail_delay() -> [u64; 2] {
    [500, 2500]
}

fn default_download_delay() -> [u64; 2] {
    [1000, 3000]
}

fn default_concurrent_sets() -> usize {
    4
}
