//! Crawl stage: pagination, extraction and orchestration
//!
//! This module contains the first pipeline stage:
//! - HTTP fetching for listing and detail pages
//! - The pagination walker over a collection's listing
//! - Detail-page record extraction with its image gates
//! - Per-collection orchestration and persistence

mod collection;
mod extractor;
mod fetcher;
mod pager;

pub use collection::{crawl_collection, crawl_collections, CrawlOutcome};
pub use extractor::{extract_record, Extraction};
pub use fetcher::{build_http_client, fetch_bytes, fetch_html};
pub use pager::{parse_listing, parse_total_estimate, ListingPage, ListingQuery, PageWalker, RawRow};

use rand::Rng;
use std::time::Duration;

/// Sleeps for a uniformly random duration within the given millisecond range
///
/// This is the politeness pause between successive requests of one sequential
/// task; it is the pipeline's only throttling mechanism.
pub async fn politeness_delay(range_ms: [u64; 2]) {
    let millis = rand::thread_rng().gen_range(range_ms[0]..=range_ms[1]);
    tokio::time::sleep(Duration::from_millis(millis)).await;
}
