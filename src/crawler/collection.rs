//! Collection crawl orchestration
//!
//! For one collection id: resolve the display name from the overview page,
//! compute the advisory total, walk the listing pages, extract a record per
//! qualifying row, and persist the accumulated set once at the end. A single
//! bad row never aborts the crawl; a persistence failure does.

use crate::config::Config;
use crate::crawler::extractor::{extract_record, Extraction};
use crate::crawler::fetcher::fetch_html;
use crate::crawler::pager::{PageWalker, RawRow};
use crate::crawler::politeness_delay;
use crate::record::{collection_dir_name, sanitize_collection_name, save_records, RECORD_FILE};
use crate::{HarvestError, Record};
use reqwest::Client;
use scraper::{Html, Selector};
use std::path::{Path, PathBuf};

/// Result of one collection crawl
#[derive(Debug)]
pub struct CrawlOutcome {
    pub collection: u64,
    pub name: String,
    pub records: usize,
    pub path: PathBuf,
}

/// Outcome of processing one listing row
enum RowOutcome {
    /// The detail page qualified and a record was extracted
    Harvested(Box<Record>),

    /// The row-level marker said the entry has no image; detail fetch skipped
    SkippedImageless(String),

    /// The detail page's own gates excluded the entry
    Excluded(String),

    /// The row could not be processed; the walk continues
    Failed { link: String, error: String },
}

/// Crawls every configured collection sequentially
///
/// A failed collection is logged and the remaining ones still run.
pub async fn crawl_collections(config: &Config) -> Result<(), HarvestError> {
    let client = crate::crawler::build_http_client()?;

    for &collection in &config.collections {
        match crawl_collection(&client, config, collection).await {
            Ok(outcome) => {
                tracing::info!(
                    "Collection {} ({}): {} records saved to {}",
                    outcome.collection,
                    outcome.name,
                    outcome.records,
                    outcome.path.display()
                );
            }
            Err(e) => {
                tracing::error!("Crawl of collection {} failed: {}", collection, e);
            }
        }
    }

    Ok(())
}

/// Crawls one collection and persists its record set
///
/// # Arguments
///
/// * `client` - The shared HTTP client
/// * `config` - The full configuration
/// * `collection` - The collection id to crawl
///
/// # Returns
///
/// * `Ok(CrawlOutcome)` - The persisted record set's summary
/// * `Err(HarvestError)` - A listing fetch or the final persistence failed
pub async fn crawl_collection(
    client: &Client,
    config: &Config,
    collection: u64,
) -> Result<CrawlOutcome, HarvestError> {
    let name = resolve_collection_name(client, config, collection).await;
    let estimate = fetch_total_estimate(client, config, collection).await;

    tracing::info!(
        "Crawling collection: {}, id: {}, total records: {}",
        name,
        collection,
        estimate.map_or_else(|| "?".to_string(), |n| n.to_string())
    );

    let mut records: Vec<Record> = Vec::new();
    let mut walker = PageWalker::new(client, &config.site, collection);

    loop {
        let offset = walker.current_offset().unwrap_or(0);
        let rows = match walker.next_rows().await? {
            Some(rows) => rows,
            None => break,
        };

        tracing::info!(
            "Crawling {} rows at offset {}/{} for collection id {}",
            rows.len(),
            offset,
            estimate.map_or_else(|| "?".to_string(), |n| n.to_string()),
            collection
        );

        for row in rows {
            match process_row(client, config, &row).await {
                RowOutcome::Harvested(record) => {
                    tracing::debug!("Harvested record for {}", record.name);
                    records.push(*record);
                }
                RowOutcome::SkippedImageless(link) => {
                    tracing::debug!("Skipping {} because no image found", link);
                }
                RowOutcome::Excluded(link) => {
                    tracing::debug!("Excluded {} (no retrievable image)", link);
                }
                RowOutcome::Failed { link, error } => {
                    tracing::warn!("Failed to process row {}: {}", link, error);
                }
            }
        }
    }

    let dir = Path::new(&config.output.data_root).join(collection_dir_name(&name));
    let path = save_records(&dir, RECORD_FILE, &records)?;

    Ok(CrawlOutcome {
        collection,
        name,
        records: records.len(),
        path,
    })
}

/// Processes one listing row: gate, fetch the detail page, extract
async fn process_row(client: &Client, config: &Config, row: &RawRow) -> RowOutcome {
    let detail_path = match &row.detail_path {
        Some(path) => path,
        None => {
            return RowOutcome::Failed {
                link: "<row without detail link>".to_string(),
                error: "listing row has no detail link".to_string(),
            }
        }
    };

    // Listing-level gate: the detail page would exclude this entry anyway,
    // so save the round trip.
    if row.imageless {
        return RowOutcome::SkippedImageless(detail_path.clone());
    }

    let detail_url = resolve_detail_url(&config.site.page_base, detail_path);
    let body = match fetch_html(client, &detail_url, &[]).await {
        Ok(body) => body,
        Err(e) => {
            return RowOutcome::Failed {
                link: detail_path.clone(),
                error: e.to_string(),
            }
        }
    };

    let outcome = match extract_record(&body) {
        Extraction::Record(record) => RowOutcome::Harvested(Box::new(record)),
        Extraction::Excluded => RowOutcome::Excluded(detail_path.clone()),
    };

    // Politeness pause after every detail-page fetch
    politeness_delay(config.crawler.detail_delay_ms).await;

    outcome
}

/// Joins a relative detail link onto the page base; absolute links pass through
fn resolve_detail_url(page_base: &str, detail_path: &str) -> String {
    if detail_path.starts_with("http://") || detail_path.starts_with("https://") {
        detail_path.to_string()
    } else {
        format!("{}{}", page_base.trim_end_matches('/'), detail_path)
    }
}

/// Resolves a collection's display name from its overview page title
///
/// Falls back to `collection <id>` when the page or its title is unavailable;
/// name resolution is not worth failing the crawl over.
async fn resolve_collection_name(client: &Client, config: &Config, collection: u64) -> String {
    let query = [("id", collection.to_string())];
    match fetch_html(client, &config.site.collection_url, &query).await {
        Ok(body) => match page_title(&body) {
            Some(title) => {
                let name = sanitize_collection_name(&title);
                if name.is_empty() {
                    format!("collection {}", collection)
                } else {
                    name
                }
            }
            None => {
                tracing::warn!("Overview page for collection {} has no title", collection);
                format!("collection {}", collection)
            }
        },
        Err(e) => {
            tracing::warn!("Failed to resolve name for collection {}: {}", collection, e);
            format!("collection {}", collection)
        }
    }
}

/// Fetches the listing page at offset 0 and reads the advisory estimate
///
/// Any failure degrades to the unknown state; the estimate never affects
/// the walk.
async fn fetch_total_estimate(client: &Client, config: &Config, collection: u64) -> Option<u64> {
    let query = crate::crawler::pager::ListingQuery {
        collection,
        sort_order: config.site.sort_order,
        start: 0,
    };
    match fetch_html(client, &config.site.listing_url, &query.params()).await {
        Ok(body) => crate::crawler::pager::parse_total_estimate(&body),
        Err(e) => {
            tracing::warn!(
                "Failed to fetch estimate page for collection {}: {}",
                collection,
                e
            );
            None
        }
    }
}

fn page_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let title_sel = Selector::parse("title").ok()?;

    document
        .select(&title_sel)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|title| !title.is_empty())
}
