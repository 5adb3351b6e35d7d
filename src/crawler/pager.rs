//! Pagination walker for collection listing pages
//!
//! The walker fetches listing pages for one collection, yields the raw rows
//! found on each page, and follows the page's own `rel=next` link to compute
//! the next offset. It terminates when a page has no rows or no next link;
//! the advisory total estimate never participates in that decision.

use crate::config::SiteConfig;
use crate::crawler::fetcher::fetch_html;
use crate::HarvestError;
use reqwest::Client;
use scraper::{Html, Selector};

/// Immutable query parameters for one listing-page request
#[derive(Debug, Clone, Copy)]
pub struct ListingQuery {
    pub collection: u64,
    pub sort_order: u32,
    pub start: u64,
}

impl ListingQuery {
    /// Renders the query as request parameters
    pub fn params(&self) -> [(&'static str, String); 3] {
        [
            ("cemetery_id", self.collection.to_string()),
            ("order", self.sort_order.to_string()),
            ("start", self.start.to_string()),
        ]
    }
}

/// One row of a listing page, reduced to what the orchestrator needs
#[derive(Debug, Clone)]
pub struct RawRow {
    /// Relative detail-page link, absent on malformed rows
    pub detail_path: Option<String>,

    /// Row-level "no image" marker: skip the detail fetch entirely
    pub imageless: bool,
}

/// A parsed listing page: its rows and the offset of the next page, if any
#[derive(Debug)]
pub struct ListingPage {
    pub rows: Vec<RawRow>,
    pub next_offset: Option<u64>,
}

/// Walks a collection's listing pages from offset 0
///
/// Call [`PageWalker::next_rows`] repeatedly; it returns `Ok(Some(rows))` for
/// each page and `Ok(None)` once the walk is finished. A page with rows but
/// no next link is the normal terminal page: its rows are still yielded, and
/// the following call returns `None`.
pub struct PageWalker<'a> {
    client: &'a Client,
    site: &'a SiteConfig,
    collection: u64,
    /// Offset of the next page to fetch; `None` once exhausted
    offset: Option<u64>,
}

impl<'a> PageWalker<'a> {
    pub fn new(client: &'a Client, site: &'a SiteConfig, collection: u64) -> Self {
        Self {
            client,
            site,
            collection,
            offset: Some(0),
        }
    }

    /// Offset of the page the next call will fetch, for progress reporting
    pub fn current_offset(&self) -> Option<u64> {
        self.offset
    }

    /// Fetches the next listing page and returns its rows
    ///
    /// # Returns
    ///
    /// * `Ok(Some(rows))` - The rows of the fetched page, in document order
    /// * `Ok(None)` - The walk is finished
    /// * `Err(HarvestError)` - The listing page itself could not be fetched
    pub async fn next_rows(&mut self) -> Result<Option<Vec<RawRow>>, HarvestError> {
        let start = match self.offset {
            Some(start) => start,
            None => return Ok(None),
        };

        let query = ListingQuery {
            collection: self.collection,
            sort_order: self.site.sort_order,
            start,
        };
        let body = fetch_html(self.client, &self.site.listing_url, &query.params()).await?;
        let page = parse_listing(&body);

        if page.rows.is_empty() {
            // Empty page means end of listing, not an error
            self.offset = None;
            return Ok(None);
        }

        self.offset = page.next_offset;
        Ok(Some(page.rows))
    }
}

/// Parses a listing page into rows and the next-page offset
pub fn parse_listing(html: &str) -> ListingPage {
    let document = Html::parse_document(html);
    let mut rows = Vec::new();

    if let (Ok(row_sel), Ok(link_sel), Ok(male_sel), Ok(female_sel)) = (
        Selector::parse("table tbody tr"),
        Selector::parse(".person-link"),
        Selector::parse(".no-image-male"),
        Selector::parse(".no-image-female"),
    ) {
        for row in document.select(&row_sel) {
            let detail_path = row
                .select(&link_sel)
                .next()
                .and_then(|a| a.value().attr("href"))
                .map(str::to_string);
            let imageless = row.select(&male_sel).next().is_some()
                || row.select(&female_sel).next().is_some();

            rows.push(RawRow {
                detail_path,
                imageless,
            });
        }
    }

    let next_offset = find_next_offset(&document);

    ListingPage { rows, next_offset }
}

/// Extracts the offset embedded in the page's `rel=next` link, if present
fn find_next_offset(document: &Html) -> Option<u64> {
    let next_sel = Selector::parse(r#"a[rel="next"]"#).ok()?;
    let href = document
        .select(&next_sel)
        .next()
        .and_then(|a| a.value().attr("href"))?;
    parse_start_param(href)
}

/// Parses the `start=` parameter out of a pagination href
fn parse_start_param(href: &str) -> Option<u64> {
    let tail = href.split("start=").nth(1)?;
    let digits: String = tail.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Computes the advisory total-record estimate from a listing page at offset 0
///
/// Reads the last pagination link: its href carries the final page's offset
/// and its label ends in a numeric range. The estimate is the offset plus the
/// length of that range. `Some(0)` when the page has no pagination links at
/// all; `None` when links exist but do not parse as expected.
///
/// The estimate is for progress reporting only and must never drive the
/// walk's termination.
pub fn parse_total_estimate(html: &str) -> Option<u64> {
    let document = Html::parse_document(html);
    let splits_sel = Selector::parse(".splits a").ok()?;

    let last_link = match document.select(&splits_sel).last() {
        Some(link) => link,
        None => return Some(0),
    };

    let href = last_link.value().attr("href")?;
    let last_start = parse_start_param(href)?;

    let label = last_link.text().collect::<String>();
    let range_end: u64 = label.rsplit('-').next()?.trim().parse().ok()?;

    range_end
        .checked_sub(last_start)
        .map(|records_on_last_page| last_start + records_on_last_page)
}
