//! HTTP fetcher
//!
//! This module builds the shared HTTP client and issues the GET requests the
//! pipeline needs: HTML documents for listing/detail pages and raw bytes for
//! image downloads. Transport failures and non-success statuses are surfaced
//! as typed errors; callers decide whether a failure is fatal or skippable.

use crate::HarvestError;
use reqwest::Client;
use std::time::Duration;

/// Builds the HTTP client shared by all pipeline stages
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(concat!("memoria/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and returns the response body as text
///
/// Query parameters are passed separately so each call carries its own
/// immutable parameter set.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
/// * `query` - Query parameters appended to the URL
///
/// # Returns
///
/// * `Ok(String)` - The response body
/// * `Err(HarvestError)` - Transport failure or non-success status
pub async fn fetch_html(
    client: &Client,
    url: &str,
    query: &[(&str, String)],
) -> Result<String, HarvestError> {
    let response = client
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(|source| HarvestError::Http {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(HarvestError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|source| HarvestError::Http {
        url: url.to_string(),
        source,
    })
}

/// Fetches a URL and returns the raw response body
///
/// Used for image downloads; the bytes are written to disk verbatim.
pub async fn fetch_bytes(client: &Client, url: &str) -> Result<Vec<u8>, HarvestError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| HarvestError::Http {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(HarvestError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response
        .bytes()
        .await
        .map(|body| body.to_vec())
        .map_err(|source| HarvestError::Http {
            url: url.to_string(),
            source,
        })
}
