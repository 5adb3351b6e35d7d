//! Concurrent, idempotent asset downloader
//!
//! Discovers every persisted record set under the data root and downloads the
//! images it references. One task runs per record set, bounded by a worker
//! semaphore; within a task the items are strictly sequential
//! (fetch, write, politeness delay). A destination file that already exists
//! is skipped without a fetch, so a second run over unchanged data performs
//! no network traffic. All tasks are joined before this stage returns.

use crate::config::Config;
use crate::crawler::{build_http_client, fetch_bytes, politeness_delay};
use crate::record::{asset_file_name, discover_record_files, load_records};
use crate::HarvestError;
use reqwest::Client;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Aggregate counters over all download tasks
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DownloadStats {
    /// Assets fetched and written in this run
    pub fetched: usize,

    /// Assets skipped because the destination already existed
    pub skipped: usize,

    /// Assets whose fetch or write failed; logged and left for a later run
    pub failed: usize,
}

impl DownloadStats {
    fn merge(&mut self, other: DownloadStats) {
        self.fetched += other.fetched;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}

/// Downloads the referenced images of every record set under the data root
///
/// # Arguments
///
/// * `root` - The data root to scan for record files
/// * `config` - The full configuration (media prefix, pacing, concurrency)
///
/// # Returns
///
/// * `Ok(DownloadStats)` - Aggregate counters once every task has finished
/// * `Err(HarvestError)` - The HTTP client could not be built
pub async fn download_all(root: &Path, config: &Config) -> Result<DownloadStats, HarvestError> {
    let record_files = discover_record_files(root);
    tracing::info!(
        "Found {} record sets under {}",
        record_files.len(),
        root.display()
    );

    let client = build_http_client()?;
    let semaphore = Arc::new(Semaphore::new(config.crawler.max_concurrent_sets));
    let mut tasks = JoinSet::new();

    for record_path in record_files {
        let client = client.clone();
        let semaphore = semaphore.clone();
        let prefix = config.site.media_prefix.clone();
        let delay = config.crawler.download_delay_ms;

        tasks.spawn(async move {
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => return DownloadStats::default(),
            };
            download_record_set(&client, &record_path, &prefix, delay).await
        });
    }

    // Explicit join barrier: the stage is only complete once every record
    // set's task has run to the end of its sequence.
    let mut total = DownloadStats::default();
    while let Some(result) = tasks.join_next().await {
        match result {
            Ok(stats) => total.merge(stats),
            Err(e) => tracing::error!("Download task failed: {}", e),
        }
    }

    tracing::info!(
        "Download finished: {} fetched, {} skipped, {} failed",
        total.fetched,
        total.skipped,
        total.failed
    );

    Ok(total)
}

/// Downloads the missing assets of one record set, in stored order
async fn download_record_set(
    client: &Client,
    record_path: &Path,
    prefix: &str,
    delay_ms: [u64; 2],
) -> DownloadStats {
    let mut stats = DownloadStats::default();

    let records = match load_records(record_path) {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!("Failed to load {}: {}", record_path.display(), e);
            return stats;
        }
    };

    let dir = record_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let total = records.len();

    for (index, record) in records.iter().enumerate() {
        let file_name = match asset_file_name(&record.image_url, prefix) {
            Some(file_name) => file_name,
            None => {
                tracing::debug!(
                    "Skipping non-conforming image URL: {}",
                    record.image_url
                );
                continue;
            }
        };

        let destination = dir.join(&file_name);
        if destination.exists() {
            // Idempotent by presence; a prior run already wrote this file
            stats.skipped += 1;
            continue;
        }

        tracing::info!("Downloading {}/{}: {}", index + 1, total, file_name);
        match fetch_bytes(client, &record.image_url).await {
            Ok(body) => match fs::write(&destination, &body) {
                Ok(()) => {
                    stats.fetched += 1;
                    // Politeness pause before the next item of this set
                    politeness_delay(delay_ms).await;
                }
                Err(e) => {
                    tracing::warn!("Failed to write {}: {}", destination.display(), e);
                    stats.failed += 1;
                }
            },
            Err(e) => {
                tracing::warn!("Failed to download {}: {}", record.image_url, e);
                stats.failed += 1;
            }
        }
    }

    stats
}
