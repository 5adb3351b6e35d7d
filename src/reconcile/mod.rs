//! Consistency filter between record sets and the image directory
//!
//! Reconciliation keeps only the records whose referenced image file was
//! actually materialized on disk. The original record file is never touched;
//! the reduced set is written to a sibling file. Filtering preserves input
//! order and is idempotent.

use crate::record::{
    asset_file_name, load_records, save_records, Record, CLEAN_RECORD_FILE, RECORD_FILE,
};
use crate::HarvestError;
use std::fs;
use std::path::Path;

/// Per-collection reconciliation summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub total: usize,
    pub kept: usize,
}

/// Filters a record set against the asset directory
///
/// A record survives when its image URL starts with the media prefix and the
/// derived file name exists in `asset_dir`. Records without an image URL are
/// dropped immediately; the extractor never produces them, but hand-edited
/// files can.
pub fn reconcile(records: &[Record], asset_dir: &Path, prefix: &str) -> Vec<Record> {
    records
        .iter()
        .filter(|record| {
            if record.image_url.is_empty() {
                tracing::info!(
                    "Entry '{}' has no image URL, entry will be removed",
                    record.name
                );
                return false;
            }

            let file_name = match asset_file_name(&record.image_url, prefix) {
                Some(file_name) => file_name,
                None => {
                    tracing::info!(
                        "URL does not match media prefix: {}, entry will be removed",
                        record.image_url
                    );
                    return false;
                }
            };

            let exists = asset_dir.join(&file_name).exists();
            if !exists {
                tracing::info!(
                    "Image file does not exist: {}, entry will be removed",
                    file_name
                );
            }
            exists
        })
        .cloned()
        .collect()
}

/// Reconciles one collection directory
///
/// Loads `data.json`, filters it against the image files in the same
/// directory, and writes the result to `data_clean.json`. Returns `None`
/// when the directory holds no record file.
pub fn clean_collection(dir: &Path, prefix: &str) -> Result<Option<ReconcileSummary>, HarvestError> {
    let record_path = dir.join(RECORD_FILE);
    if !record_path.exists() {
        return Ok(None);
    }

    let records = load_records(&record_path)?;
    let kept = reconcile(&records, dir, prefix);
    save_records(dir, CLEAN_RECORD_FILE, &kept)?;

    Ok(Some(ReconcileSummary {
        total: records.len(),
        kept: kept.len(),
    }))
}

/// Reconciles every collection directory under the data root
pub fn clean_all(root: &Path, prefix: &str) -> Result<(), HarvestError> {
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        match clean_collection(&path, prefix) {
            Ok(Some(summary)) => {
                tracing::info!(
                    "Reconciled {}: kept {}/{} records",
                    path.display(),
                    summary.kept,
                    summary.total
                );
            }
            Ok(None) => {
                tracing::debug!("No record file in {}", path.display());
            }
            Err(e) => {
                tracing::error!("Failed to reconcile {}: {}", path.display(), e);
            }
        }
    }

    Ok(())
}
