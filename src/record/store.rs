//! On-disk record store
//!
//! One JSON file per collection, a single pretty-printed array of record
//! objects in crawl discovery order. The cleaned variant produced by
//! reconciliation lives next to the original under a distinct name and never
//! overwrites it.

use crate::record::Record;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Well-known file name of a persisted record set
pub const RECORD_FILE: &str = "data.json";

/// File name of the reconciled record set written next to the original
pub const CLEAN_RECORD_FILE: &str = "data_clean.json";

/// Record store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persists a record set under `dir/file_name`
///
/// Creates the directory if needed and writes the full array in one go.
/// Returns the path of the written file.
pub fn save_records(dir: &Path, file_name: &str, records: &[Record]) -> Result<PathBuf, StoreError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    let json = serde_json::to_string_pretty(records)?;
    fs::write(&path, json)?;
    Ok(path)
}

/// Loads a record set from a JSON file
pub fn load_records(path: &Path) -> Result<Vec<Record>, StoreError> {
    let content = fs::read_to_string(path)?;
    let records = serde_json::from_str(&content)?;
    Ok(records)
}

/// Finds all persisted record sets under a root directory
///
/// Walks the tree recursively and collects every file named [`RECORD_FILE`].
/// Unreadable directories are logged and skipped rather than aborting the scan.
pub fn discover_record_files(root: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    collect_record_files(root, &mut found);
    found.sort();
    found
}

fn collect_record_files(dir: &Path, found: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Skipping unreadable directory {}: {}", dir.display(), e);
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_record_files(&path, found);
        } else if path.file_name().and_then(|n| n.to_str()) == Some(RECORD_FILE) {
            found.push(path);
        }
    }
}
