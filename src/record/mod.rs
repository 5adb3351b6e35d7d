//! Record data model and persistence
//!
//! A [`Record`] is one harvested person entry. Records are created once by the
//! detail extractor and are immutable afterwards; a collection's records are
//! persisted as a single JSON array in discovery order.

mod store;

pub use store::{
    discover_record_files, load_records, save_records, StoreError, CLEAN_RECORD_FILE, RECORD_FILE,
};

use serde::{Deserialize, Serialize};

/// One harvested person entry
///
/// The JSON field names match the on-disk format consumed by the cleaning and
/// download stages. Optional fields are omitted from the serialized form when
/// the source page did not supply them; they are never written as null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Absolute URL of the entry's primary image. The extractor only
    /// constructs a Record when this was resolvable; the empty-string default
    /// exists so that hand-edited files missing the field still deserialize
    /// and get dropped by reconciliation.
    #[serde(
        rename = "main_image_url",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub image_url: String,

    #[serde(rename = "person_name", default)]
    pub name: String,

    #[serde(rename = "birth_date", default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,

    #[serde(rename = "death_date", default, skip_serializing_if = "Option::is_none")]
    pub death_date: Option<String>,

    #[serde(rename = "maiden_name", default, skip_serializing_if = "Option::is_none")]
    pub maiden_name: Option<String>,

    #[serde(rename = "extra_names", default, skip_serializing_if = "Option::is_none")]
    pub extra_names: Option<String>,

    #[serde(rename = "patronymic", default, skip_serializing_if = "Option::is_none")]
    pub patronymic: Option<String>,

    #[serde(rename = "nationality", default, skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,

    #[serde(rename = "cemetery_info", default, skip_serializing_if = "Option::is_none")]
    pub cemetery_info: Option<String>,
}

/// Derives the flat destination file name for an asset URL
///
/// Strips the configured media prefix and collapses the remaining path
/// separators into underscores, so distinct path suffixes map to distinct
/// file names. Returns `None` when the URL does not start with the prefix
/// or nothing remains after stripping it.
///
/// # Example
///
/// ```
/// use memoria::asset_file_name;
///
/// let name = asset_file_name("https://media.example.com/a/b/c.jpg", "https://media.example.com/");
/// assert_eq!(name.as_deref(), Some("a_b_c.jpg"));
/// ```
pub fn asset_file_name(url: &str, prefix: &str) -> Option<String> {
    url.strip_prefix(prefix)
        .map(|rest| rest.replace('/', "_"))
        .filter(|name| !name.is_empty())
}

/// Sanitizes a collection display name for filesystem use
///
/// Keeps ASCII alphanumerics, spaces and dots, drops everything else, and
/// trims surrounding whitespace.
pub fn sanitize_collection_name(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ' || *c == '.')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Directory name for a collection: the sanitized display name with spaces
/// replaced by underscores
pub fn collection_dir_name(display_name: &str) -> String {
    sanitize_collection_name(display_name).replace(' ', "_")
}
