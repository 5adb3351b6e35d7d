//! Memoria: a memorial-site record harvester
//!
//! This crate crawls paginated listing pages of a memorial site, follows each
//! qualifying entry to its detail page, extracts a structured record, and
//! persists the accumulated records per collection. Two follow-up stages
//! reconcile persisted records against downloaded image files and fetch the
//! missing images concurrently.

pub mod config;
pub mod crawler;
pub mod download;
pub mod reconcile;
pub mod record;

use thiserror::Error;

/// Main error type for Memoria operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Record store error: {0}")]
    Store(#[from] record::StoreError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Memoria operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use record::{asset_file_name, Record};
