//! Reel-Crawler: a cached, idempotent movie ranking crawler
//!
//! This crate walks a movie ranking site three levels deep (ranking page,
//! movie page, actor page), caches every fetched page on disk, and records
//! movies, actors and their appearances in a relational store without
//! creating duplicates across repeated runs.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod storage;

use thiserror::Error;

pub use extract::ExtractionError;
pub use storage::StoreError;

/// Main error type for a crawl run
///
/// Every variant is fatal: the run stops at the first one and whatever was
/// already cached or stored stays valid for the next run.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Fetch failed: {0}")]
    FetchFailed(#[from] FetchError),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),
}

/// Errors raised while retrieving a page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error for {url}: {source}")]
    Request { url: String, source: reqwest::Error },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Cache IO error at {path}: {source}")]
    Cache {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
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

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for fetch operations
pub type FetchResult<T> = std::result::Result<T, FetchError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Crawler, CrawlSummary, PageCache};
pub use storage::{MemoryStore, SqliteStore, Store};
