//! Tululu-Parser: a resilient book catalogue scraper
//!
//! This crate fetches book detail pages from a book-cataloguing site, extracts
//! their metadata, downloads the text body and cover image of each book, and
//! collects the results into a JSON manifest. Books can be addressed by an
//! explicit id range or discovered by paging through a category listing.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;

use thiserror::Error;

/// Main error type for Tululu-Parser operations
#[derive(Debug, Error)]
pub enum TululuError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

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

/// Recoverable failures of a single unit of work (one book or one listing page)
///
/// This is a closed set: the crawl driver matches on it exhaustively to pick
/// the skip/pause policy for the unit.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The site answered by redirecting to its home page
    #[error("Redirected to the home page while fetching {url}")]
    Redirected { url: String },

    /// The site answered with a non-success status code
    #[error("HTTP {status} for {url}")]
    Http { url: String, status: u16 },

    /// DNS failure, timeout, connection reset, truncated body
    #[error("Connection error for {url}: {source}")]
    Connection {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The page is missing an element we rely on, or the heading is malformed
    #[error("Malformed page {url}: {message}")]
    MalformedPage { url: String, message: String },
}

/// Result type alias for Tululu-Parser operations
pub type Result<T> = std::result::Result<T, TululuError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for fetch/parse operations on a single unit
pub type FetchResult<T> = std::result::Result<T, FetchError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{BookMetadata, CrawlDriver, UnitSource};
pub use output::BookRecord;
pub use state::{FailureKind, SkipPolicy, UnitState};
