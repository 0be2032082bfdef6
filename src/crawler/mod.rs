//! Crawler module for book page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with home-page redirect detection
//! - Book detail and category listing parsing
//! - Text and cover downloads
//! - Overall crawl coordination and failure policy

mod archiver;
mod coordinator;
mod fetcher;
mod parser;
mod source;

pub use archiver::{sanitize_filename, BookArchiver};
pub use coordinator::{run_crawl, CrawlDriver};
pub use fetcher::{build_http_client, check_for_redirect, Fetcher, PageResponse, RawResponse};
pub use parser::{
    image_extension, parse_book_html, parse_book_page, parse_listing_html, parse_listing_page,
    split_title_author, BookMetadata, ListingEntry, TITLE_AUTHOR_DELIMITER,
};
pub use source::{listing_page_url, BookTarget, UnitSource};

use crate::config::Config;
use crate::output::CrawlSummary;
use crate::TululuError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client for the configured site
/// 2. Walk the units produced by `source`
/// 3. Fetch, parse and archive each book, skipping failed units
/// 4. Write the JSON manifest
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - Crawl completed (possibly with skipped units)
/// * `Err(TululuError)` - Configuration or local I/O failure
pub async fn crawl(config: Config, source: UnitSource) -> Result<CrawlSummary, TululuError> {
    run_crawl(config, source).await
}
