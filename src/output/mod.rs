//! Output module for crawl results
//!
//! This module handles:
//! - The JSON manifest of recorded books
//! - Run statistics and the end-of-run report

mod manifest;
pub mod stats;

pub use manifest::{load_manifest, BookRecord, JsonManifest};
pub use stats::{print_summary, CrawlSummary, SkippedUnit};
