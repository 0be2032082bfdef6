//! Run statistics
//!
//! This module collects what happened during a crawl and prints a short
//! report when it finishes.

use crate::state::{FailureKind, UnitState};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// A unit of work that was dropped after a recoverable failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedUnit {
    /// Human-readable unit label, e.g. `book 6` or `page 3`
    pub unit: String,
    /// URL that failed to fetch or parse
    pub url: String,
    /// State the unit was in when it failed
    pub state: UnitState,
    pub kind: FailureKind,
    pub message: String,
}

/// Summary of one crawl run
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    /// Number of books recorded in the manifest
    pub records: usize,
    /// Listing pages fetched and parsed (category crawls only)
    pub listing_pages: usize,
    /// Number of connection back-off pauses taken
    pub pauses: u32,
    pub skipped: Vec<SkippedUnit>,
    pub manifest_path: Option<PathBuf>,
}

impl CrawlSummary {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            records: 0,
            listing_pages: 0,
            pauses: 0,
            skipped: Vec::new(),
            manifest_path: None,
        }
    }

    /// Counts skipped units per failure kind
    pub fn skipped_by_kind(&self) -> BTreeMap<FailureKind, usize> {
        let mut counts = BTreeMap::new();
        for unit in &self.skipped {
            *counts.entry(unit.kind).or_insert(0) += 1;
        }
        counts
    }

    /// Wall-clock duration in seconds, once the run has finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }
}

impl Default for CrawlSummary {
    fn default() -> Self {
        Self::new()
    }
}

/// Prints the run summary to stdout
pub fn print_summary(summary: &CrawlSummary) {
    println!("=== Crawl Summary ===\n");

    println!("Overview:");
    println!("  Books recorded: {}", summary.records);
    if summary.listing_pages > 0 {
        println!("  Listing pages parsed: {}", summary.listing_pages);
    }
    println!("  Units skipped: {}", summary.skipped.len());
    println!("  Connection pauses: {}", summary.pauses);
    if let Some(seconds) = summary.duration_seconds() {
        println!("  Duration: {}s", seconds);
    }
    println!();

    if !summary.skipped.is_empty() {
        println!("Skipped by Failure:");
        for (kind, count) in summary.skipped_by_kind() {
            println!("  {}: {}", kind, count);
        }
        println!();

        println!("Skipped Units:");
        for skipped in &summary.skipped {
            println!(
                "  {} ({} while {}): {}",
                skipped.unit, skipped.kind, skipped.state, skipped.url
            );
        }
        println!();
    }

    if let Some(path) = &summary.manifest_path {
        println!("Manifest: {}", path.display());
    }
}
