//! Crawl driver - main crawl orchestration logic
//!
//! This module contains the sequential crawl loop that coordinates:
//! - Producing units of work from an id range or category listing pages
//! - Fetching and parsing each book's detail page
//! - Archiving the book's text and cover
//! - Applying the skip/pause policy to recoverable failures
//! - Writing the final manifest

use crate::config::Config;
use crate::crawler::archiver::BookArchiver;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::{parse_book_page, parse_listing_page, ListingEntry};
use crate::crawler::source::{listing_page_url, BookTarget, UnitSource};
use crate::output::{BookRecord, CrawlSummary, JsonManifest, SkippedUnit};
use crate::state::{SkipPolicy, UnitState};
use crate::{FetchError, FetchResult, Result, TululuError};
use chrono::Utc;
use url::Url;

/// Main crawl driver structure
pub struct CrawlDriver {
    config: Config,
    fetcher: Fetcher,
    archiver: BookArchiver,
    base_url: Url,
    category_url: Url,
    manifest: JsonManifest,
    summary: CrawlSummary,
}

impl CrawlDriver {
    /// Creates a new driver instance
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlDriver)` - Successfully created driver
    /// * `Err(TululuError)` - The site URLs do not resolve or the HTTP client failed to build
    pub fn new(config: Config) -> Result<Self> {
        let base_url = Url::parse(&config.site.base_url)?;
        let category_url = base_url.join(&config.site.category_path)?;
        let text_endpoint = base_url.join(&config.site.text_endpoint)?;

        let fetcher = Fetcher::new(&config.site, &config.crawler)?;
        let archiver = BookArchiver::new(fetcher.clone(), text_endpoint);
        let manifest = JsonManifest::new(
            config.output.manifest_path(),
            config.output.incremental,
        );

        Ok(Self {
            config,
            fetcher,
            archiver,
            base_url,
            category_url,
            manifest,
            summary: CrawlSummary::new(),
        })
    }

    /// Runs the crawl over `source` and writes the manifest
    ///
    /// Per-unit failures (redirects, HTTP errors, connection errors,
    /// malformed pages) are logged and skipped. Only configuration problems
    /// and local I/O failures abort the run.
    pub async fn run(mut self, source: UnitSource) -> Result<CrawlSummary> {
        source
            .validate()
            .map_err(crate::ConfigError::Validation)?;

        tracing::info!("Starting crawl of {} from {}", source, self.base_url);

        let crawled = match source {
            UnitSource::IdRange { start, end } => self.crawl_ids(start, end).await,
            UnitSource::Category {
                start_page,
                end_page,
            } => self.crawl_category(start_page, end_page).await,
        };

        if let Err(err) = crawled {
            tracing::error!("Crawl aborted: {}", err);
            self.save_partial_manifest();
            return Err(err);
        }

        let manifest_path = self.manifest.write()?;

        self.summary.records = self.manifest.len();
        self.summary.finished_at = Some(Utc::now());
        self.summary.manifest_path = Some(manifest_path);

        tracing::info!(
            "Crawl completed: {} books recorded, {} units skipped",
            self.summary.records,
            self.summary.skipped.len()
        );

        Ok(self.summary)
    }

    /// Keeps the books recorded before an aborted run
    fn save_partial_manifest(&self) {
        match self.manifest.write() {
            Ok(path) => tracing::warn!(
                "Saved {} books recorded before the failure to {}",
                self.manifest.len(),
                path.display()
            ),
            Err(err) => tracing::error!("Failed to save partial manifest: {}", err),
        }
    }

    async fn crawl_ids(&mut self, start: u64, end: u64) -> Result<()> {
        for id in start..=end {
            let target = BookTarget::from_id(&self.base_url, id)?;
            self.process_book(target).await?;
        }
        Ok(())
    }

    async fn crawl_category(&mut self, start_page: u32, end_page: Option<u32>) -> Result<()> {
        let exhaustive = end_page.is_none();
        let max_failures = self.config.crawler.max_consecutive_listing_failures;
        let mut consecutive_failures = 0;
        let mut page = start_page;

        loop {
            if matches!(end_page, Some(end) if page > end) {
                break;
            }

            let unit = format!("page {}", page);
            let url = listing_page_url(&self.category_url, page)?;
            let mut state = UnitState::Fetching;

            let listing = self.fetch_listing(&url, &unit, &mut state).await;
            match listing {
                Ok(entries) => {
                    consecutive_failures = 0;
                    self.summary.listing_pages += 1;

                    if entries.is_empty() && exhaustive {
                        tracing::info!("Page {} lists no books, category exhausted", page);
                        break;
                    }
                    tracing::info!("Page {} lists {} books", page, entries.len());

                    for entry in entries {
                        match self.target_from_entry(&entry) {
                            Ok(target) => self.process_book(target).await?,
                            Err(err) => {
                                let label = format!("entry {}", entry.path);
                                self.handle_failure(label, UnitState::Parsing, err).await;
                            }
                        }
                    }
                }
                Err(FetchError::Redirected { .. } | FetchError::Http { status: 404, .. })
                    if exhaustive =>
                {
                    tracing::info!("Page {} is past the end, category exhausted", page);
                    break;
                }
                Err(err) => {
                    self.handle_failure(unit, state, err).await;
                    consecutive_failures += 1;

                    if exhaustive && consecutive_failures >= max_failures {
                        tracing::warn!(
                            "Giving up on the category after {} consecutive failed listing pages",
                            consecutive_failures
                        );
                        break;
                    }
                }
            }

            page = match page.checked_add(1) {
                Some(next) => next,
                None => break,
            };
        }

        Ok(())
    }

    async fn fetch_listing(
        &self,
        url: &Url,
        unit: &str,
        state: &mut UnitState,
    ) -> FetchResult<Vec<ListingEntry>> {
        let response = self.fetcher.fetch_page(url).await?;
        transition(state, UnitState::Parsing, unit);
        let entries = parse_listing_page(&response);
        transition(state, UnitState::Recorded, unit);
        Ok(entries)
    }

    fn target_from_entry(&self, entry: &ListingEntry) -> FetchResult<BookTarget> {
        let malformed = |message: String| FetchError::MalformedPage {
            url: entry.path.clone(),
            message,
        };

        let id = entry
            .book_id()
            .ok_or_else(|| malformed("listing entry has no book id".to_string()))?;
        let url = entry
            .book_url(&self.base_url)
            .map_err(|e| malformed(format!("listing entry does not resolve: {}", e)))?;

        Ok(BookTarget { id, url })
    }

    /// Processes a single book
    ///
    /// Fetching -> Parsing -> Archiving -> Recorded, or Skipped on a
    /// recoverable failure.
    async fn process_book(&mut self, target: BookTarget) -> Result<()> {
        let unit = format!("book {}", target.id);
        let mut state = UnitState::Fetching;

        let outcome = self.archive_book(&target, &unit, &mut state).await;
        match outcome {
            Ok(record) => {
                transition(&mut state, UnitState::Recorded, &unit);
                self.manifest.push(record)?;
            }
            Err(TululuError::Fetch(err)) => self.handle_failure(unit, state, err).await,
            Err(other) => return Err(other),
        }

        Ok(())
    }

    async fn archive_book(
        &self,
        target: &BookTarget,
        unit: &str,
        state: &mut UnitState,
    ) -> Result<BookRecord> {
        let page = self.fetcher.fetch_page(&target.url).await?;

        transition(state, UnitState::Parsing, unit);
        let metadata = parse_book_page(&page)?;
        tracing::info!("Title: {} | Author: {}", metadata.title, metadata.author);

        transition(state, UnitState::Archiving, unit);
        let output = &self.config.output;

        let book_src = if output.skip_text {
            output.placeholder.clone()
        } else {
            let display_name = format!("{}. {}", target.id, metadata.title);
            self.archiver
                .download_text(&target.id, &display_name, &output.books_dir())
                .await?
                .to_string_lossy()
                .into_owned()
        };

        let img_src = if output.skip_images {
            output.placeholder.clone()
        } else {
            let display_name = format!("{}{}", target.id, metadata.image_extension);
            self.archiver
                .download_image(&metadata.image_url, &display_name, &output.images_dir())
                .await?
                .to_string_lossy()
                .into_owned()
        };

        Ok(BookRecord::from_metadata(metadata, img_src, book_src))
    }

    /// Applies the failure policy to a dropped unit
    ///
    /// | Failure | Action |
    /// |---------|--------|
    /// | Redirected | warn, skip |
    /// | Http | warn, skip |
    /// | MalformedPage | warn, skip |
    /// | Connection | warn, skip, pause before the next unit |
    async fn handle_failure(&mut self, unit: String, state: UnitState, err: FetchError) {
        let kind = err.kind();
        tracing::warn!("Skipping {} while {}: {}", unit, state, err);
        let url = err.url().to_string();

        let mut skipped_state = state;
        transition(&mut skipped_state, UnitState::Skipped, &unit);

        self.summary.skipped.push(SkippedUnit {
            unit,
            url,
            state,
            kind,
            message: err.to_string(),
        });

        match kind.policy() {
            SkipPolicy::Skip => {}
            SkipPolicy::Pause => {
                let pause = self.config.crawler.connection_pause();
                tracing::warn!("Connection failure, pausing for {:?}", pause);
                tokio::time::sleep(pause).await;
                self.summary.pauses += 1;
            }
        }
    }
}

fn transition(state: &mut UnitState, next: UnitState, unit: &str) {
    debug_assert!(
        state.can_transition_to(next),
        "invalid transition {} -> {} for {}",
        state,
        next,
        unit
    );
    tracing::debug!("{}: {} -> {}", unit, state, next);
    *state = next;
}

/// Runs a complete crawl
///
/// # Example
///
/// ```no_run
/// use tululu_parser::config::Config;
/// use tululu_parser::crawler::{run_crawl, UnitSource};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let summary = run_crawl(Config::default(), UnitSource::IdRange { start: 1, end: 10 }).await?;
/// println!("{} books recorded", summary.records);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config, source: UnitSource) -> Result<CrawlSummary> {
    CrawlDriver::new(config)?.run(source).await
}
