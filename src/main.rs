//! Tululu-Parser main entry point
//!
//! This is the command-line interface for the Tululu-Parser book scraper.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tululu_parser::config::{load_config_with_hash, validate, Config};
use tululu_parser::crawler::{crawl, UnitSource};
use tululu_parser::output::print_summary;
use tracing_subscriber::EnvFilter;

/// Tululu-Parser: a resilient book catalogue scraper
///
/// Downloads book texts and covers from the catalogue and writes a JSON
/// manifest describing every book it managed to fetch.
#[derive(Parser, Debug)]
#[command(name = "tululu-parser")]
#[command(version)]
#[command(about = "A resilient book catalogue scraper", long_about = None)]
struct Cli {
    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    /// Show what would be crawled without making any requests
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl books by an inclusive range of ids
    Ids {
        /// First book id to crawl
        #[arg(long = "start_id", alias = "start-id", default_value_t = 1)]
        start_id: u64,

        /// Last book id to crawl (inclusive)
        #[arg(long = "end_id", alias = "end-id", default_value_t = 10)]
        end_id: u64,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Crawl every book listed on a range of category pages
    Category {
        /// First listing page to crawl
        #[arg(long = "start_page", alias = "start-page", default_value_t = 1)]
        start_page: u32,

        /// Last listing page to crawl (inclusive); omit to page until exhausted
        #[arg(long = "end_page", alias = "end-page")]
        end_page: Option<u32>,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Do not download cover images
    #[arg(long = "skip_imgs", alias = "skip-imgs")]
    skip_imgs: bool,

    /// Do not download book texts
    #[arg(long = "skip_txt", alias = "skip-txt")]
    skip_txt: bool,

    /// Folder for books/, images/ and the manifest [default: results/]
    #[arg(long = "dest_folder", alias = "dest-folder", value_name = "DIR")]
    dest_folder: Option<PathBuf>,

    /// Rewrite the manifest after every recorded book
    #[arg(long)]
    incremental: bool,
}

impl OutputArgs {
    /// Applies command-line overrides on top of the file configuration
    fn apply(&self, config: &mut Config) {
        if let Some(dest_folder) = &self.dest_folder {
            config.output.dest_folder = dest_folder.clone();
        }
        config.output.skip_images |= self.skip_imgs;
        config.output.skip_text |= self.skip_txt;
        config.output.incremental |= self.incremental;
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config_with_hash(path) {
                Ok((cfg, hash)) => {
                    tracing::info!("Configuration loaded successfully (hash: {})", hash);
                    cfg
                }
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => Config::default(),
    };

    let source = match &cli.command {
        Command::Ids {
            start_id,
            end_id,
            output,
        } => {
            output.apply(&mut config);
            UnitSource::IdRange {
                start: *start_id,
                end: *end_id,
            }
        }
        Command::Category {
            start_page,
            end_page,
            output,
        } => {
            output.apply(&mut config);
            UnitSource::Category {
                start_page: *start_page,
                end_page: *end_page,
            }
        }
    };

    validate(&config)?;
    source.validate()?;

    if cli.dry_run {
        handle_dry_run(&config, source);
        return Ok(());
    }

    handle_crawl(config, source, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("tululu_parser=info,warn"),
            1 => EnvFilter::new("tululu_parser=debug,info"),
            2 => EnvFilter::new("tululu_parser=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the resolved configuration and the work
fn handle_dry_run(config: &Config, source: UnitSource) {
    println!("=== Tululu-Parser Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);
    println!("  Category path: {}", config.site.category_path);
    println!("  Text endpoint: {}", config.site.text_endpoint);
    println!("  User agent: {}", config.site.user_agent);

    println!("\nCrawler:");
    println!(
        "  Connection pause: {}ms",
        config.crawler.connection_pause_ms
    );
    match config.crawler.request_timeout() {
        Some(timeout) => println!("  Request timeout: {:?}", timeout),
        None => println!("  Request timeout: none"),
    }
    println!(
        "  Max consecutive listing failures: {}",
        config.crawler.max_consecutive_listing_failures
    );

    println!("\nOutput:");
    println!("  Books: {}", config.output.books_dir().display());
    println!("  Images: {}", config.output.images_dir().display());
    println!("  Manifest: {}", config.output.manifest_path().display());
    println!("  Skip texts: {}", config.output.skip_text);
    println!("  Skip images: {}", config.output.skip_images);
    println!("  Incremental manifest: {}", config.output.incremental);

    println!("\n✓ Configuration is valid");
    println!("✓ Would crawl {}", source);
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: Config,
    source: UnitSource,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    match crawl(config, source).await {
        Ok(summary) => {
            if !quiet {
                print_summary(&summary);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
