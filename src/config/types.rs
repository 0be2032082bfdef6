use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for Tululu-Parser
///
/// Every section and field has a default, so an empty file (or no file at
/// all) yields a configuration that targets the live site.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Site addressing configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Home page of the site. A response whose final URL equals this one is
    /// the site's "resource not available" signal.
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path of the category listing, relative to `base_url`
    #[serde(rename = "category-path")]
    pub category_path: String,

    /// Path of the plain-text download endpoint, relative to `base_url`
    #[serde(rename = "text-endpoint")]
    pub text_endpoint: String,

    /// User agent sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://tululu.org/".to_string(),
            category_path: "l55/".to_string(),
            text_endpoint: "txt.php".to_string(),
            user_agent: format!("tululu-parser/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Back-off after a connection failure (milliseconds)
    #[serde(rename = "connection-pause-ms")]
    pub connection_pause_ms: u64,

    /// Per-request timeout (milliseconds). 0 disables the timeout.
    #[serde(rename = "request-timeout-ms")]
    pub request_timeout_ms: u64,

    /// A category crawl without an end page gives up after this many listing
    /// pages fail in a row
    #[serde(rename = "max-consecutive-listing-failures")]
    pub max_consecutive_listing_failures: u32,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            connection_pause_ms: 10_000,
            request_timeout_ms: 0,
            max_consecutive_listing_failures: 5,
        }
    }
}

impl CrawlerConfig {
    pub fn connection_pause(&self) -> Duration {
        Duration::from_millis(self.connection_pause_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_ms > 0).then(|| Duration::from_millis(self.request_timeout_ms))
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Root folder; `books/`, `images/` and the manifest live under it
    #[serde(rename = "dest-folder")]
    pub dest_folder: PathBuf,

    /// File name of the JSON manifest inside `dest_folder`
    #[serde(rename = "manifest-name")]
    pub manifest_name: String,

    /// Value recorded for `img_src` / `book_src` when that download is skipped
    pub placeholder: String,

    /// Rewrite the manifest after every record instead of once at the end
    pub incremental: bool,

    /// Do not download cover images
    #[serde(rename = "skip-images")]
    pub skip_images: bool,

    /// Do not download book texts
    #[serde(rename = "skip-text")]
    pub skip_text: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dest_folder: PathBuf::from("results/"),
            manifest_name: "books_params.json".to_string(),
            placeholder: "-".to_string(),
            incremental: false,
            skip_images: false,
            skip_text: false,
        }
    }
}

impl OutputConfig {
    pub fn books_dir(&self) -> PathBuf {
        self.dest_folder.join("books")
    }

    pub fn images_dir(&self) -> PathBuf {
        self.dest_folder.join("images")
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.dest_folder.join(&self.manifest_name)
    }
}
