//! Book asset downloads
//!
//! Downloads a book's plain-text body and cover image into the destination
//! folders under sanitized, human-readable file names. Nothing is written when
//! the fetch fails, including when the site redirected to its home page.

use crate::crawler::fetcher::Fetcher;
use crate::Result;
use std::path::{Path, PathBuf};
use url::Url;

/// Characters that are illegal in file names on at least one common filesystem
const ILLEGAL_FILENAME_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Longest file name (in bytes) most filesystems accept
const MAX_FILENAME_BYTES: usize = 255;

/// Downloads book texts and cover images to disk
#[derive(Debug, Clone)]
pub struct BookArchiver {
    fetcher: Fetcher,
    text_endpoint: Url,
}

impl BookArchiver {
    /// Creates an archiver that downloads texts from `text_endpoint?id=<book_id>`
    pub fn new(fetcher: Fetcher, text_endpoint: Url) -> Self {
        Self {
            fetcher,
            text_endpoint,
        }
    }

    /// Downloads the plain-text body of a book
    ///
    /// The file is written to `destination_dir/<sanitized display_name>.txt`;
    /// an existing file with the same name is overwritten.
    ///
    /// # Returns
    ///
    /// * `Ok(PathBuf)` - Path of the written file
    /// * `Err(TululuError::Fetch)` - Redirected, HTTP error, or connection failure; nothing written
    /// * `Err(TululuError::Io)` - The directory or file could not be written
    pub async fn download_text(
        &self,
        book_id: &str,
        display_name: &str,
        destination_dir: &Path,
    ) -> Result<PathBuf> {
        let response = self
            .fetcher
            .fetch_bytes(&self.text_endpoint, &[("id", book_id)])
            .await?;

        let path = destination_dir.join(sanitize_filename(display_name, ".txt"));
        write_asset(&path, &response.body).await?;

        tracing::debug!(
            "Saved text of book {} from {} ({} bytes) to {}",
            book_id,
            response.url,
            response.body.len(),
            path.display()
        );
        Ok(path)
    }

    /// Downloads a cover image
    ///
    /// The file is written to `destination_dir/<sanitized display_name>`; the
    /// caller includes the extension in `display_name`.
    pub async fn download_image(
        &self,
        image_url: &Url,
        display_name: &str,
        destination_dir: &Path,
    ) -> Result<PathBuf> {
        let response = self.fetcher.fetch_bytes(image_url, &[]).await?;

        let path = destination_dir.join(sanitize_filename(display_name, ""));
        write_asset(&path, &response.body).await?;

        tracing::debug!(
            "Saved cover {} (status {}) to {}",
            response.url,
            response.status,
            path.display()
        );
        Ok(path)
    }
}

async fn write_asset(path: &Path, body: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, body).await
}

/// Makes `name` followed by `suffix` safe to use as a single file name
///
/// Removes path separators, characters reserved on Windows and control
/// characters from `name`, trims trailing dots and spaces, and truncates it so
/// that the whole file name, `suffix` included, fits in 255 bytes. Letters in
/// any script, digits and punctuation such as `.` survive, so `"7. Солярис"`
/// stays readable.
///
/// # Example
///
/// ```
/// use tululu_parser::crawler::sanitize_filename;
///
/// assert_eq!(sanitize_filename("12. Who? What: Why", ".txt"), "12. Who What Why.txt");
/// ```
pub fn sanitize_filename(name: &str, suffix: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !ILLEGAL_FILENAME_CHARS.contains(c) && !c.is_control())
        .collect();

    let mut stem = trim_stem(&cleaned).to_string();

    let budget = MAX_FILENAME_BYTES.saturating_sub(suffix.len());
    if stem.len() > budget {
        let mut end = budget;
        while !stem.is_char_boundary(end) {
            end -= 1;
        }
        stem.truncate(end);
        stem = trim_stem(&stem).to_string();
    }

    if stem.is_empty() {
        stem.push('_');
    }

    stem.push_str(suffix);
    stem
}

fn trim_stem(stem: &str) -> &str {
    stem.trim()
        .trim_end_matches(|c: char| c == '.' || c.is_whitespace())
}
