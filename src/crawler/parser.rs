//! HTML parsers for book detail pages and category listing pages
//!
//! This module handles parsing HTML content to extract:
//! - Book metadata (title, author, cover image, genres, comments)
//! - Book detail paths from a category listing page

use crate::crawler::fetcher::PageResponse;
use crate::{FetchError, FetchResult};
use scraper::{Html, Selector};
use std::sync::LazyLock;
use url::Url;

static TITLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| selector("h1"));
static IMAGE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| selector("div.bookimage img"));
static COMMENT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| selector("div.texts"));
static COMMENT_TEXT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| selector("span.black"));
static GENRE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| selector("span.d_book a"));
static LISTING_ROW_SELECTOR: LazyLock<Selector> = LazyLock::new(|| selector("table.d_book"));
static LISTING_LINK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));

fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("hardcoded selector is valid")
}

/// Separates the title from the author in the page heading
pub const TITLE_AUTHOR_DELIMITER: &str = "::";

/// Metadata extracted from one book detail page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookMetadata {
    pub title: String,
    pub author: String,
    /// Absolute URL of the cover, resolved against the page's own URL
    pub image_url: Url,
    /// Extension of the cover file including the leading dot, or empty
    pub image_extension: String,
    pub genres: Vec<String>,
    pub comments: Vec<String>,
}

/// One book referenced from a category listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    /// Link target as written in the page, e.g. `/b239/`
    pub path: String,
}

impl ListingEntry {
    /// Numeric book identifier: the digits of the path, in order
    ///
    /// Returns `None` if the path contains no digits.
    pub fn book_id(&self) -> Option<String> {
        let digits: String = self.path.chars().filter(|c| c.is_ascii_digit()).collect();
        (!digits.is_empty()).then_some(digits)
    }

    /// Absolute URL of the book's detail page
    pub fn book_url(&self, base_url: &Url) -> Result<Url, url::ParseError> {
        base_url.join(&self.path)
    }
}

/// Parses a fetched book detail page
pub fn parse_book_page(response: &PageResponse) -> FetchResult<BookMetadata> {
    parse_book_html(&response.html, &response.url)
}

/// Parses book detail HTML, resolving relative links against `page_url`
///
/// # Errors
///
/// Returns `FetchError::MalformedPage` when the heading or the cover image is
/// missing, or when the heading does not split into exactly one title and one
/// author.
///
/// # Example
///
/// ```
/// use tululu_parser::crawler::parse_book_html;
/// use url::Url;
///
/// let html = r#"<h1>Dune :: Frank Herbert</h1>
///     <div class="bookimage"><img src="/shots/1.jpg"></div>"#;
/// let page_url = Url::parse("https://example.com/b1/").unwrap();
/// let book = parse_book_html(html, &page_url).unwrap();
/// assert_eq!(book.title, "Dune");
/// assert_eq!(book.author, "Frank Herbert");
/// ```
pub fn parse_book_html(html: &str, page_url: &Url) -> FetchResult<BookMetadata> {
    let document = Html::parse_document(html);
    let malformed = |message: &str| FetchError::MalformedPage {
        url: page_url.to_string(),
        message: message.to_string(),
    };

    let heading = document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|element| element.text().collect::<String>())
        .ok_or_else(|| malformed("missing title heading"))?;
    let (title, author) = split_title_author(&heading).ok_or_else(|| {
        malformed(&format!(
            "heading {:?} does not split into title and author",
            heading.trim()
        ))
    })?;

    let image_src = document
        .select(&IMAGE_SELECTOR)
        .next()
        .and_then(|element| element.value().attr("src"))
        .ok_or_else(|| malformed("missing cover image"))?;
    let image_url = page_url
        .join(image_src.trim())
        .map_err(|e| malformed(&format!("bad cover image src {:?}: {}", image_src, e)))?;
    let image_extension = image_extension(&image_url);

    let genres = document
        .select(&GENRE_SELECTOR)
        .map(|element| element.text().collect::<String>())
        .collect();

    let comments = extract_comments(&document);

    Ok(BookMetadata {
        title,
        author,
        image_url,
        image_extension,
        genres,
        comments,
    })
}

/// Splits `"Title :: Author"` into its two trimmed halves
///
/// Returns `None` unless there is exactly one delimiter and both halves are
/// non-empty.
pub fn split_title_author(heading: &str) -> Option<(String, String)> {
    let mut parts = heading.trim().split(TITLE_AUTHOR_DELIMITER);
    let title = parts.next()?.trim();
    let author = parts.next()?.trim();
    if parts.next().is_some() || title.is_empty() || author.is_empty() {
        return None;
    }
    Some((title.to_string(), author.to_string()))
}

/// Extension of the last path segment of `url`, including the dot
///
/// Dot-files such as `/.hidden` have no extension, matching the usual
/// `splitext` convention.
pub fn image_extension(url: &Url) -> String {
    let file_name = url
        .path_segments()
        .and_then(|segments| segments.last())
        .unwrap_or("");

    match file_name.rfind('.') {
        Some(idx) if !file_name[..idx].trim_start_matches('.').is_empty() => {
            file_name[idx..].to_string()
        }
        _ => String::new(),
    }
}

/// Extracts comment texts, one per comment container
///
/// Containers without a text-bearing child are ignored.
fn extract_comments(document: &Html) -> Vec<String> {
    document
        .select(&COMMENT_SELECTOR)
        .filter_map(|container| container.select(&COMMENT_TEXT_SELECTOR).next())
        .map(|span| span.text().collect::<String>())
        .collect()
}

/// Parses a fetched category listing page
pub fn parse_listing_page(response: &PageResponse) -> Vec<ListingEntry> {
    parse_listing_html(&response.html)
}

/// Extracts the detail-page path of every book row on a listing page
///
/// A page without book rows yields an empty vector; that is how paging past
/// the last page of a category looks.
pub fn parse_listing_html(html: &str) -> Vec<ListingEntry> {
    let document = Html::parse_document(html);

    document
        .select(&LISTING_ROW_SELECTOR)
        .filter_map(|row| row.select(&LISTING_LINK_SELECTOR).next())
        .filter_map(|link| link.value().attr("href"))
        .map(|href| ListingEntry {
            path: href.trim().to_string(),
        })
        .filter(|entry| !entry.path.is_empty())
        .collect()
}
