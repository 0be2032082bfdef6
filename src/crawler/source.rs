//! Units of work for a crawl
//!
//! A crawl either walks an explicit range of book ids, or pages through a
//! category listing and crawls every book each page references.

use std::fmt;
use url::Url;

/// Where the crawl driver gets its books from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitSource {
    /// Book ids `start..=end`
    IdRange { start: u64, end: u64 },

    /// Category listing pages `start_page..=end_page`. Without an end page
    /// the crawl continues until a page lists no books or redirects home.
    Category {
        start_page: u32,
        end_page: Option<u32>,
    },
}

impl UnitSource {
    /// Checks that the bounds describe a non-empty range
    pub fn validate(&self) -> Result<(), String> {
        match *self {
            UnitSource::IdRange { start, end } if start > end => Err(format!(
                "start id {} is greater than end id {}",
                start, end
            )),
            UnitSource::Category {
                start_page,
                end_page: Some(end_page),
            } if start_page > end_page => Err(format!(
                "start page {} is greater than end page {}",
                start_page, end_page
            )),
            UnitSource::Category { start_page: 0, .. } => {
                Err("category pages are numbered from 1".to_string())
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for UnitSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitSource::IdRange { start, end } => write!(f, "book ids {}..={}", start, end),
            UnitSource::Category {
                start_page,
                end_page: Some(end_page),
            } => write!(f, "category pages {}..={}", start_page, end_page),
            UnitSource::Category {
                start_page,
                end_page: None,
            } => write!(f, "category pages from {} until exhausted", start_page),
        }
    }
}

/// One book to crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookTarget {
    /// Numeric id as a digit string; used for the text endpoint and file names
    pub id: String,
    /// Detail page URL
    pub url: Url,
}

impl BookTarget {
    /// Target for a book addressed by id: `<base>/b<id>/`
    pub fn from_id(base_url: &Url, id: u64) -> Result<Self, url::ParseError> {
        Ok(Self {
            id: id.to_string(),
            url: base_url.join(&format!("b{}/", id))?,
        })
    }
}

/// URL of a category listing page: the page number appended to the category path
pub fn listing_page_url(category_url: &Url, page: u32) -> Result<Url, url::ParseError> {
    category_url.join(&page.to_string())
}
