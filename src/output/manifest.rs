//! The JSON manifest describing every book recorded in a run

use crate::crawler::BookMetadata;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One successfully processed book, as persisted in the manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    pub title: String,
    pub author: String,
    /// Path of the cover image, or the placeholder when images were skipped
    pub img_src: String,
    /// Path of the text file, or the placeholder when texts were skipped
    pub book_src: String,
    pub comments: Vec<String>,
    pub genres: Vec<String>,
}

impl BookRecord {
    /// Builds a record from parsed metadata and the archived asset locations
    pub fn from_metadata(metadata: BookMetadata, img_src: String, book_src: String) -> Self {
        Self {
            title: metadata.title,
            author: metadata.author,
            img_src,
            book_src,
            comments: metadata.comments,
            genres: metadata.genres,
        }
    }
}

/// Ordered collection of records, written to a single JSON file
///
/// By default the file is written once, by [`JsonManifest::write`]. In
/// incremental mode it is also rewritten after every [`JsonManifest::push`],
/// so an interrupted crawl keeps what it had already recorded.
#[derive(Debug)]
pub struct JsonManifest {
    path: PathBuf,
    incremental: bool,
    records: Vec<BookRecord>,
}

impl JsonManifest {
    pub fn new(path: impl Into<PathBuf>, incremental: bool) -> Self {
        Self {
            path: path.into(),
            incremental,
            records: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Appends a record; in incremental mode the file is rewritten immediately
    pub fn push(&mut self, record: BookRecord) -> Result<()> {
        self.records.push(record);
        if self.incremental {
            self.write()?;
        }
        Ok(())
    }

    /// Serializes all records to the manifest path
    ///
    /// Non-ASCII text is written as-is (UTF-8), not as `\u` escapes.
    pub fn write(&self) -> Result<PathBuf> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string(&self.records)?;
        std::fs::write(&self.path, json)?;

        tracing::debug!(
            "Wrote {} records to {}",
            self.records.len(),
            self.path.display()
        );
        Ok(self.path.clone())
    }
}

/// Reads a manifest file back into records
pub fn load_manifest(path: &Path) -> Result<Vec<BookRecord>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
