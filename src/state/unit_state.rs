//! Unit state definitions for tracking crawl progress
//!
//! This module defines all possible states a unit of work (one book, or one
//! category listing page) can be in while the driver processes it.

use std::fmt;

/// Represents the current state of a unit in the crawl process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitState {
    // ===== Active States =====
    /// The detail or listing page is being fetched
    Fetching,

    /// The fetched page is being parsed
    Parsing,

    /// The book's text and cover are being downloaded
    Archiving,

    // ===== Terminal States =====
    /// A record was appended to the manifest
    Recorded,

    /// A recoverable failure occurred and the unit was dropped
    Skipped,
}

impl UnitState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Recorded | Self::Skipped)
    }

    /// Returns true if this is an active state
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Returns true if moving from `self` to `next` is a legal transition
    ///
    /// The happy path is `Fetching -> Parsing -> Archiving -> Recorded`. Any
    /// active state may escape to `Skipped`. A listing page goes straight from
    /// `Parsing` to `Recorded` since it has nothing to archive.
    pub fn can_transition_to(&self, next: UnitState) -> bool {
        match (self, next) {
            (Self::Fetching, Self::Parsing) => true,
            (Self::Parsing, Self::Archiving) => true,
            (Self::Parsing, Self::Recorded) => true,
            (Self::Archiving, Self::Recorded) => true,
            (from, Self::Skipped) => from.is_active(),
            _ => false,
        }
    }

    /// Short lowercase label used in logs and the run summary
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fetching => "fetching",
            Self::Parsing => "parsing",
            Self::Archiving => "archiving",
            Self::Recorded => "recorded",
            Self::Skipped => "skipped",
        }
    }
}

impl fmt::Display for UnitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
