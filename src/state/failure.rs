//! Failure classification and the skip/pause policy table

use crate::FetchError;
use std::fmt;

/// Tag identifying which kind of recoverable failure ended a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FailureKind {
    Redirected,
    Http,
    Connection,
    MalformedPage,
}

/// What the driver does after a unit fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipPolicy {
    /// Log, drop the unit, continue immediately
    Skip,
    /// Log, drop the unit, sleep for the configured back-off, then continue
    Pause,
}

impl FailureKind {
    /// Maps a failure kind to the driver's policy
    ///
    /// | Failure | Action |
    /// |---------|--------|
    /// | Redirected | Skip |
    /// | Http | Skip |
    /// | MalformedPage | Skip |
    /// | Connection | Pause, then continue with the next unit |
    pub fn policy(&self) -> SkipPolicy {
        match self {
            Self::Redirected | Self::Http | Self::MalformedPage => SkipPolicy::Skip,
            Self::Connection => SkipPolicy::Pause,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Redirected => "redirected",
            Self::Http => "http",
            Self::Connection => "connection",
            Self::MalformedPage => "malformed_page",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FetchError {
    /// Returns the tag of this failure
    pub fn kind(&self) -> FailureKind {
        match self {
            FetchError::Redirected { .. } => FailureKind::Redirected,
            FetchError::Http { .. } => FailureKind::Http,
            FetchError::Connection { .. } => FailureKind::Connection,
            FetchError::MalformedPage { .. } => FailureKind::MalformedPage,
        }
    }

    /// The URL that was being fetched or parsed when the failure occurred
    pub fn url(&self) -> &str {
        match self {
            FetchError::Redirected { url }
            | FetchError::Http { url, .. }
            | FetchError::Connection { url, .. }
            | FetchError::MalformedPage { url, .. } => url,
        }
    }
}
