//! State module for tracking crawl progress
//!
//! This module provides the per-unit state machine and the classification of
//! recoverable failures.
//!
//! # Components
//!
//! - `UnitState`: Tracks the state of one unit of work (fetching, parsing, archiving, ...)
//! - `FailureKind`: Tag for a recoverable failure, mapped to a `SkipPolicy`

mod failure;
mod unit_state;

// Re-export main types
pub use failure::{FailureKind, SkipPolicy};
pub use unit_state::UnitState;
