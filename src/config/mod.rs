//! Configuration module for Tululu-Parser
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! All settings are optional; command-line flags override what the file says.
//!
//! # Example
//!
//! ```no_run
//! use tululu_parser::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("tululu.toml")).unwrap();
//! println!("Results go to: {}", config.output.dest_folder.display());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, SiteConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
