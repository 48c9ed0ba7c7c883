//! Configuration module for Spidey
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use spidey::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("spidey.toml")).unwrap();
//! println!("Classifier at: {}", config.classifier.base_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    ClassifierConfig, Config, FetcherConfig, StorageConfig, DEFAULT_TARGET_LABEL,
    DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
