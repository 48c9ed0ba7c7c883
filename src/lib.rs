//! Spidey: a classify-then-crawl URL pipeline
//!
//! This crate takes a URL, asks an external model service whether it is worth
//! crawling, and if so fetches it, extracts readable text and outbound links,
//! and persists the result while queuing newly discovered links.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for bootstrapping and CLI operations
#[derive(Debug, Error)]
pub enum SpideyError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors raised by the classification client
#[derive(Debug, Error)]
pub enum ClassificationError {
    #[error("failed to create model request: {0}")]
    Request(String),

    #[error("model api request timed out for {url}")]
    Timeout { url: String },

    #[error("model api request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("model api returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode model response: {0}")]
    Decode(String),

    #[error("model confidence {0} is outside [0, 1]")]
    ConfidenceOutOfRange(f64),
}

/// Errors raised by the page fetch client
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to create request: {0}")]
    Request(String),

    #[error("request timed out for {url}")]
    Timeout { url: String },

    #[error("failed to fetch url: {0}")]
    Network(#[source] reqwest::Error),

    #[error("failed to fetch url: status {status}")]
    Status { status: reqwest::StatusCode },

    #[error("content is not HTML, but {content_type}")]
    NotHtml { content_type: String },

    #[error("failed to read response body: {0}")]
    Body(#[source] reqwest::Error),
}

/// Errors raised while extracting text and links from a document
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("could not parse base url {url}: {source}")]
    InvalidBaseUrl {
        url: String,
        source: ::url::ParseError,
    },
}

/// A failure at one stage of the URL pipeline
///
/// The `Display` form of this error is what ends up in a record's
/// `error_message`.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Classification(#[from] ClassificationError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Persistence(#[from] storage::StorageError),

    #[error("internal fault: {0}")]
    UnexpectedFault(String),
}

/// Reasons a URL submission is refused before any task is spawned
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("not a valid http(s) url: {0}")]
    InvalidUrl(String),

    #[error("url {url} was already processed (status: {status})")]
    AlreadyProcessed { url: String, status: UrlStatus },

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),
}

/// Result type alias for Spidey operations
pub type Result<T> = std::result::Result<T, SpideyError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Dispatcher, Outcome, Pipeline};
pub use state::UrlStatus;
pub use storage::{SqliteStorage, Storage, UrlRecord};
pub use url::is_valid_http_url;
