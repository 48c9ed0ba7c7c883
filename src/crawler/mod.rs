//! Crawler module for URL classification and page processing
//!
//! This module contains the core pipeline logic, including:
//! - The classification client for the external model service
//! - HTTP fetching with Content-Type validation
//! - HTML text and link extraction
//! - The per-URL pipeline and the concurrent dispatcher

mod classifier;
mod dispatcher;
mod extractor;
mod fetcher;
mod pipeline;

pub use classifier::{Classification, Classifier};
pub use dispatcher::Dispatcher;
pub use extractor::{extract, Extracted};
pub use fetcher::{build_http_client, is_html_content_type, FetchedPage, Fetcher};
pub use pipeline::{truncate_error_message, Outcome, Pipeline, Stage, MAX_ERROR_MESSAGE_CHARS};

use crate::config::Config;
use crate::storage::{open_storage, SqliteStorage};
use crate::SpideyError;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Builds a dispatcher backed by the configured SQLite database
///
/// This is the main entry point for running the pipeline. It will:
/// 1. Open (or create) the database
/// 2. Build the classifier and fetch clients
/// 3. Wrap the pipeline for concurrent dispatch
pub fn open_dispatcher(config: &Config) -> Result<Dispatcher<SqliteStorage>, SpideyError> {
    let storage = open_storage(Path::new(&config.storage.database_path))?;
    tracing::info!("Opened database at {}", config.storage.database_path);

    let pipeline = Pipeline::from_config(config, Arc::new(Mutex::new(storage)))?;
    tracing::info!(
        "Pipeline ready (classifier: {}, target label: {})",
        config.classifier.base_url,
        pipeline.target_label()
    );

    Ok(Dispatcher::new(Arc::new(pipeline)))
}
