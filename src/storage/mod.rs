//! Storage module for persisting URL records
//!
//! This module handles all database operations for the pipeline, including:
//! - SQLite database initialization and schema management
//! - Forward-only status transitions
//! - The atomic crawl-completion unit that also queues discovered links

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use crate::state::UrlStatus;
use crate::SpideyError;

use std::path::Path;

/// Opens (or creates) a storage database
pub fn open_storage(path: &Path) -> Result<SqliteStorage, SpideyError> {
    SqliteStorage::new(path)
}

/// A URL known to the pipeline
#[derive(Debug, Clone)]
pub struct UrlRecord {
    pub id: i64,
    pub url: String,
    pub status: UrlStatus,
    /// Upper-cased label from the classifier; set together with `confidence`
    pub classification: Option<String>,
    pub confidence: Option<f64>,
    /// Extracted text, only present once the record is `crawled`
    pub content: Option<String>,
    pub error_message: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}
