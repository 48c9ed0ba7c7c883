//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::state::UrlStatus;
use crate::storage::UrlRecord;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("URL not found: {0}")]
    UrlNotFound(String),

    #[error("Invalid status transition for {url}: {from} -> {to}")]
    InvalidTransition {
        url: String,
        from: UrlStatus,
        to: UrlStatus,
    },

    #[error("Unknown status '{0}' in database")]
    UnknownStatus(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// Every status write is checked against [`UrlStatus::can_transition_to`];
/// a write that would move a record backwards (or out of a terminal state)
/// fails with [`StorageError::InvalidTransition`] and changes nothing.
pub trait Storage {
    // ===== Record Creation =====

    /// Inserts a new `pending` record, ignoring duplicates
    ///
    /// # Returns
    ///
    /// `true` if the record was created, `false` if the URL was already known
    fn insert_url(&mut self, url: &str) -> StorageResult<bool>;

    // ===== Point Updates =====

    /// Moves a record to a new status without touching any other column
    fn update_status(&mut self, url: &str, status: UrlStatus) -> StorageResult<()>;

    /// Stores the classification label and confidence together
    fn update_classification(
        &mut self,
        url: &str,
        classification: &str,
        confidence: f64,
    ) -> StorageResult<()>;

    /// Marks a record as `skipped`
    fn mark_skipped(&mut self, url: &str) -> StorageResult<()>;

    /// Marks a record as `failed` with a diagnostic message
    ///
    /// Callers are expected to have truncated the message already.
    fn mark_failed(&mut self, url: &str, error_message: &str) -> StorageResult<()>;

    // ===== Atomic Crawl Completion =====

    /// Marks a record `crawled` and queues its discovered links, atomically
    ///
    /// Either the record is marked with its content *and* the links are
    /// queued, or nothing is written. Individual link insertions that fail
    /// (duplicates included) are skipped without failing the unit.
    ///
    /// # Returns
    ///
    /// The number of links that were new and have been queued as `pending`
    fn complete_crawl(&mut self, url: &str, content: &str, links: &[String])
        -> StorageResult<usize>;

    // ===== Queries =====

    /// Gets a record by URL
    fn get_url(&self, url: &str) -> StorageResult<Option<UrlRecord>>;

    /// Gets every record currently in a given status
    fn get_urls_by_status(&self, status: UrlStatus) -> StorageResult<Vec<UrlRecord>>;

    /// Counts records in a given status
    fn count_by_status(&self, status: UrlStatus) -> StorageResult<u64>;

    /// Counts all records
    fn count_total(&self) -> StorageResult<u64>;
}
