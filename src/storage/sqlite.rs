//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::state::UrlStatus;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::UrlRecord;
use crate::SpideyError;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

const SELECT_COLUMNS: &str = "SELECT id, url, status, classification, confidence, content,
     error_message, created_at, updated_at FROM urls";

const INSERT_PENDING_SQL: &str = "INSERT OR IGNORE INTO urls (url, status, created_at, updated_at)
     VALUES (?1, ?2, ?3, ?3)";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens or creates a database file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    pub fn new(path: &Path) -> Result<Self, SpideyError> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
            PRAGMA busy_timeout = 5000;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn open_in_memory() -> Result<Self, SpideyError> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

/// Maps a `urls` row selected with [`SELECT_COLUMNS`]
fn row_to_record(row: &Row<'_>) -> rusqlite::Result<UrlRecord> {
    Ok(UrlRecord {
        id: row.get(0)?,
        url: row.get(1)?,
        status: UrlStatus::from_db_string(&row.get::<_, String>(2)?)
            .unwrap_or(UrlStatus::Failed),
        classification: row.get(3)?,
        confidence: row.get(4)?,
        content: row.get(5)?,
        error_message: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

fn current_status(conn: &Connection, url: &str) -> StorageResult<UrlStatus> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT status FROM urls WHERE url = ?1",
            params![url],
            |row| row.get(0),
        )
        .optional()?;

    let raw = raw.ok_or_else(|| StorageError::UrlNotFound(url.to_string()))?;
    UrlStatus::from_db_string(&raw).ok_or(StorageError::UnknownStatus(raw))
}

/// Moves a record to `next`, optionally setting content or an error message
///
/// The update is a compare-and-set against the status observed just before,
/// so two writers racing on the same record cannot both succeed.
fn transition(
    conn: &Connection,
    url: &str,
    next: UrlStatus,
    content: Option<&str>,
    error_message: Option<&str>,
) -> StorageResult<()> {
    let from = current_status(conn, url)?;
    if !from.can_transition_to(next) {
        return Err(StorageError::InvalidTransition {
            url: url.to_string(),
            from,
            to: next,
        });
    }

    let now = Utc::now().to_rfc3339();
    let changed = conn.execute(
        "UPDATE urls SET status = ?1, content = COALESCE(?2, content),
         error_message = COALESCE(?3, error_message), updated_at = ?4
         WHERE url = ?5 AND status = ?6",
        params![
            next.to_db_string(),
            content,
            error_message,
            now,
            url,
            from.to_db_string()
        ],
    )?;

    if changed == 0 {
        return Err(StorageError::InvalidTransition {
            url: url.to_string(),
            from,
            to: next,
        });
    }

    Ok(())
}

impl Storage for SqliteStorage {
    // ===== Record Creation =====

    fn insert_url(&mut self, url: &str) -> StorageResult<bool> {
        let now = Utc::now().to_rfc3339();
        let inserted = self.conn.execute(
            INSERT_PENDING_SQL,
            params![url, UrlStatus::Pending.to_db_string(), now],
        )?;
        Ok(inserted == 1)
    }

    // ===== Point Updates =====

    fn update_status(&mut self, url: &str, status: UrlStatus) -> StorageResult<()> {
        transition(&self.conn, url, status, None, None)
    }

    fn update_classification(
        &mut self,
        url: &str,
        classification: &str,
        confidence: f64,
    ) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let changed = self.conn.execute(
            "UPDATE urls SET classification = ?1, confidence = ?2, updated_at = ?3 WHERE url = ?4",
            params![classification, confidence, now, url],
        )?;

        if changed == 0 {
            return Err(StorageError::UrlNotFound(url.to_string()));
        }
        Ok(())
    }

    fn mark_skipped(&mut self, url: &str) -> StorageResult<()> {
        transition(&self.conn, url, UrlStatus::Skipped, None, None)
    }

    fn mark_failed(&mut self, url: &str, error_message: &str) -> StorageResult<()> {
        transition(
            &self.conn,
            url,
            UrlStatus::Failed,
            None,
            Some(error_message),
        )
    }

    // ===== Atomic Crawl Completion =====

    fn complete_crawl(
        &mut self,
        url: &str,
        content: &str,
        links: &[String],
    ) -> StorageResult<usize> {
        let tx = self.conn.transaction()?;

        transition(&tx, url, UrlStatus::Crawled, Some(content), None)?;

        let now = Utc::now().to_rfc3339();
        let mut queued = 0;
        {
            let mut stmt = tx.prepare(INSERT_PENDING_SQL)?;
            for link in links {
                match stmt.execute(params![link, UrlStatus::Pending.to_db_string(), now]) {
                    Ok(inserted) => queued += inserted,
                    Err(e) => {
                        tracing::warn!("Failed to insert new link {}: {}", link, e);
                    }
                }
            }
        }

        tx.commit()?;
        Ok(queued)
    }

    // ===== Queries =====

    fn get_url(&self, url: &str) -> StorageResult<Option<UrlRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} WHERE url = ?1", SELECT_COLUMNS))?;

        let record = stmt.query_row(params![url], row_to_record).optional()?;
        Ok(record)
    }

    fn get_urls_by_status(&self, status: UrlStatus) -> StorageResult<Vec<UrlRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} WHERE status = ?1 ORDER BY id", SELECT_COLUMNS))?;

        let records = stmt
            .query_map(params![status.to_db_string()], row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    fn count_by_status(&self, status: UrlStatus) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM urls WHERE status = ?1",
            params![status.to_db_string()],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn count_total(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM urls", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
