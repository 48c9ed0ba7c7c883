//! Database schema definitions
//!
//! This module contains the SQL schema for the Spidey database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Every URL the pipeline knows about, keyed by the URL itself
CREATE TABLE IF NOT EXISTS urls (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL UNIQUE,
    status TEXT NOT NULL CHECK (status IN
        ('pending', 'classifying', 'crawling', 'crawled', 'skipped', 'failed')),
    classification TEXT,
    confidence REAL CHECK (confidence IS NULL OR (confidence >= 0.0 AND confidence <= 1.0)),
    content TEXT,
    error_message TEXT CHECK (error_message IS NULL OR length(error_message) <= 1024),
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    CHECK ((classification IS NULL) = (confidence IS NULL))
);

CREATE INDEX IF NOT EXISTS idx_urls_status ON urls(status);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::{params, Connection};

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        initialize_schema(&conn).unwrap();
        let result = initialize_schema(&conn);

        assert!(result.is_ok());
    }

    #[test]
    fn test_urls_table_exists_after_init() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='urls'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_schema_rejects_half_set_classification() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        let result = conn.execute(
            "INSERT INTO urls (url, status, classification, created_at, updated_at)
             VALUES (?1, 'pending', 'NEWS', 'now', 'now')",
            params!["https://example.com/"],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_schema_rejects_unknown_status() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        let result = conn.execute(
            "INSERT INTO urls (url, status, created_at, updated_at)
             VALUES (?1, 'queued', 'now', 'now')",
            params!["https://example.com/"],
        );
        assert!(result.is_err());
    }
}
