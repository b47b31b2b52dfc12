use std::fs;
use std::path::Path;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::Result;
use crate::models::{JobPosting, UserId};
use crate::schema::{job_history, user_filters};
use crate::store::{HistoryStore, PreferenceStore};

// Type alias for the database connection pool
pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Database manager for handling connections and operations.
///
/// Implements both narrow store interfaces over one shared pool; the pool
/// serializes conflicting writes between the command path and the scheduler.
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Create a new database connection pool
    pub fn new(database_path: &str) -> Result<Self> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = Path::new(database_path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Set up connection manager and pool
        let manager = SqliteConnectionManager::file(database_path);
        let pool = Pool::builder().build(manager)?;

        // Run migrations
        let conn = pool.get()?;
        Self::run_migrations(&conn)?;

        Ok(Self { pool })
    }

    /// In-memory database for tests
    pub fn in_memory() -> Result<Self> {
        let manager = SqliteConnectionManager::memory();
        // A pooled in-memory db only behaves when every handle shares one connection
        let pool = Pool::builder().max_size(1).build(manager)?;
        let conn = pool.get()?;
        Self::run_migrations(&conn)?;
        Ok(Self { pool })
    }

    /// Run database migrations
    fn run_migrations(conn: &Connection) -> Result<()> {
        conn.execute_batch(include_str!(
            "../migrations/2026-08-30-000000_create_tables/up.sql"
        ))?;
        Ok(())
    }

    /// Get a connection from the pool
    pub fn get_connection(&self) -> Result<DbConnection> {
        Ok(self.pool.get()?)
    }
}

impl PreferenceStore for Database {
    fn set(&self, user: UserId, filter_text: &str) -> Result<()> {
        let conn = self.get_connection()?;
        conn.execute(
            &format!(
                "INSERT OR REPLACE INTO {} ({}, {}) VALUES (?, ?)",
                user_filters::TABLE,
                user_filters::CHAT_ID,
                user_filters::FILTERS
            ),
            params![user.0, filter_text],
        )?;
        Ok(())
    }

    fn get(&self, user: UserId) -> Result<Option<String>> {
        let conn = self.get_connection()?;
        let filters = conn
            .query_row(
                &format!(
                    "SELECT {} FROM {} WHERE {} = ?",
                    user_filters::FILTERS,
                    user_filters::TABLE,
                    user_filters::CHAT_ID
                ),
                params![user.0],
                |row| row.get(0),
            )
            .optional()?;
        Ok(filters)
    }

    fn clear(&self, user: UserId) -> Result<()> {
        let conn = self.get_connection()?;
        conn.execute(
            &format!(
                "DELETE FROM {} WHERE {} = ?",
                user_filters::TABLE,
                user_filters::CHAT_ID
            ),
            params![user.0],
        )?;
        Ok(())
    }

    fn list_all(&self) -> Result<Vec<(UserId, String)>> {
        let conn = self.get_connection()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {}, {} FROM {} ORDER BY {}",
            user_filters::CHAT_ID,
            user_filters::FILTERS,
            user_filters::TABLE,
            user_filters::CHAT_ID
        ))?;

        let rows = stmt.query_map(params![], |row| {
            Ok((UserId(row.get(0)?), row.get::<_, String>(1)?))
        })?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }

        Ok(results)
    }
}

impl HistoryStore for Database {
    fn record(&self, user: UserId, postings: &[JobPosting]) -> Result<()> {
        let conn = self.get_connection()?;
        for posting in postings {
            // INSERT OR IGNORE keeps re-recording idempotent under the
            // UNIQUE(chat_id, job_title, company) constraint
            conn.execute(
                &format!(
                    "INSERT OR IGNORE INTO {} ({}, {}, {}, {}) VALUES (?, ?, ?, ?)",
                    job_history::TABLE,
                    job_history::CHAT_ID,
                    job_history::JOB_TITLE,
                    job_history::COMPANY,
                    job_history::JOB_LINK
                ),
                params![user.0, posting.title, posting.company, posting.link],
            )?;
        }
        Ok(())
    }

    fn seen(&self, user: UserId, title: &str, company: &str) -> Result<bool> {
        let conn = self.get_connection()?;
        let found: Option<i64> = conn
            .query_row(
                &format!(
                    "SELECT 1 FROM {} WHERE {} = ? AND {} = ? AND {} = ?",
                    job_history::TABLE,
                    job_history::CHAT_ID,
                    job_history::JOB_TITLE,
                    job_history::COMPANY
                ),
                params![user.0, title, company],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }
}
