//! Database connection management with pragma configuration.
//!
//! This module handles opening the SQLite database, applying required pragmas
//! for performance and concurrency (WAL mode), and running migrations.

use super::migrations;
use crate::Error;
use std::path::Path;
use std::time::Duration;
use tokio_rusqlite::Connection;

/// Default freshness window for cached records.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

const PRAGMAS: &str = "PRAGMA journal_mode=WAL;
     PRAGMA synchronous=NORMAL;
     PRAGMA temp_store=MEMORY;
     PRAGMA busy_timeout=5000;";

/// Cache database handle.
///
/// Wraps a tokio-rusqlite Connection that runs database operations
/// on a background thread. Every row carries the time it was written;
/// rows older than `ttl` read as misses.
#[derive(Clone, Debug)]
pub struct CacheDb {
    pub(crate) conn: Connection,
    ttl: Duration,
}

impl CacheDb {
    /// Open a database at the specified path with the default TTL.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        Self::open_with_ttl(path, DEFAULT_TTL).await
    }

    /// Open a database at the specified path.
    ///
    /// Creates the file and its parent directories if they don't exist,
    /// applies performance pragmas, and runs any pending migrations.
    pub async fn open_with_ttl(path: impl AsRef<Path>, ttl: Duration) -> Result<Self, Error> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::InvalidInput(format!("create cache dir {}: {e}", parent.display())))?;
        }

        let conn = Connection::open(path).await.map_err(|e| Error::Database(e.into()))?;
        let db = Self::init(conn, ttl).await?;

        tracing::debug!(path = %path.display(), ttl_secs = ttl.as_secs(), "cache initialized");
        Ok(db)
    }

    /// Open an in-memory database for testing.
    ///
    /// Creates a temporary in-memory SQLite database with the same
    /// pragma configuration as file-based databases.
    pub async fn open_in_memory() -> Result<Self, Error> {
        Self::open_in_memory_with_ttl(DEFAULT_TTL).await
    }

    /// In-memory database with a custom TTL.
    pub async fn open_in_memory_with_ttl(ttl: Duration) -> Result<Self, Error> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| Error::Database(e.into()))?;
        Self::init(conn, ttl).await
    }

    async fn init(conn: Connection, ttl: Duration) -> Result<Self, Error> {
        conn.call(|conn| conn.execute_batch(PRAGMAS))
            .await
            .map_err(Error::Database)?;

        migrations::run(&conn).await?;

        Ok(Self { conn, ttl })
    }

    /// The freshness window applied to every read.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Oldest `updated_at` (epoch milliseconds) that still counts as live.
    pub(crate) fn cutoff_millis(&self) -> i64 {
        let ttl = i64::try_from(self.ttl.as_millis()).unwrap_or(i64::MAX);
        now_millis().saturating_sub(ttl)
    }

    /// Close the underlying connection, flushing the WAL.
    pub async fn close(self) -> Result<(), Error> {
        self.conn.close().await.map_err(Error::Database)
    }
}

/// Current time as epoch milliseconds.
pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
