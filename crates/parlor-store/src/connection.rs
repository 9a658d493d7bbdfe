//! Connection pool setup.
//!
//! Every pooled connection gets WAL journaling, a busy timeout, and
//! foreign-key enforcement before it is handed out.

use std::path::Path;

use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;

use crate::errors::Result;

/// Pool of `SQLite` connections shared by the store.
pub type ConnectionPool = r2d2::Pool<SqliteConnectionManager>;

/// A connection checked out of the pool.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Pragmas applied to every connection.
const CONNECTION_PRAGMAS: &str = "
    PRAGMA journal_mode = WAL;
    PRAGMA busy_timeout = 5000;
    PRAGMA foreign_keys = ON;
    PRAGMA synchronous = NORMAL;
";

/// Apply per-connection pragmas. Exposed so tests on bare in-memory
/// connections match pooled behavior.
pub fn apply_pragmas(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(CONNECTION_PRAGMAS)
}

/// Open a connection pool on a database file and run migrations once.
/// The parent directory must already exist.
pub fn open_pool(path: &Path, max_size: u32) -> Result<ConnectionPool> {
    let manager = SqliteConnectionManager::file(path).with_init(|conn| apply_pragmas(conn));
    let pool = r2d2::Pool::builder().max_size(max_size).build(manager)?;

    let conn = pool.get()?;
    crate::migrations::run_migrations(&conn)?;
    Ok(pool)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
