//! Schema creation.
//!
//! Two tables: `sessions` and `messages`. Contact fields default to the
//! empty string — empty means "not captured". Message order within a
//! session is `(created_at, rowid)`; rowid is the insertion-order
//! tie-break for timestamps that collide.

use rusqlite::Connection;

use crate::errors::Result;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS sessions (
        id            TEXT PRIMARY KEY,
        visitor_name  TEXT NOT NULL DEFAULT '',
        visitor_email TEXT NOT NULL DEFAULT '',
        created_at    TEXT NOT NULL,
        updated_at    TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS messages (
        id         TEXT PRIMARY KEY,
        session_id TEXT NOT NULL REFERENCES sessions(id),
        role       TEXT NOT NULL CHECK (role IN ('user', 'assistant')),
        content    TEXT NOT NULL,
        created_at TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_messages_session
    ON messages(session_id, created_at);
";

/// Create tables and indexes. Idempotent — safe to run at every startup.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
