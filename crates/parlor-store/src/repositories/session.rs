//! Session repository — CRUD for the `sessions` table.
//!
//! Sessions are created with empty contact fields. The contact write is a
//! single conditional UPDATE so "capture exactly once" holds even when two
//! turns race on the same session: only one of the competing writes
//! matches the `visitor_email = ''` predicate.

use rusqlite::{Connection, OptionalExtension, params};

use parlor_core::ids::SessionId;

use crate::errors::Result;
use crate::row_types::SessionRow;

/// Session repository — stateless, every method takes `&Connection`.
pub struct SessionRepo;

impl SessionRepo {
    /// Create a new session with empty contact fields.
    pub fn create(conn: &Connection) -> Result<SessionRow> {
        let id = SessionId::new().into_inner();
        let now = chrono::Utc::now().to_rfc3339();
        let _ = conn.execute(
            "INSERT INTO sessions (id, created_at, updated_at) VALUES (?1, ?2, ?3)",
            params![id, now, now],
        )?;
        Ok(SessionRow {
            id,
            visitor_name: String::new(),
            visitor_email: String::new(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Get a session by ID.
    pub fn get_by_id(conn: &Connection, session_id: &str) -> Result<Option<SessionRow>> {
        let row = conn
            .query_row(
                "SELECT id, visitor_name, visitor_email, created_at, updated_at
                 FROM sessions WHERE id = ?1",
                params![session_id],
                |row| {
                    Ok(SessionRow {
                        id: row.get(0)?,
                        visitor_name: row.get(1)?,
                        visitor_email: row.get(2)?,
                        created_at: row.get(3)?,
                        updated_at: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    /// Bump `updated_at` to now. Returns `true` if the session exists.
    pub fn touch(conn: &Connection, session_id: &str) -> Result<bool> {
        let now = chrono::Utc::now().to_rfc3339();
        let changed = conn.execute(
            "UPDATE sessions SET updated_at = ?1 WHERE id = ?2",
            params![now, session_id],
        )?;
        Ok(changed > 0)
    }

    /// Record visitor contact, only if no email has been captured yet.
    ///
    /// Single conditional UPDATE — returns `true` iff this call performed
    /// the write. A second call (or a racing concurrent one) matches zero
    /// rows and returns `false`, leaving the first capture in place.
    pub fn capture_contact(
        conn: &Connection,
        session_id: &str,
        name: &str,
        email: &str,
    ) -> Result<bool> {
        let now = chrono::Utc::now().to_rfc3339();
        let changed = conn.execute(
            "UPDATE sessions
             SET visitor_name = ?1, visitor_email = ?2, updated_at = ?3
             WHERE id = ?4 AND visitor_email = ''",
            params![name, email, now, session_id],
        )?;
        Ok(changed > 0)
    }

    /// Check if a session exists.
    pub fn exists(conn: &Connection, session_id: &str) -> Result<bool> {
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sessions WHERE id = ?1)",
            params![session_id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// Count total sessions.
    pub fn count(conn: &Connection) -> Result<i64> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))?;
        Ok(count)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
