//! Message repository — append and ordered reads for the `messages` table.
//!
//! Reads return rows in the session's total order: `created_at` ascending
//! with `rowid` as the insertion-order tie-break (RFC 3339 strings can
//! collide at timestamp resolution).

use rusqlite::{Connection, Row, params};
use std::str::FromStr;

use parlor_core::chat::ChatRole;
use parlor_core::ids::MessageId;

use crate::errors::Result;
use crate::row_types::MessageRow;

const SELECT_COLUMNS: &str = "id, session_id, role, content, created_at";

fn map_row(row: &Row<'_>) -> rusqlite::Result<MessageRow> {
    let role_text: String = row.get(2)?;
    let role = ChatRole::from_str(&role_text).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(MessageRow {
        id: row.get(0)?,
        session_id: row.get(1)?,
        role,
        content: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// Message repository — stateless, every method takes `&Connection`.
pub struct MessageRepo;

impl MessageRepo {
    /// Append a message to a session.
    pub fn append(
        conn: &Connection,
        session_id: &str,
        role: ChatRole,
        content: &str,
    ) -> Result<MessageRow> {
        let id = MessageId::new().into_inner();
        let now = chrono::Utc::now().to_rfc3339();
        let _ = conn.execute(
            "INSERT INTO messages (id, session_id, role, content, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![id, session_id, role.as_str(), content, now],
        )?;
        Ok(MessageRow {
            id,
            session_id: session_id.to_owned(),
            role,
            content: content.to_owned(),
            created_at: now,
        })
    }

    /// Earliest-first window of up to `limit` messages for a session.
    pub fn history(conn: &Connection, session_id: &str, limit: usize) -> Result<Vec<MessageRow>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM messages
             WHERE session_id = ?1
             ORDER BY created_at ASC, rowid ASC
             LIMIT ?2"
        ))?;
        let rows = stmt
            .query_map(params![session_id, limit as i64], map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Full message sequence for a session, ascending.
    pub fn list_all(conn: &Connection, session_id: &str) -> Result<Vec<MessageRow>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM messages
             WHERE session_id = ?1
             ORDER BY created_at ASC, rowid ASC"
        ))?;
        let rows = stmt
            .query_map(params![session_id], map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Count messages in a session.
    pub fn count(conn: &Connection, session_id: &str) -> Result<i64> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM messages WHERE session_id = ?1",
            params![session_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
