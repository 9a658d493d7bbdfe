//! High-level `ChatStore` facade.
//!
//! Composes the repositories over a connection pool. Multi-statement
//! writes run inside `SAVEPOINT`/`RELEASE` blocks so callers never see
//! partial state.
//!
//! INVARIANT: writes are serialized through an in-process lock and retried
//! on SQLITE_BUSY with linear backoff + jitter, so concurrent turns across
//! sessions degrade gracefully instead of erroring. The contact write is a
//! conditional UPDATE — see [`SessionRepo::capture_contact`].

use std::time::Duration;

use parking_lot::Mutex;
use rusqlite::Connection;
use tracing::debug;

use parlor_core::chat::ChatRole;

use crate::connection::ConnectionPool;
use crate::errors::{Result, StoreError};
use crate::repositories::{MessageRepo, SessionRepo};
use crate::row_types::{MessageRow, SessionRow};

/// A session plus its full ordered message sequence — assembled on demand,
/// never persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transcript {
    /// Session header fields.
    pub session: SessionRow,
    /// Every message, chronologically ascending.
    pub messages: Vec<MessageRow>,
}

/// Durable keyed storage for sessions and their ordered messages.
pub struct ChatStore {
    pool: ConnectionPool,
    write_lock: Mutex<()>,
}

impl ChatStore {
    const BUSY_MAX_RETRIES: u32 = 16;

    /// Create a store over an initialized pool (migrations already run).
    #[must_use]
    pub fn new(pool: ConnectionPool) -> Self {
        Self {
            pool,
            write_lock: Mutex::new(()),
        }
    }

    /// Resolve a caller-supplied session ID, creating a fresh session when
    /// the ID is absent or does not resolve. Never fails into "not found".
    pub fn resolve_or_create(&self, session_id: Option<&str>) -> Result<SessionRow> {
        let _guard = self.write_lock.lock();
        let conn = self.pool.get()?;
        Self::retry_on_busy(|| {
            if let Some(id) = session_id {
                if let Some(row) = SessionRepo::get_by_id(&conn, id)? {
                    return Ok(row);
                }
                debug!(session_id = id, "supplied session did not resolve, creating fresh");
            }
            SessionRepo::create(&conn)
        })
    }

    /// Fetch a session by ID.
    pub fn session(&self, session_id: &str) -> Result<Option<SessionRow>> {
        let conn = self.pool.get()?;
        Self::retry_on_busy(|| SessionRepo::get_by_id(&conn, session_id))
    }

    /// Append a message and bump the session's `updated_at`, atomically.
    pub fn append_message(
        &self,
        session_id: &str,
        role: ChatRole,
        content: &str,
    ) -> Result<MessageRow> {
        let _guard = self.write_lock.lock();
        let conn = self.pool.get()?;
        Self::retry_on_busy(|| {
            Self::in_savepoint(&conn, "append_message", || {
                let row = MessageRepo::append(&conn, session_id, role, content)?;
                let _ = SessionRepo::touch(&conn, session_id)?;
                Ok(row)
            })
        })
    }

    /// Record visitor contact if and only if none has been captured yet.
    /// Returns whether this call performed the write.
    pub fn capture_contact(&self, session_id: &str, name: &str, email: &str) -> Result<bool> {
        let _guard = self.write_lock.lock();
        let conn = self.pool.get()?;
        Self::retry_on_busy(|| SessionRepo::capture_contact(&conn, session_id, name, email))
    }

    /// Earliest-first window of up to `limit` messages.
    pub fn history(&self, session_id: &str, limit: usize) -> Result<Vec<MessageRow>> {
        let conn = self.pool.get()?;
        Self::retry_on_busy(|| MessageRepo::history(&conn, session_id, limit))
    }

    /// Full transcript projection for a session. `None` for unknown IDs.
    pub fn transcript(&self, session_id: &str) -> Result<Option<Transcript>> {
        let conn = self.pool.get()?;
        Self::retry_on_busy(|| {
            let Some(session) = SessionRepo::get_by_id(&conn, session_id)? else {
                return Ok(None);
            };
            let messages = MessageRepo::list_all(&conn, session_id)?;
            Ok(Some(Transcript { session, messages }))
        })
    }

    /// Run `f` inside a named savepoint, rolling back on error.
    fn in_savepoint<T>(
        conn: &Connection,
        name: &str,
        f: impl FnOnce() -> Result<T>,
    ) -> Result<T> {
        conn.execute_batch(&format!("SAVEPOINT {name}"))?;
        match f() {
            Ok(value) => {
                conn.execute_batch(&format!("RELEASE {name}"))?;
                Ok(value)
            }
            Err(err) => {
                let _ = conn.execute_batch(&format!("ROLLBACK TO {name}; RELEASE {name}"));
                Err(err)
            }
        }
    }

    /// Retry an operation on SQLITE_BUSY/LOCKED with linear backoff + jitter.
    fn retry_on_busy<T>(mut f: impl FnMut() -> Result<T>) -> Result<T> {
        let mut attempts = 0;
        loop {
            match f() {
                Ok(value) => return Ok(value),
                Err(err) if Self::is_busy_or_locked(&err) && attempts < Self::BUSY_MAX_RETRIES => {
                    attempts += 1;
                    let base_ms = u64::from(attempts).saturating_mul(10).min(250);
                    let jitter = rand::random::<u64>() % (base_ms / 2 + 1);
                    std::thread::sleep(Duration::from_millis(base_ms / 2 + jitter));
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn is_busy_or_locked(err: &StoreError) -> bool {
        match err {
            StoreError::Sqlite(rusqlite::Error::SqliteFailure(code, _)) => matches!(
                code.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            ),
            _ => false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
