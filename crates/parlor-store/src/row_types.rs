//! Row structs returned by the repositories.

use parlor_core::chat::ChatRole;

/// A row from the `sessions` table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionRow {
    /// Session identifier (`sess_` + UUID v7).
    pub id: String,
    /// Captured visitor name. Empty means unset.
    pub visitor_name: String,
    /// Captured visitor email. Empty means unset — presence is the single
    /// source of truth for "contact captured".
    pub visitor_email: String,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    /// RFC 3339 last-mutation timestamp.
    pub updated_at: String,
}

impl SessionRow {
    /// Whether contact information has been captured for this session.
    #[must_use]
    pub fn contact_captured(&self) -> bool {
        !self.visitor_email.is_empty()
    }
}

/// A row from the `messages` table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageRow {
    /// Message identifier (`msg_` + UUID v7).
    pub id: String,
    /// Owning session.
    pub session_id: String,
    /// Message role.
    pub role: ChatRole,
    /// Raw message text.
    pub content: String,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
