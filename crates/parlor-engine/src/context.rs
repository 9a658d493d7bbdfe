//! Context window construction.
//!
//! Derives the bounded prior-message slice sent to the completion service
//! from stored history. The just-appended current user message is supplied
//! to the completion call separately, so it is excluded here. A second,
//! fixed cap of 10 is applied later by the completion client from the end
//! of this window.

use parlor_core::chat::ChatMessage;
use parlor_store::{ChatStore, errors::Result};

/// Default outer store-read cap.
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Build the context window for a session.
///
/// Reads up to `max_history` earliest-first messages, drops the most
/// recent entry of that window, and maps the rest to `{role, content}`
/// pairs in order. Fewer than 2 stored messages (or an unknown session)
/// produce an empty sequence — never an error.
pub fn build_context(
    store: &ChatStore,
    session_id: &str,
    max_history: usize,
) -> Result<Vec<ChatMessage>> {
    let mut rows = store.history(session_id, max_history)?;
    if rows.len() < 2 {
        return Ok(Vec::new());
    }
    let _ = rows.pop();
    Ok(rows
        .into_iter()
        .map(|row| ChatMessage {
            role: row.role,
            content: row.content,
        })
        .collect())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use parlor_core::chat::ChatRole;
    use parlor_store::connection::open_pool;

    fn setup() -> (tempfile::TempDir, ChatStore) {
        let dir = tempfile::tempdir().unwrap();
        let pool = open_pool(&dir.path().join("chat.db"), 2).unwrap();
        (dir, ChatStore::new(pool))
    }

    fn fill(store: &ChatStore, session_id: &str, count: usize) {
        for i in 0..count {
            let role = if i % 2 == 0 {
                ChatRole::User
            } else {
                ChatRole::Assistant
            };
            let _ = store
                .append_message(session_id, role, &format!("m{i}"))
                .unwrap();
        }
    }

    #[test]
    fn unknown_session_yields_empty_context() {
        let (_dir, store) = setup();
        let context = build_context(&store, "sess_missing", 10).unwrap();
        assert!(context.is_empty());
    }

    #[test]
    fn single_message_yields_empty_context() {
        let (_dir, store) = setup();
        let session = store.resolve_or_create(None).unwrap();
        fill(&store, &session.id, 1);

        let context = build_context(&store, &session.id, 10).unwrap();
        assert!(context.is_empty());
    }

    #[test]
    fn most_recent_window_entry_is_excluded() {
        let (_dir, store) = setup();
        let session = store.resolve_or_create(None).unwrap();
        fill(&store, &session.id, 3);

        let context = build_context(&store, &session.id, 10).unwrap();
        let contents: Vec<&str> = context.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["m0", "m1"]);
    }

    #[test]
    fn order_is_chronological() {
        let (_dir, store) = setup();
        let session = store.resolve_or_create(None).unwrap();
        fill(&store, &session.id, 5);

        let context = build_context(&store, &session.id, 10).unwrap();
        assert_eq!(context[0].content, "m0");
        assert_eq!(context[0].role, ChatRole::User);
        assert_eq!(context[1].role, ChatRole::Assistant);
        assert_eq!(context.last().unwrap().content, "m3");
    }

    #[test]
    fn outer_cap_bounds_the_window() {
        let (_dir, store) = setup();
        let session = store.resolve_or_create(None).unwrap();
        fill(&store, &session.id, 8);

        let context = build_context(&store, &session.id, 4).unwrap();
        // Window is the earliest 4, minus its most recent entry
        assert_eq!(context.len(), 3);
        assert_eq!(context[0].content, "m0");
        assert_eq!(context[2].content, "m2");
    }

    #[test]
    fn context_length_never_exceeds_cap_minus_one() {
        let (_dir, store) = setup();
        let session = store.resolve_or_create(None).unwrap();
        fill(&store, &session.id, 20);

        let context = build_context(&store, &session.id, 10).unwrap();
        assert_eq!(context.len(), 9);
    }
}
