//! Turn processing errors.

use thiserror::Error;

use parlor_llm::CompletionError;
use parlor_store::StoreError;

/// Errors surfaced to the caller of a turn or contact submission.
#[derive(Debug, Error)]
pub enum TurnError {
    /// The inbound message was missing or empty. Nothing was mutated.
    #[error("message is required")]
    EmptyMessage,

    /// The submitted email failed validation. Nothing was mutated.
    #[error("a valid email address is required")]
    InvalidEmail,

    /// The referenced session does not exist (explicit-contact path only —
    /// the chat path degrades to creation instead).
    #[error("session not found: {0}")]
    SessionNotFound(String),

    /// The completion service failed. The user message from this turn
    /// remains persisted; no assistant message was written.
    #[error("completion unavailable: {0}")]
    Completion(#[from] CompletionError),

    /// Storage failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}
