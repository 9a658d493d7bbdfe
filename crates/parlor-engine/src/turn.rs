//! The turn orchestrator.
//!
//! One inbound chat message runs through a fixed step sequence:
//!
//! 1. resolve or create the session (never fails into "not found")
//! 2. append the user message
//! 3. build the context window from pre-current-message history
//! 4. capture contact at most once, dispatching notifications on success
//! 5. invoke the completion service — failure aborts the turn here
//! 6. append the assistant message
//! 7. return the outcome
//!
//! The user message stays persisted when step 5 fails — the visitor did
//! send it. The assistant message is only ever written after a successful
//! completion, which is what keeps stored turns logically alternating.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use parlor_core::chat::ChatRole;
use parlor_core::text::preview;
use parlor_llm::CompletionBackend;
use parlor_mailer::NotificationDispatcher;
use parlor_store::ChatStore;

use crate::context::build_context;
use crate::errors::TurnError;
use crate::extract::{extract, is_valid_email};

/// One inbound chat turn.
#[derive(Clone, Debug)]
pub struct TurnRequest {
    /// Raw visitor message. Must be non-empty.
    pub message: String,
    /// Caller-supplied session identity, if the widget has one.
    pub session_id: Option<String>,
}

/// Result of a processed turn.
#[derive(Clone, Debug)]
pub struct TurnOutcome {
    /// Assistant reply text.
    pub reply: String,
    /// Session identity (fresh when the supplied one did not resolve).
    pub session_id: String,
    /// Whether contact information was captured during this turn.
    pub contact_captured: bool,
}

/// Orchestrates turn processing over injected collaborators.
pub struct TurnEngine {
    store: Arc<ChatStore>,
    completion: Arc<dyn CompletionBackend>,
    dispatcher: Arc<NotificationDispatcher>,
    system_prompt: Arc<str>,
    history_limit: usize,
}

impl TurnEngine {
    /// Create an engine.
    #[must_use]
    pub fn new(
        store: Arc<ChatStore>,
        completion: Arc<dyn CompletionBackend>,
        dispatcher: Arc<NotificationDispatcher>,
        system_prompt: impl Into<Arc<str>>,
        history_limit: usize,
    ) -> Self {
        Self {
            store,
            completion,
            dispatcher,
            system_prompt: system_prompt.into(),
            history_limit,
        }
    }

    /// Process one chat turn.
    #[instrument(skip_all, fields(session_id = request.session_id.as_deref().unwrap_or("")))]
    pub async fn process_turn(&self, request: TurnRequest) -> Result<TurnOutcome, TurnError> {
        if request.message.is_empty() {
            return Err(TurnError::EmptyMessage);
        }

        let session = self.store.resolve_or_create(request.session_id.as_deref())?;
        let _ = self
            .store
            .append_message(&session.id, ChatRole::User, &request.message)?;

        let context = build_context(&self.store, &session.id, self.history_limit)?;
        let contact_captured = self.capture_from_message(&session.id, &request.message)?;

        let reply = self
            .completion
            .complete(&self.system_prompt, &context, &request.message)
            .await
            .map_err(|e| {
                warn!(session_id = %session.id, error = %e, "completion failed, turn aborted");
                e
            })?;

        let _ = self
            .store
            .append_message(&session.id, ChatRole::Assistant, &reply)?;

        info!(
            session_id = %session.id,
            contact_captured,
            message = %preview(&request.message, 64),
            "turn completed"
        );

        Ok(TurnOutcome {
            reply,
            session_id: session.id,
            contact_captured,
        })
    }

    /// Explicit (non-heuristic) contact submission.
    ///
    /// Requires an existing session and a valid address. The email write
    /// stays at-most-once, but a transcript is always dispatched — the
    /// visitor just asked to be contacted.
    pub fn submit_contact(
        &self,
        session_id: &str,
        name: Option<&str>,
        email: &str,
    ) -> Result<(), TurnError> {
        if !is_valid_email(email) {
            return Err(TurnError::InvalidEmail);
        }
        if self.store.session(session_id)?.is_none() {
            return Err(TurnError::SessionNotFound(session_id.to_owned()));
        }

        let captured = self
            .store
            .capture_contact(session_id, name.unwrap_or(""), email)?;
        info!(session_id, captured, "explicit contact submission");

        if let Some(transcript) = self.store.transcript(session_id)? {
            self.dispatcher.dispatch_transcript(&transcript);
        }
        Ok(())
    }

    /// Step 4: run the extractor and attempt the at-most-once capture.
    ///
    /// The transcript is fetched after the contact write so the dispatched
    /// rendering already reflects the visitor's identity.
    fn capture_from_message(&self, session_id: &str, message: &str) -> Result<bool, TurnError> {
        let Some(contact) = extract(message) else {
            return Ok(false);
        };

        let captured = self
            .store
            .capture_contact(session_id, &contact.name, &contact.email)?;
        if !captured {
            return Ok(false);
        }

        info!(session_id, "visitor contact captured");
        if let Some(transcript) = self.store.transcript(session_id)? {
            self.dispatcher.dispatch_transcript(&transcript);
        }
        self.dispatcher
            .dispatch_confirmation(&contact.email, &contact.name);
        Ok(true)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
