//! Fire-and-forget notification dispatch.
//!
//! Each dispatch spawns a detached tokio task whose lifetime outlives the
//! turn that triggered it. Failures are logged here and never propagate —
//! by the time a send fails, the visitor-facing response has already been
//! returned. No retry, no queue.

use std::sync::Arc;

use tracing::{info, warn};

use parlor_store::Transcript;

use crate::config::MailerConfig;
use crate::mailgun::{MailTransport, OutgoingEmail};
use crate::transcript::{render_confirmation, render_transcript};

/// Dispatches transcript and confirmation emails off the request path.
pub struct NotificationDispatcher {
    transport: Arc<dyn MailTransport>,
    config: MailerConfig,
}

impl NotificationDispatcher {
    /// Create a dispatcher over a transport.
    #[must_use]
    pub fn new(transport: Arc<dyn MailTransport>, config: MailerConfig) -> Self {
        Self { transport, config }
    }

    /// Send the transcript to the site owner. Returns immediately.
    pub fn dispatch_transcript(&self, transcript: &Transcript) {
        let email = render_transcript(transcript, &self.config);
        self.spawn_send("transcript", email);
    }

    /// Send the confirmation to the visitor. Returns immediately.
    pub fn dispatch_confirmation(&self, visitor_email: &str, visitor_name: &str) {
        let email = render_confirmation(visitor_email, visitor_name, &self.config);
        self.spawn_send("confirmation", email);
    }

    fn spawn_send(&self, kind: &'static str, email: OutgoingEmail) {
        let transport = Arc::clone(&self.transport);
        let _ = tokio::spawn(async move {
            match transport.send(&email).await {
                Ok(()) => info!(kind, to = %email.to, "notification sent"),
                Err(e) => warn!(kind, to = %email.to, error = %e, "notification send failed"),
            }
        });
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
