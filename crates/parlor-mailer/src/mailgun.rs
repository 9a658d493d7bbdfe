//! Mailgun HTTP transport.
//!
//! Posts urlencoded form fields to
//! `{base}/{domain}/messages` with basic auth (`api:{key}`). Delivery is
//! best-effort; callers (the dispatcher) log and discard failures.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::MailerConfig;
use crate::error::MailError;

/// Request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// An email ready for delivery.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutgoingEmail {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain text body.
    pub text: String,
    /// Optional HTML body.
    pub html: Option<String>,
}

/// Best-effort outbound email delivery.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Deliver one email.
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError>;
}

/// Mailgun-backed transport.
pub struct MailgunClient {
    config: MailerConfig,
    client: reqwest::Client,
}

impl MailgunClient {
    /// Create a new client from a complete config.
    #[must_use]
    pub fn new(config: MailerConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self { config, client }
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/{}/messages",
            self.config.resolved_base_url(),
            self.config.domain
        )
    }
}

#[async_trait]
impl MailTransport for MailgunClient {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        let sender = self.config.sender();
        let mut form: Vec<(&str, &str)> = vec![
            ("from", sender.as_str()),
            ("to", email.to.as_str()),
            ("subject", email.subject.as_str()),
            ("text", email.text.as_str()),
        ];
        if let Some(ref html) = email.html {
            form.push(("html", html.as_str()));
        }

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth("api", Some(&self.config.api_key))
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "mailgun rejected message");
            return Err(MailError::Api {
                status: status.as_u16(),
                body,
            });
        }

        debug!(to = %email.to, subject = %email.subject, "email accepted by mailgun");
        Ok(())
    }
}

/// Fallback transport used when no mailer is configured. Every send fails
/// with [`MailError::Disabled`], which the dispatcher logs and drops.
pub struct DisabledTransport;

#[async_trait]
impl MailTransport for DisabledTransport {
    async fn send(&self, _email: &OutgoingEmail) -> Result<(), MailError> {
        Err(MailError::Disabled)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
