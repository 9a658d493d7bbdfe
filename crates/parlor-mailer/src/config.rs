//! Mailer configuration.
//!
//! Email is optional: a missing or incomplete config disables outbound
//! mail rather than failing startup (the server falls back to
//! [`crate::mailgun::DisabledTransport`]).

use serde::{Deserialize, Serialize};

/// Mailgun API region.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MailgunRegion {
    /// US endpoint (default).
    #[default]
    Us,
    /// EU endpoint.
    Eu,
}

impl MailgunRegion {
    /// API base URL for this region.
    #[must_use]
    pub fn base_url(self) -> &'static str {
        match self {
            Self::Us => "https://api.mailgun.net/v3",
            Self::Eu => "https://api.eu.mailgun.net/v3",
        }
    }
}

/// Mailer configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MailerConfig {
    /// Mailgun sending domain.
    pub domain: String,
    /// Mailgun API key. Usually injected from `PARLOR_MAILGUN_API_KEY`.
    pub api_key: String,
    /// API region.
    pub region: MailgunRegion,
    /// Sender address. Empty defaults to `chat@{domain}`.
    pub from_email: String,
    /// Sender display name.
    pub from_name: String,
    /// Site-owner recipient for transcript notifications.
    pub notify_to: String,
    /// Assistant label in transcript renderings.
    pub product_name: String,
    /// Site label used in subjects and headers (e.g. a hostname).
    pub site_label: String,
    /// Base URL override for tests. Region endpoint when unset.
    pub base_url: Option<String>,
}

impl Default for MailerConfig {
    fn default() -> Self {
        Self {
            domain: String::new(),
            api_key: String::new(),
            region: MailgunRegion::Us,
            from_email: String::new(),
            from_name: "Parlor Chat".into(),
            notify_to: String::new(),
            product_name: "Parlor".into(),
            site_label: String::new(),
            base_url: None,
        }
    }
}

impl MailerConfig {
    /// Whether the config carries everything needed to actually send.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.domain.is_empty() && !self.api_key.is_empty() && !self.notify_to.is_empty()
    }

    /// Resolved sender address.
    #[must_use]
    pub fn sender(&self) -> String {
        let email = if self.from_email.is_empty() {
            format!("chat@{}", self.domain)
        } else {
            self.from_email.clone()
        };
        format!("{} <{email}>", self.from_name)
    }

    /// Resolved API base URL.
    #[must_use]
    pub fn resolved_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.region.base_url())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
