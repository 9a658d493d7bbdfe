//! Chat message vocabulary shared between storage, engine, and the
//! completion client.
//!
//! Only two roles ever reach storage: `user` and `assistant`. The system
//! preamble is prepended by the completion client and never persisted.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a stored chat message. Closed enumeration — system/tool roles
/// never reach the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// A message typed by the website visitor.
    User,
    /// A reply produced by the completion service.
    Assistant,
}

impl ChatRole {
    /// Stable lowercase wire/database form.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored role string is not part of the closed set.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown chat role: {0}")]
pub struct UnknownRole(pub String);

impl std::str::FromStr for ChatRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}

/// A `{role, content}` pair — the unit of conversation context sent to the
/// completion service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message role.
    pub role: ChatRole,
    /// Raw message text.
    pub content: String,
}

impl ChatMessage {
    /// Create a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    /// Create an assistant message.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
