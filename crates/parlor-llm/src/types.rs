//! Chat-completions wire types and defaults.
//!
//! Covers the OpenAI-compatible `/chat/completions` shape (non-streaming).

use serde::{Deserialize, Serialize};

use parlor_core::chat::{ChatMessage, ChatRole};

/// Default base URL (Grok-compatible endpoint, OpenAI wire format).
pub const DEFAULT_BASE_URL: &str = "https://api.x.ai/v1";

/// Default model.
pub const DEFAULT_MODEL: &str = "grok-3-fast";

/// Default bounded generation length.
pub const DEFAULT_MAX_TOKENS: u32 = 500;

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Inner context cap: at most this many history entries accompany a
/// request, taken from the end of the provided window.
pub const CONTEXT_WINDOW: usize = 10;

// ─────────────────────────────────────────────────────────────────────────────
// Request types
// ─────────────────────────────────────────────────────────────────────────────

/// Role of a message in the completion request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiRole {
    /// Persona/knowledge preamble — prepended by the client, never stored.
    System,
    /// Visitor message.
    User,
    /// Prior model reply.
    Assistant,
}

impl From<ChatRole> for ApiRole {
    fn from(role: ChatRole) -> Self {
        match role {
            ChatRole::User => Self::User,
            ChatRole::Assistant => Self::Assistant,
        }
    }
}

/// A `{role, content}` entry in the request message list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMessage {
    /// Message role.
    pub role: ApiRole,
    /// Message text.
    pub content: String,
}

impl ApiMessage {
    /// System preamble entry.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ApiRole::System,
            content: content.into(),
        }
    }

    /// Current user message entry.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ApiRole::User,
            content: content.into(),
        }
    }
}

impl From<&ChatMessage> for ApiMessage {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            role: msg.role.into(),
            content: msg.content.clone(),
        }
    }
}

/// Request body for `/chat/completions`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    /// Model ID.
    pub model: String,
    /// Ordered message list: system, context window, current user message.
    pub messages: Vec<ApiMessage>,
    /// Bounded generation length.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Response types
// ─────────────────────────────────────────────────────────────────────────────

/// One generated choice.
#[derive(Clone, Debug, Deserialize)]
pub struct ChatChoice {
    /// The generated message.
    pub message: ChoiceMessage,
}

/// Message inside a choice.
#[derive(Clone, Debug, Deserialize)]
pub struct ChoiceMessage {
    /// Generated text.
    #[serde(default)]
    pub content: String,
}

/// Response body for `/chat/completions`.
#[derive(Clone, Debug, Deserialize)]
pub struct ChatCompletionResponse {
    /// Generated choices (the client uses the first).
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

/// Extract a human-readable message from an error body.
///
/// Understands the OpenAI `{"error": {"message": …}}` shape and falls back
/// to the raw body.
#[must_use]
pub fn parse_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")?
                .get("message")?
                .as_str()
                .map(ToOwned::to_owned)
        })
        .unwrap_or_else(|| body.to_owned())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
