//! Completion client and the [`CompletionBackend`] trait seam.
//!
//! The client speaks the OpenAI-compatible non-streaming
//! `/chat/completions` protocol with Bearer auth. Generation length and
//! temperature are fixed configuration, not per-request knobs.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::{debug, error};

use parlor_core::chat::ChatMessage;

use crate::error::{CompletionError, Result};
use crate::types::{
    ApiMessage, ChatCompletionRequest, ChatCompletionResponse, CONTEXT_WINDOW, DEFAULT_BASE_URL,
    DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE, parse_error_message,
};

/// Request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// The completion capability the engine depends on.
///
/// One text response per call; the implementation prepends the system
/// preamble and applies the inner context cap.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Produce a reply to `user_message` given the system preamble and the
    /// prior-message context window.
    async fn complete(
        &self,
        system_prompt: &str,
        history: &[ChatMessage],
        user_message: &str,
    ) -> Result<String>;
}

/// Completion client configuration.
#[derive(Clone, Debug)]
pub struct CompletionConfig {
    /// Base URL override. Defaults to [`DEFAULT_BASE_URL`].
    pub base_url: Option<String>,
    /// Model ID.
    pub model: String,
    /// API key sent as `Authorization: Bearer …`.
    pub api_key: String,
    /// Bounded generation length.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            model: DEFAULT_MODEL.into(),
            api_key: String::new(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

/// OpenAI-compatible completion client.
pub struct CompletionClient {
    config: CompletionConfig,
    client: reqwest::Client,
}

impl CompletionClient {
    /// Create a new client with its own HTTP connection pool.
    #[must_use]
    pub fn new(config: CompletionConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self { config, client }
    }

    /// Create a client with a shared HTTP client.
    #[must_use]
    pub fn with_client(config: CompletionConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let _ = headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let auth_value = format!("Bearer {}", self.config.api_key);
        let _ = headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth_value).map_err(|e| {
                CompletionError::Auth(format!("invalid API key header: {e}"))
            })?,
        );
        Ok(headers)
    }

    /// Assemble the message list: system preamble, then the most recent
    /// [`CONTEXT_WINDOW`] entries of the provided window, then the current
    /// user message.
    fn build_messages(
        system_prompt: &str,
        history: &[ChatMessage],
        user_message: &str,
    ) -> Vec<ApiMessage> {
        let start = history.len().saturating_sub(CONTEXT_WINDOW);
        let mut messages = Vec::with_capacity(history.len() - start + 2);
        messages.push(ApiMessage::system(system_prompt));
        messages.extend(history[start..].iter().map(ApiMessage::from));
        messages.push(ApiMessage::user(user_message));
        messages
    }
}

#[async_trait]
impl CompletionBackend for CompletionClient {
    async fn complete(
        &self,
        system_prompt: &str,
        history: &[ChatMessage],
        user_message: &str,
    ) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: Self::build_messages(system_prompt, history, user_message),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let base_url = self.config.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        let url = format!("{base_url}/chat/completions");

        debug!(
            model = %request.model,
            message_count = request.messages.len(),
            max_tokens = request.max_tokens,
            "sending completion request"
        );

        let response = self
            .client
            .post(&url)
            .headers(self.build_headers()?)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = parse_error_message(&body);
            error!(status = status.as_u16(), message = %message, "completion API error");
            return Err(CompletionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatCompletionResponse = response.json().await?;
        let reply = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(CompletionError::EmptyResponse)?;

        debug!(reply_len = reply.len(), "completion succeeded");
        Ok(reply)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
