//! Completion client errors.

use thiserror::Error;

/// Errors from the completion service call.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Transport-level failure (connect, timeout, body decode).
    #[error("completion transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// Credentials could not be turned into request headers.
    #[error("completion auth error: {0}")]
    Auth(String),

    /// Non-2xx response from the completion API.
    #[error("completion API error (status {status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the error body, or the raw body.
        message: String,
    },

    /// The API answered 2xx but returned no choices.
    #[error("completion response contained no choices")]
    EmptyResponse,
}

/// Convenience result alias.
pub type Result<T> = std::result::Result<T, CompletionError>;
