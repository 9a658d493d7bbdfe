//! Mail transport errors. These never propagate past the dispatcher.

use thiserror::Error;

/// Errors from outbound email delivery.
#[derive(Debug, Error)]
pub enum MailError {
    /// Transport-level failure.
    #[error("mail transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response from the mail API.
    #[error("mail API error (status {status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// No transport is configured; the message was dropped.
    #[error("mail transport is not configured")]
    Disabled,
}
