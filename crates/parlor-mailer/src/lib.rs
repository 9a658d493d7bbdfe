//! # parlor-mailer
//!
//! Outbound email for the Parlor backend.
//!
//! - [`mailgun::MailgunClient`]: Mailgun HTTP transport (US/EU regions)
//! - [`mailgun::MailTransport`]: the trait seam, with a disabled fallback
//! - [`transcript`]: deterministic text + HTML renderings of transcripts
//!   and visitor confirmations
//! - [`dispatcher::NotificationDispatcher`]: detached best-effort sends —
//!   failures are logged here and never reach the calling turn

#![deny(unsafe_code)]

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod mailgun;
pub mod transcript;

pub use config::{MailerConfig, MailgunRegion};
pub use dispatcher::NotificationDispatcher;
pub use error::MailError;
pub use mailgun::{DisabledTransport, MailTransport, MailgunClient, OutgoingEmail};
