//! # parlor-engine
//!
//! The session/context engine and contact-capture state machine.
//!
//! - [`extract`]: first-match email + display-name extraction from raw
//!   message text
//! - [`context`]: the bounded prior-message window sent to the completion
//!   service
//! - [`turn::TurnEngine`]: the orchestrator — session resolution, message
//!   appends, at-most-once contact capture, completion invocation, and
//!   notification dispatch
//!
//! Every ordering and write-once invariant of the system lives in this
//! crate; storage, completion, and mail are injected collaborators.

#![deny(unsafe_code)]

pub mod context;
pub mod errors;
pub mod extract;
pub mod turn;

pub use context::{DEFAULT_HISTORY_LIMIT, build_context};
pub use errors::TurnError;
pub use extract::{ExtractedContact, extract, is_valid_email};
pub use turn::{TurnEngine, TurnOutcome, TurnRequest};
