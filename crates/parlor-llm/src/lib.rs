//! # parlor-llm
//!
//! Chat completion client for the Parlor backend.
//!
//! - [`client::CompletionClient`]: OpenAI-compatible `/chat/completions`
//!   over reqwest with bearer auth and fixed generation settings
//! - [`client::CompletionBackend`]: the trait seam the engine depends on
//! - [`prompt`]: multi-fragment system prompt assembly, run once at startup
//! - [`types`]: request/response wire types

#![deny(unsafe_code)]

pub mod client;
pub mod error;
pub mod prompt;
pub mod types;

pub use client::{CompletionBackend, CompletionClient, CompletionConfig};
pub use error::CompletionError;
pub use prompt::assemble_system_prompt;
