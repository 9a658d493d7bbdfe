//! # parlor-core
//!
//! Foundation types for the Parlor chat-widget backend.
//!
//! Provides the shared vocabulary the other parlor crates depend on:
//!
//! - **Branded IDs**: [`ids::SessionId`], [`ids::MessageId`] as newtypes
//! - **Chat types**: [`chat::ChatRole`] and [`chat::ChatMessage`] — the
//!   `{role, content}` pairs exchanged with the completion service
//! - **Text helpers**: [`text::truncate_str`] for safe log previews
//!
//! ## Crate Position
//!
//! Foundation crate. Depended on by all other parlor crates.

#![deny(unsafe_code)]

pub mod chat;
pub mod ids;
pub mod text;
