//! # parlor-server
//!
//! HTTP surface for the Parlor chat backend.
//!
//! - [`routes`]: axum router — `POST /api/chat`, `POST /api/contact`,
//!   `GET /health` — with configurable CORS
//! - [`error`]: turn error → HTTP status mapping with sanitized bodies
//! - [`settings`]: layered configuration (defaults ← file ← env)
//! - [`logging`]: tracing subscriber setup

#![deny(unsafe_code)]

pub mod error;
pub mod logging;
pub mod routes;
pub mod settings;

pub use routes::{AppState, router};
pub use settings::ParlorSettings;
