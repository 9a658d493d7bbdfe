//! # parlor-store
//!
//! SQLite persistence for the Parlor chat backend.
//!
//! Layering follows the repository pattern: stateless repositories expose
//! per-table operations on a borrowed [`rusqlite::Connection`], and the
//! [`store::ChatStore`] facade composes them over a connection pool with
//! write serialization and SQLITE_BUSY retry.
//!
//! - [`connection`]: r2d2 pool with WAL + foreign-key pragmas
//! - [`migrations`]: idempotent schema creation
//! - [`repositories`]: `SessionRepo`, `MessageRepo`
//! - [`store`]: high-level `ChatStore` — the only type other crates use

#![deny(unsafe_code)]

pub mod connection;
pub mod errors;
pub mod migrations;
pub mod repositories;
pub mod row_types;
pub mod store;

pub use connection::{ConnectionPool, open_pool};
pub use errors::{Result, StoreError};
pub use row_types::{MessageRow, SessionRow};
pub use store::{ChatStore, Transcript};
