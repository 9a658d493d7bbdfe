//! Stateless per-table repositories. Every method borrows a
//! [`rusqlite::Connection`]; transactions and pooling live in the
//! [`crate::store::ChatStore`] facade.

pub mod message;
pub mod session;

pub use message::MessageRepo;
pub use session::SessionRepo;
