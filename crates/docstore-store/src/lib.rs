//! docstore Store - JSON documents in a two-column SQLite table
//!
//! Provides:
//! - `ResourceStore`: create / fetch / fetch_all / patch / update / delete / count
//! - Table bootstrap with a checksum ledger (`schema`)
//! - Connection helpers for callers that do not manage their own (`db`)
//!
//! The store borrows a caller-owned `rusqlite::Connection`; it never opens,
//! closes or pools connections itself.

pub mod db;
pub mod errors;
pub mod resource;
pub mod schema;

// Re-export key types
pub use docstore_core::{Record, StoreError, StoreErrorKind};
pub use errors::Result;
pub use resource::ResourceStore;
