//! docstore Core - records, identifiers and the shared facilities
//!
//! This crate provides the pieces every other docstore crate builds on:
//! - `Record`, the JSON document stored under a generated `id`
//! - Identifier generation (32 lowercase hex characters)
//! - The structured error facility (`StoreError`, `StoreErrorKind`)
//! - The structured logging facility (`init`, `log_op_*` macros, test capture)

pub mod errors;
pub mod id;
pub mod logging_facility;
pub mod model;

// Re-exported so the logging macros resolve from any calling crate
pub use docstore_core_types as core_types;

// Re-export commonly used types
pub use errors::{ResourceError, Result, StoreError, StoreErrorKind};
pub use id::{generate_id, IdGenerator, RandomIdGenerator};
pub use model::Record;
