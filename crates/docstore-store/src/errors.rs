//! Error handling for docstore-store
//!
//! Wraps docstore-core StoreError with SQLite-specific helpers

use docstore_core::{StoreError, StoreErrorKind};

/// Result type alias using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;

/// Create a store error from a rusqlite::Error
///
/// SQLite failures keep their extended result code so callers can tell a
/// constraint violation from a locked database.
pub fn from_rusqlite(kind: StoreErrorKind, op: &str, err: rusqlite::Error) -> StoreError {
    let driver_code = match &err {
        rusqlite::Error::SqliteFailure(failure, _) => Some(failure.extended_code),
        _ => None,
    };

    let ex = StoreError::new(kind)
        .with_op(op)
        .with_message(err.to_string());

    match driver_code {
        Some(code) => ex.with_driver_code(code),
        None => ex,
    }
}

/// Create a table bootstrap error
pub fn schema_error(table: &str, reason: &str) -> StoreError {
    StoreError::new(StoreErrorKind::Persistence)
        .with_op("ensure_table")
        .with_table(table)
        .with_message(format!("Creating table {} failed: {}", table, reason))
}
