//! Resource table schema
//!
//! Provides:
//! - Table name validation and quoting
//! - `ensure_table`: idempotent creation of the `(id, data)` table, recorded
//!   with a SHA-256 checksum in a `schema_version` ledger

use crate::errors::{from_rusqlite, schema_error, Result};
use docstore_core::{ResourceError, StoreError, StoreErrorKind};
use rusqlite::{Connection, OptionalExtension};
use sha2::{Digest, Sha256};

/// Table used when callers do not configure one
pub const DEFAULT_TABLE: &str = "collection";

const RESOURCE_TABLE_SQL: &str = include_str!("../sql/resource_table.sql");

/// Check that a table name is a plain SQL identifier
///
/// Table names end up inside SQL text, so anything beyond
/// `[A-Za-z_][A-Za-z0-9_]*` is rejected.
///
/// # Errors
///
/// `InvalidInput` when the name is not a plain identifier.
pub fn validate_table_name(table: &str) -> Result<()> {
    let mut chars = table.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(StoreError::from(ResourceError::InvalidTableName {
            table: table.to_string(),
        }))
    }
}

/// Quote a validated identifier for interpolation
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name)
}

/// Render the DDL for a resource table
pub fn table_ddl(table: &str) -> String {
    RESOURCE_TABLE_SQL.replace("{table}", &quote_identifier(table))
}

/// Compute SHA256 checksum of a string
pub fn compute_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// Create the resource table if it does not exist yet
///
/// The DDL runs on every call, so a table dropped after bootstrap is
/// recreated. The ledger row is written once. A ledger entry whose checksum
/// disagrees with the current DDL fails with a `Persistence` error rather
/// than silently running against a table of unknown shape.
///
/// # Errors
///
/// `InvalidInput` for a bad table name, `Persistence` for checksum drift or
/// any SQLite failure while creating the table.
pub fn ensure_table(conn: &mut Connection, table: &str) -> Result<()> {
    validate_table_name(table)?;
    create_schema_version_table(conn)?;

    let migration_id = migration_id(table);
    let ddl = table_ddl(table);
    let checksum = compute_checksum(&ddl);

    let recorded: Option<Option<String>> = conn
        .query_row(
            "SELECT checksum FROM schema_version WHERE migration_id = ?1",
            [&migration_id],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| from_rusqlite(StoreErrorKind::Persistence, "ensure_table", e))?;

    if let Some(Some(expected)) = &recorded {
        if *expected != checksum {
            return Err(StoreError::from(ResourceError::SchemaChecksumMismatch {
                table: table.to_string(),
                expected: expected.clone(),
                actual: checksum,
            })
            .with_op("ensure_table"));
        }
    }

    let tx = conn
        .transaction()
        .map_err(|e| from_rusqlite(StoreErrorKind::Persistence, "ensure_table", e))?;

    tx.execute_batch(&ddl)
        .map_err(|e| schema_error(table, &e.to_string()))?;

    if recorded.is_none() {
        let now = chrono::Utc::now().timestamp();
        tx.execute(
            "INSERT INTO schema_version (migration_id, applied_at, checksum) VALUES (?1, ?2, ?3)",
            rusqlite::params![migration_id, now, checksum],
        )
        .map_err(|e| from_rusqlite(StoreErrorKind::Persistence, "ensure_table", e))?;
    }

    tx.commit()
        .map_err(|e| from_rusqlite(StoreErrorKind::Persistence, "ensure_table", e))?;

    tracing::debug!(table = table, checksum = checksum.as_str(), "resource table ready");

    Ok(())
}

fn migration_id(table: &str) -> String {
    format!("resource_table:{}", table)
}

fn create_schema_version_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY,
            migration_id TEXT NOT NULL UNIQUE,
            applied_at INTEGER NOT NULL,
            checksum TEXT
        )",
        [],
    )
    .map_err(|e| from_rusqlite(StoreErrorKind::Persistence, "ensure_table", e))?;

    Ok(())
}
