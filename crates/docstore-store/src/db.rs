//! Database connection management
//!
//! Convenience helpers for opening and tuning SQLite connections. The
//! resource store never calls these; connection lifecycle stays with the
//! caller.

use crate::errors::{from_rusqlite, Result};
use docstore_core::StoreErrorKind;
use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;

/// How long a statement waits on a locked database before failing
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open a SQLite database at the given path
///
/// # Errors
///
/// `Persistence` when SQLite cannot open the file.
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    Connection::open(path).map_err(|e| from_rusqlite(StoreErrorKind::Persistence, "open", e))
}

/// Open an in-memory SQLite database (for testing)
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory()
        .map_err(|e| from_rusqlite(StoreErrorKind::Persistence, "open", e))
}

/// Configure a connection with WAL journaling and a busy timeout
///
/// # Errors
///
/// `Persistence` when a pragma cannot be applied.
pub fn configure(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "journal_mode", "WAL")
        .map_err(|e| from_rusqlite(StoreErrorKind::Persistence, "configure", e))?;

    conn.busy_timeout(BUSY_TIMEOUT)
        .map_err(|e| from_rusqlite(StoreErrorKind::Persistence, "configure", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory_and_configure() {
        let conn = open_in_memory().unwrap();
        configure(&conn).unwrap();
    }

    #[test]
    fn test_open_on_disk_uses_wal() {
        let dir = tempfile::tempdir().unwrap();
        let conn = open(dir.path().join("store.db")).unwrap();
        configure(&conn).unwrap();

        let mode: String = conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
    }

    #[test]
    fn test_open_missing_directory_fails_as_persistence() {
        let dir = tempfile::tempdir().unwrap();
        let err = open(dir.path().join("missing").join("store.db")).unwrap_err();
        assert_eq!(err.kind(), StoreErrorKind::Persistence);
        assert_eq!(err.op(), Some("open"));
    }
}
