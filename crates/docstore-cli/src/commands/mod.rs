//! CLI command implementations

pub mod init;
pub mod resource;

use docstore_store::{db, schema};
use rusqlite::Connection;
use std::path::PathBuf;

/// Where a command reads and writes
#[derive(Debug, Clone)]
pub struct Target {
    pub db: PathBuf,
    pub table: String,
}

impl Target {
    /// Open the database, creating its directory and the table if needed
    pub fn connect(&self) -> Result<Connection, Box<dyn std::error::Error>> {
        if let Some(parent) = self.db.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut conn = db::open(&self.db)?;
        db::configure(&conn)?;
        schema::ensure_table(&mut conn, &self.table)?;
        Ok(conn)
    }
}
