//! Resource store
//!
//! Maps CRUD calls onto single SQL statements against one `(id, data)`
//! table. JSON is encoded and decoded at the boundary of each operation;
//! the table never sees anything but the serialized document.
//!
//! Every statement runs on the borrowed connection without a transaction.
//! In particular `patch` reads and then writes, so two concurrent patches
//! to the same id can lose an update. Callers that need safe concurrent
//! patches must serialize access to an id themselves.

use crate::errors::{from_rusqlite, Result};
use crate::schema::{quote_identifier, validate_table_name};
use docstore_core::id::{IdGenerator, RandomIdGenerator};
use docstore_core::{log_op_end, log_op_error, log_op_start};
use docstore_core::{Record, ResourceError, StoreError, StoreErrorKind};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use serde_json::{Map, Value};
use std::time::Instant;

/// SQL text for one table, rendered once at construction
#[derive(Debug, Clone)]
struct Statements {
    insert: String,
    select_one: String,
    select_all: String,
    select_limit: String,
    select_limit_offset: String,
    update: String,
    delete: String,
    count: String,
}

impl Statements {
    fn for_table(table: &str) -> Self {
        let t = quote_identifier(table);
        let select_all = format!("SELECT data FROM {} ORDER BY rowid", t);
        Self {
            insert: format!("INSERT INTO {} (id, data) VALUES (?1, ?2)", t),
            select_one: format!("SELECT data FROM {} WHERE id = ?1", t),
            select_limit: format!("{} LIMIT ?1", select_all),
            select_limit_offset: format!("{} LIMIT ?1 OFFSET ?2", select_all),
            select_all,
            update: format!("UPDATE {} SET data = ?1 WHERE id = ?2", t),
            delete: format!("DELETE FROM {} WHERE id = ?1", t),
            count: format!("SELECT COUNT(*) FROM {}", t),
        }
    }
}

/// JSON document store over one SQLite table
///
/// The table must have an `id TEXT PRIMARY KEY` and a `data TEXT` column
/// and be an ordinary rowid table; `schema::ensure_table` creates one.
pub struct ResourceStore<'conn> {
    conn: &'conn Connection,
    table: String,
    sql: Statements,
    ids: Box<dyn IdGenerator + 'conn>,
}

impl<'conn> ResourceStore<'conn> {
    /// Create a store over `table` using the caller's connection
    ///
    /// `table` must be a rowid table: `fetch_all` orders by `rowid`, so on a
    /// `WITHOUT ROWID` table it fails with `Fetch`. Tables created by
    /// `schema::ensure_table` always qualify.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidInput` when `table` is not a plain identifier.
    pub fn new(conn: &'conn Connection, table: impl Into<String>) -> Result<Self> {
        let table = table.into();
        validate_table_name(&table)?;

        Ok(Self {
            conn,
            sql: Statements::for_table(&table),
            table,
            ids: Box::new(RandomIdGenerator),
        })
    }

    /// Replace the identifier source
    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'conn) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Insert a new record under a freshly generated id
    ///
    /// Any `id` in `fields` is overwritten.
    ///
    /// # Errors
    ///
    /// `Insert` when the insert statement fails (e.g. a constraint violation).
    pub fn create(&self, fields: Map<String, Value>) -> Result<Record> {
        let start = Instant::now();
        log_op_start!("create", table = self.table.as_str());

        let result = self.create_inner(fields);
        self.finish("create", start, result)
    }

    /// Fetch one record by id
    ///
    /// # Errors
    ///
    /// `Fetch` when no row matches (see `StoreError::is_not_found`) or the
    /// select fails.
    pub fn fetch(&self, id: &str) -> Result<Record> {
        let start = Instant::now();
        log_op_start!("fetch", table = self.table.as_str(), resource_id = id);

        let result = self.fetch_inner(id);
        self.finish("fetch", start, result)
    }

    /// Fetch records in creation order
    ///
    /// `offset` only applies together with `limit`.
    ///
    /// # Errors
    ///
    /// `Fetch` when the select fails or a stored document cannot be decoded.
    pub fn fetch_all(&self, limit: Option<u32>, offset: Option<u32>) -> Result<Vec<Record>> {
        let start = Instant::now();
        log_op_start!("fetch_all", table = self.table.as_str(), limit = limit, offset = offset);

        let result = self.fetch_all_inner(limit, offset);
        if let Ok(records) = &result {
            tracing::debug!(table = self.table.as_str(), rows = records.len(), "fetched records");
        }
        self.finish("fetch_all", start, result)
    }

    /// Merge `fields` over the stored record
    ///
    /// Keys in `fields` win, all other stored keys are kept, `id` is left
    /// unchanged. The read and the write are separate statements.
    ///
    /// # Errors
    ///
    /// `Fetch` when the record does not exist, `Patch` when the update fails.
    pub fn patch(&self, id: &str, fields: Map<String, Value>) -> Result<Record> {
        let start = Instant::now();
        log_op_start!("patch", table = self.table.as_str(), resource_id = id);

        let result = self.patch_inner(id, fields);
        self.finish("patch", start, result)
    }

    /// Replace the stored record with `fields`
    ///
    /// Existence is not checked first. Updating an unknown id affects no
    /// rows and still returns the supplied record; the affected-row count
    /// is logged.
    ///
    /// # Errors
    ///
    /// `Update` when the update statement fails.
    pub fn update(&self, id: &str, fields: Map<String, Value>) -> Result<Record> {
        let start = Instant::now();
        log_op_start!("update", table = self.table.as_str(), resource_id = id);

        let result = self.update_inner(id, fields);
        self.finish("update", start, result)
    }

    /// Delete a record, returning whether a row was removed
    ///
    /// # Errors
    ///
    /// `Update` when the delete statement fails. A missing id is not an
    /// error.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let start = Instant::now();
        log_op_start!("delete", table = self.table.as_str(), resource_id = id);

        let result = self.delete_inner(id);
        self.finish("delete", start, result)
    }

    /// Number of records in the table
    ///
    /// # Errors
    ///
    /// `Fetch` when the count query fails.
    pub fn count(&self) -> Result<u64> {
        let start = Instant::now();
        log_op_start!("count", table = self.table.as_str());

        let result = self.count_inner();
        self.finish("count", start, result)
    }

    fn create_inner(&self, fields: Map<String, Value>) -> Result<Record> {
        let id = self.ids.generate();
        let record = Record::from_fields(fields).with_id(id.as_str());
        let json = self.encode(&record, StoreErrorKind::Insert, "create", &id)?;

        self.conn
            .prepare_cached(&self.sql.insert)
            .and_then(|mut stmt| stmt.execute(params![id, json]))
            .map_err(|e| self.driver_error(StoreErrorKind::Insert, "create", &id, e))?;

        Ok(record)
    }

    fn fetch_inner(&self, id: &str) -> Result<Record> {
        let json: Option<String> = self
            .conn
            .prepare_cached(&self.sql.select_one)
            .and_then(|mut stmt| stmt.query_row([id], |row| row.get(0)).optional())
            .map_err(|e| self.driver_error(StoreErrorKind::Fetch, "fetch", id, e))?;

        let json = json.ok_or_else(|| {
            StoreError::from(ResourceError::NotFound { id: id.to_string() })
                .with_op("fetch")
                .with_table(self.table.as_str())
        })?;

        self.decode(&json, Some(id))
    }

    fn fetch_all_inner(&self, limit: Option<u32>, offset: Option<u32>) -> Result<Vec<Record>> {
        let (sql, args): (&str, Vec<u32>) = match (limit, offset) {
            (None, _) => (self.sql.select_all.as_str(), Vec::new()),
            (Some(limit), None) => (self.sql.select_limit.as_str(), vec![limit]),
            (Some(limit), Some(offset)) => {
                (self.sql.select_limit_offset.as_str(), vec![limit, offset])
            }
        };

        let documents = self
            .query_documents(sql, &args)
            .map_err(|e| {
                from_rusqlite(StoreErrorKind::Fetch, "fetch_all", e).with_table(self.table.as_str())
            })?;

        documents
            .iter()
            .map(|json| self.decode(json, None))
            .collect()
    }

    fn patch_inner(&self, id: &str, fields: Map<String, Value>) -> Result<Record> {
        let existing = self.fetch_inner(id)?;
        let patched = existing.merge(fields).with_id(id);
        let json = self.encode(&patched, StoreErrorKind::Patch, "patch", id)?;

        self.execute_update(&json, id)
            .map_err(|e| self.driver_error(StoreErrorKind::Patch, "patch", id, e))?;

        Ok(patched)
    }

    fn update_inner(&self, id: &str, fields: Map<String, Value>) -> Result<Record> {
        let record = Record::from_fields(fields).with_id(id);
        let json = self.encode(&record, StoreErrorKind::Update, "update", id)?;

        let rows_affected = self
            .execute_update(&json, id)
            .map_err(|e| self.driver_error(StoreErrorKind::Update, "update", id, e))?;

        if rows_affected == 0 {
            tracing::warn!(
                table = self.table.as_str(),
                resource_id = id,
                rows_affected = rows_affected,
                "update matched no rows"
            );
        }

        Ok(record)
    }

    fn delete_inner(&self, id: &str) -> Result<bool> {
        // Delete failures share the update kind; `op` tells them apart
        let rows_affected = self
            .conn
            .prepare_cached(&self.sql.delete)
            .and_then(|mut stmt| stmt.execute([id]))
            .map_err(|e| self.driver_error(StoreErrorKind::Update, "delete", id, e))?;

        Ok(rows_affected > 0)
    }

    fn count_inner(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .prepare_cached(&self.sql.count)
            .and_then(|mut stmt| stmt.query_row([], |row| row.get(0)))
            .map_err(|e| {
                from_rusqlite(StoreErrorKind::Fetch, "count", e).with_table(self.table.as_str())
            })?;

        Ok(count.max(0) as u64)
    }

    fn execute_update(&self, json: &str, id: &str) -> rusqlite::Result<usize> {
        let mut stmt = self.conn.prepare_cached(&self.sql.update)?;
        stmt.execute(params![json, id])
    }

    fn query_documents(&self, sql: &str, args: &[u32]) -> rusqlite::Result<Vec<String>> {
        let mut stmt = self.conn.prepare_cached(sql)?;
        let rows = stmt.query_map(params_from_iter(args.iter()), |row| row.get(0))?;
        let documents = rows.collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(documents)
    }

    fn encode(&self, record: &Record, kind: StoreErrorKind, op: &str, id: &str) -> Result<String> {
        record.to_json().map_err(|e| {
            StoreError::from(e)
                .rekind(kind)
                .with_op(op)
                .with_table(self.table.as_str())
                .with_resource_id(id)
        })
    }

    fn decode(&self, json: &str, id: Option<&str>) -> Result<Record> {
        Record::from_json(json).map_err(|e| {
            let ex = StoreError::from(e)
                .with_op(if id.is_some() { "fetch" } else { "fetch_all" })
                .with_table(self.table.as_str());
            match id {
                Some(id) => ex.with_resource_id(id),
                None => ex,
            }
        })
    }

    fn driver_error(
        &self,
        kind: StoreErrorKind,
        op: &str,
        id: &str,
        err: rusqlite::Error,
    ) -> StoreError {
        from_rusqlite(kind, op, err)
            .with_table(self.table.as_str())
            .with_resource_id(id)
    }

    fn finish<T>(&self, op: &'static str, start: Instant, result: Result<T>) -> Result<T> {
        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => {
                log_op_end!(op, duration_ms = duration_ms, table = self.table.as_str());
            }
            Err(err) => {
                log_op_error!(op, err, duration_ms = duration_ms, table = self.table.as_str());
            }
        }
        result
    }
}

impl std::fmt::Debug for ResourceStore<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceStore")
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}
