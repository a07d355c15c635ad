use thiserror::Error;

/// Result type alias using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failing store operation surfaces exactly one of these kinds. The
/// four CRUD kinds follow the statement that failed; the remaining kinds
/// cover construction, bootstrap and caller input outside the CRUD path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    /// The create statement failed
    Insert,
    /// A select failed, or the requested resource does not exist
    Fetch,
    /// The update statement issued by a patch failed
    Patch,
    /// The update or delete statement failed
    Update,
    /// Caller supplied something unusable (table name, JSON payload)
    InvalidInput,
    /// Connection setup or table bootstrap failed
    Persistence,
}

impl StoreErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            StoreErrorKind::Insert => "ERR_INSERT",
            StoreErrorKind::Fetch => "ERR_FETCH",
            StoreErrorKind::Patch => "ERR_PATCH",
            StoreErrorKind::Update => "ERR_UPDATE",
            StoreErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            StoreErrorKind::Persistence => "ERR_PERSISTENCE",
        }
    }
}

/// Canonical structured error type
///
/// Carries the classification (`kind`), the operation that failed, the
/// resource and table involved, and the driver's result code when the
/// failure came from SQLite rather than from the store itself.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreError {
    kind: StoreErrorKind,
    op: Option<String>,
    table: Option<String>,
    resource_id: Option<String>,
    driver_code: Option<i32>,
    not_found: bool,
    message: String,
}

impl StoreError {
    /// Create a new error with the specified kind
    pub fn new(kind: StoreErrorKind) -> Self {
        Self {
            kind,
            op: None,
            table: None,
            resource_id: None,
            driver_code: None,
            not_found: false,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add table context
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Add resource ID context
    pub fn with_resource_id(mut self, id: impl Into<String>) -> Self {
        self.resource_id = Some(id.into());
        self
    }

    /// Add the driver's result code
    pub fn with_driver_code(mut self, code: i32) -> Self {
        self.driver_code = Some(code);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Re-classify under a different kind, keeping the context
    pub fn rekind(mut self, kind: StoreErrorKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn kind(&self) -> StoreErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    pub fn resource_id(&self) -> Option<&str> {
        self.resource_id.as_deref()
    }

    /// Get the driver's result code, if the failure came from SQLite
    pub fn driver_code(&self) -> Option<i32> {
        self.driver_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// True when the store found no row for the requested id
    ///
    /// This is the only failure the store synthesizes itself; it never
    /// carries a driver code.
    pub fn is_not_found(&self) -> bool {
        self.not_found
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(table) = &self.table {
            write!(f, " (table: {})", table)?;
        }
        if let Some(resource_id) = &self.resource_id {
            write!(f, " (resource_id: {})", resource_id)?;
        }
        if let Some(code) = self.driver_code {
            write!(f, " (driver_code: {})", code)?;
        }
        Ok(())
    }
}

impl std::error::Error for StoreError {}

// ========== End Error Facility ==========

/// Failures the store detects on its own, before or after talking to SQLite
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResourceError {
    /// No row exists for the requested id
    #[error("Resource identified by \"{id}\" not found")]
    NotFound { id: String },

    /// Table names are interpolated into SQL, so only plain identifiers pass
    #[error("Invalid table name \"{table}\": expected [A-Za-z_][A-Za-z0-9_]*")]
    InvalidTableName { table: String },

    /// Caller payload is not a JSON object
    #[error("Invalid payload: {reason}")]
    InvalidPayload { reason: String },

    /// A stored `data` column could not be decoded as a JSON object
    #[error("Stored document is corrupt: {reason}")]
    CorruptDocument { reason: String },

    /// A record could not be encoded as JSON
    #[error("Record could not be encoded: {reason}")]
    EncodeFailed { reason: String },

    /// The table was bootstrapped from different DDL than the current one
    #[error("Schema checksum mismatch for table {table}: expected {expected}, got {actual}")]
    SchemaChecksumMismatch {
        table: String,
        expected: String,
        actual: String,
    },
}

impl From<ResourceError> for StoreError {
    fn from(err: ResourceError) -> Self {
        let message = err.to_string();
        match err {
            ResourceError::NotFound { id } => {
                let mut ex = StoreError::new(StoreErrorKind::Fetch)
                    .with_resource_id(id)
                    .with_message(message);
                ex.not_found = true;
                ex
            }
            ResourceError::InvalidTableName { table } => {
                StoreError::new(StoreErrorKind::InvalidInput)
                    .with_table(table)
                    .with_message(message)
            }
            ResourceError::InvalidPayload { .. } => {
                StoreError::new(StoreErrorKind::InvalidInput).with_message(message)
            }
            // Decoding only happens on the read path
            ResourceError::CorruptDocument { .. } => {
                StoreError::new(StoreErrorKind::Fetch).with_message(message)
            }
            // Callers re-kind this to the operation that was encoding
            ResourceError::EncodeFailed { .. } => {
                StoreError::new(StoreErrorKind::InvalidInput).with_message(message)
            }
            ResourceError::SchemaChecksumMismatch { table, .. } => {
                StoreError::new(StoreErrorKind::Persistence)
                    .with_table(table)
                    .with_message(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_unique() {
        let kinds = [
            StoreErrorKind::Insert,
            StoreErrorKind::Fetch,
            StoreErrorKind::Patch,
            StoreErrorKind::Update,
            StoreErrorKind::InvalidInput,
            StoreErrorKind::Persistence,
        ];
        let mut codes: Vec<_> = kinds.iter().map(|k| k.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), kinds.len());
    }

    #[test]
    fn test_display_includes_context() {
        let err = StoreError::new(StoreErrorKind::Insert)
            .with_op("create")
            .with_table("collection")
            .with_resource_id("abc")
            .with_driver_code(1555)
            .with_message("UNIQUE constraint failed: collection.id");

        let rendered = err.to_string();
        assert!(rendered.starts_with("[ERR_INSERT] in operation 'create'"));
        assert!(rendered.contains("UNIQUE constraint failed"));
        assert!(rendered.contains("(table: collection)"));
        assert!(rendered.contains("(resource_id: abc)"));
        assert!(rendered.contains("(driver_code: 1555)"));
    }

    #[test]
    fn test_rekind_keeps_context() {
        let err: StoreError = ResourceError::EncodeFailed {
            reason: "boom".to_string(),
        }
        .into();
        let err = err.with_op("patch").rekind(StoreErrorKind::Patch);

        assert_eq!(err.kind(), StoreErrorKind::Patch);
        assert_eq!(err.op(), Some("patch"));
        assert!(err.message().contains("boom"));
    }
}
