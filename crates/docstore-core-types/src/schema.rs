//! Canonical schema constants for structured logging and events
//!
//! These constants keep field names consistent between the logging macros,
//! the test capture layer and anything that parses the JSON log stream.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Resource identifiers
pub const FIELD_TABLE: &str = "table";
pub const FIELD_RESOURCE_ID: &str = "resource_id";

// Result sizes
pub const FIELD_ROWS: &str = "rows";
pub const FIELD_ROWS_AFFECTED: &str = "rows_affected";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";
pub const FIELD_ERR_MESSAGE: &str = "err_message";
pub const FIELD_DRIVER_CODE: &str = "driver_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
