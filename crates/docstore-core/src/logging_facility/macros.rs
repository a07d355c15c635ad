//! Canonical logging macros
//!
//! Each store operation is bracketed by one start event and exactly one of
//! an end or end_error event, all carrying the same `component` and `op`.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use docstore_core::log_op_start;
/// log_op_start!("fetch");
/// log_op_start!("fetch", resource_id = "abc");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use docstore_core::log_op_end;
/// log_op_end!("fetch", duration_ms = 3);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// `$err` may be a `StoreError` or a reference to one.
///
/// # Example
///
/// ```
/// # use docstore_core::{log_op_error, ResourceError, StoreError};
/// let err: StoreError = ResourceError::NotFound { id: "abc".to_string() }.into();
/// log_op_error!("fetch", err, duration_ms = 1);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let store_err: &$crate::errors::StoreError = &$err;
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?store_err.kind(),
            err_code = store_err.code(),
            driver_code = store_err.driver_code(),
            err_message = store_err.message(),
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let store_err: &$crate::errors::StoreError = &$err;
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?store_err.kind(),
            err_code = store_err.code(),
            driver_code = store_err.driver_code(),
            err_message = store_err.message(),
            $($field)*
        );
    }};
}
