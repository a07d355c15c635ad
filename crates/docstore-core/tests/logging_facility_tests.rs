#![allow(clippy::unwrap_used, clippy::expect_used)]

use docstore_core::errors::{ResourceError, StoreError, StoreErrorKind};
use docstore_core::logging_facility::test_capture::init_test_capture;
use docstore_core::{log_op_end, log_op_error, log_op_start};
use docstore_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_DRIVER_CODE, FIELD_DURATION_MS, FIELD_ERR_CODE,
    FIELD_ERR_KIND, FIELD_ERR_MESSAGE,
};

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name, table = "collection");

    let start_events = capture.matching(op_name, EVENT_START);

    assert_eq!(start_events.len(), 1);
    assert_eq!(start_events[0].table(), Some("collection"));
    assert!(start_events[0].component().is_some());
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let end_events = capture.matching(op_name, EVENT_END);

    assert_eq!(end_events.len(), 1, "Should have exactly one end event");
    assert_eq!(end_events[0].field(FIELD_DURATION_MS), Some("42"));
}

#[test]
fn test_log_op_error_includes_kind_and_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err: StoreError = ResourceError::NotFound {
        id: "e1".to_string(),
    }
    .into();
    log_op_error!(op_name, err, duration_ms = 10);

    let error_events = capture.matching(op_name, EVENT_END_ERROR);

    assert_eq!(error_events.len(), 1);
    let event = &error_events[0];
    assert_eq!(event.level, tracing::Level::ERROR);
    assert_eq!(event.field(FIELD_ERR_KIND), Some("Fetch"));
    assert_eq!(event.field(FIELD_ERR_CODE), Some("ERR_FETCH"));
    assert!(event.field(FIELD_ERR_MESSAGE).unwrap().contains("not found"));
    assert_eq!(event.field(FIELD_DRIVER_CODE), None);
}

#[test]
fn test_clear_and_count() {
    let capture = init_test_capture();
    let op_name = "test_clear_and_count_unique_4";

    log_op_start!(op_name);
    log_op_start!(op_name);

    let count = capture.count_events(|e| e.op() == Some(op_name));
    assert_eq!(count, 2);
    capture.assert_event_exists(op_name, EVENT_START);
}

#[test]
fn test_log_op_error_carries_driver_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_driver_code_unique_5";

    let err = StoreError::new(StoreErrorKind::Insert)
        .with_driver_code(1555)
        .with_message("UNIQUE constraint failed: collection.id");
    log_op_error!(op_name, &err, duration_ms = 1);

    let error_events = capture.matching(op_name, EVENT_END_ERROR);
    assert_eq!(error_events.len(), 1);
    assert_eq!(error_events[0].field(FIELD_DRIVER_CODE), Some("1555"));
    assert_eq!(error_events[0].field(FIELD_ERR_CODE), Some("ERR_INSERT"));
}
