#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use blockdiff_core::errors::{DiffError, ExError, ExErrorKind};
use blockdiff_core::logging_facility::test_capture::init_test_capture;
use blockdiff_core::types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_ERR_CODE, FIELD_ERR_MESSAGE, FIELD_FIELD_NAME,
    FIELD_STATUS,
};
use blockdiff_core::{log_op_end, log_op_error, log_op_start, DiffConfig};
use common::{compare, row_of_blocks};
use ndarray::{ArrayD, IxDyn};

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name);

    capture.assert_event_exists(op_name, EVENT_START);
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let events = capture.events();
    let end_events: Vec<_> = events
        .iter()
        .filter(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_END))
        .collect();

    assert_eq!(end_events.len(), 1, "Should have exactly one end event");
    assert_eq!(end_events[0].fields.get("duration_ms"), Some(&"42".to_string()));
}

#[test]
fn test_log_op_error_includes_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = DiffError::UnmatchedBlock {
        block: 4,
        dataset: "a".to_string(),
        other: "b".to_string(),
    };
    log_op_error!(op_name, err, duration_ms = 10);

    let events = capture.events();
    let error_event = events
        .iter()
        .find(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_END_ERROR))
        .expect("Should have error event");

    assert_eq!(
        error_event.fields.get(FIELD_ERR_CODE),
        Some(&"ERR_UNMATCHED_BLOCK".to_string())
    );
    assert!(error_event
        .field(FIELD_ERR_MESSAGE)
        .is_some_and(|m| m.contains("no matching block in b")));
}

#[test]
fn test_log_op_error_accepts_ex_error() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_4";

    let err = ExError::new(ExErrorKind::Unreadable).with_path("missing.out");
    log_op_error!(op_name, err, duration_ms = 1, file = "missing.out");

    let error_event = capture
        .events()
        .into_iter()
        .find(|e| e.op.as_deref() == Some(op_name))
        .expect("Should have error event");
    assert_eq!(error_event.fields.get("file"), Some(&"missing.out".to_string()));
    assert_eq!(
        error_event.fields.get(FIELD_ERR_CODE),
        Some(&"ERR_UNREADABLE".to_string())
    );
}

#[test]
fn test_compare_field_emits_start_and_end() {
    let capture = init_test_capture();
    let field = "logging_capture_field_unique_5";

    let zeros = ArrayD::zeros(IxDyn(&[2, 1, 2, 2]));
    let ones = ArrayD::from_elem(IxDyn(&[2, 1, 2, 2]), 1.0);
    let a = row_of_blocks("a", 2).with_field(field, zeros).unwrap();
    let b = row_of_blocks("b", 2).with_field(field, ones).unwrap();
    let _ = compare(DiffConfig::default(), &a, &b);

    let for_field = |event: &str| {
        capture.count_events(|e| {
            e.op.as_deref() == Some("compare_field")
                && e.event.as_deref() == Some(event)
                && e.fields.get(FIELD_FIELD_NAME).map(String::as_str) == Some(field)
        })
    };
    assert_eq!(for_field(EVENT_START), 1);
    assert_eq!(for_field(EVENT_END), 1);

    let end = capture
        .events()
        .into_iter()
        .find(|e| {
            e.event.as_deref() == Some(EVENT_END)
                && e.fields.get(FIELD_FIELD_NAME).map(String::as_str) == Some(field)
        })
        .unwrap();
    assert_eq!(end.fields.get(FIELD_STATUS), Some(&"differs".to_string()));
    assert_eq!(end.fields.get("num_offenders"), Some(&"8".to_string()));
}

#[test]
fn test_diff_run_boundary_events() {
    let capture = init_test_capture();

    let _ = compare(DiffConfig::default(), &row_of_blocks("a", 1), &row_of_blocks("b", 1));

    capture.assert_event_exists("diff_run", EVENT_START);
    capture.assert_event_exists("diff_run", EVENT_END);
    capture.assert_event_exists("resolve_correspondence", EVENT_END);
    capture.assert_event_exists("compare_metadata", EVENT_END);
}

#[test]
#[should_panic(expected = "Expected event")]
fn test_capture_assert_event_exists_fails() {
    let capture = init_test_capture();

    capture.assert_event_exists("nonexistent_op_truly_unique_999", EVENT_START);
}
