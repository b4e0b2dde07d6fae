//! Canonical schema constants for structured logging and events
//!
//! These constants keep field names consistent between the logging macros,
//! the engine and the test capture layer.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_RUN_ID: &str = "run_id";

// Comparison identifiers
pub const FIELD_FILE: &str = "file";
pub const FIELD_FIELD_NAME: &str = "field";
pub const FIELD_BLOCK: &str = "block";
pub const FIELD_STATUS: &str = "status";

// Collection sizes
pub const FIELD_NUM_BLOCKS: &str = "num_blocks";
pub const FIELD_NUM_FIELDS: &str = "num_fields";
pub const FIELD_NUM_OFFENDERS: &str = "num_offenders";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";
pub const FIELD_ERR_MESSAGE: &str = "err.message";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_fields_share_prefix() {
        for key in [FIELD_ERR_KIND, FIELD_ERR_CODE, FIELD_ERR_MESSAGE] {
            assert!(key.starts_with("err."), "{}", key);
        }
    }

    #[test]
    fn test_event_names_are_distinct() {
        assert_ne!(EVENT_START, EVENT_END);
        assert_ne!(EVENT_START, EVENT_END_ERROR);
        assert_ne!(EVENT_END, EVENT_END_ERROR);
    }
}
