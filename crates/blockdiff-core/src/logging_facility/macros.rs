//! Operation boundary macros
//!
//! Every engine and reader operation logs a `start` event, then exactly one
//! of `end` or `end_error`. The `op` and `event` keys come from
//! [`crate::types::schema`] so the capture layer can match on them.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use blockdiff_core::log_op_start;
/// log_op_start!("resolve_correspondence");
/// log_op_start!("compare_field", field = "density", num_blocks = 8);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::types::schema::EVENT_START,
            $($($field)*)?
        );
    };
}

/// Log the successful end of an operation with its elapsed time
///
/// # Example
///
/// ```
/// # use blockdiff_core::log_op_end;
/// log_op_end!("compare_field", duration_ms = 3, status = "equal");
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::types::schema::EVENT_END,
            duration_ms = $duration,
            $($($field)*)?
        );
    };
}

/// Log the failed end of an operation
///
/// Accepts anything convertible into [`crate::errors::ExError`] and records
/// its kind, stable code and message.
///
/// # Example
///
/// ```
/// # use blockdiff_core::log_op_error;
/// # use blockdiff_core::errors::{ExError, ExErrorKind};
/// let err = ExError::new(ExErrorKind::Unreadable).with_message("no such file");
/// log_op_error!("open_dataset", err, duration_ms = 1, file = "a.out");
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
            err.message = ex_err.message(),
            $($($field)*)?
        );
    }};
}
