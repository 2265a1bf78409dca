//! Operation boundary macros
//!
//! An operation logs one `start` and then exactly one of `end` or
//! `end_error`, all carrying the same `op`. Extra `key = value` fields are
//! passed through to `tracing` untouched.

#[doc(hidden)]
#[macro_export]
macro_rules! __log_op_event {
    ($level:expr, $op:expr, $event:expr $(, $($field:tt)*)?) => {
        tracing::event!(
            $level,
            component = module_path!(),
            op = $op,
            event = $event
            $(, $($field)*)?
        )
    };
}

/// ```
/// # use seiscat_core::log_op_start;
/// log_op_start!("submit_command");
/// log_op_start!("submit_command", target_id = 1234);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        $crate::__log_op_event!(
            tracing::Level::INFO,
            $op,
            $crate::core_types::schema::EVENT_START
            $(, $($field)*)?
        )
    };
}

/// ```
/// # use seiscat_core::log_op_end;
/// log_op_end!("submit_command", duration_ms = 3);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        $crate::__log_op_event!(
            tracing::Level::INFO,
            $op,
            $crate::core_types::schema::EVENT_END,
            duration_ms = $duration
            $(, $($field)*)?
        )
    };
}

/// Anything convertible into `ExError` is accepted; its kind and stable
/// code are logged.
///
/// ```
/// # use seiscat_core::{log_op_error, errors::SeisCatError};
/// let err = SeisCatError::UnknownStatement { name: "drop_all".to_string() };
/// log_op_error!("execute_command", err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let failure: $crate::errors::ExError = $err.into();
        $crate::__log_op_event!(
            tracing::Level::ERROR,
            $op,
            $crate::core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?failure.kind(),
            err_code = failure.code()
            $(, $($field)*)?
        )
    }};
}
