//! Canonical logging macros
//!
//! These macros provide a structured, consistent way to log operations.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use schemawatch_core::log_op_start;
/// log_op_start!("aggregate");
/// log_op_start!("aggregate", sample_size = 10);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use schemawatch_core::log_op_end;
/// log_op_end!("aggregate", duration_ms = 42);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// # Example
///
/// ```
/// # use schemawatch_core::log_op_error;
/// # use schemawatch_core::errors::{ExError, ExErrorKind};
/// let err = ExError::new(ExErrorKind::BaselineCorrupt);
/// log_op_error!("load_baseline", err, duration_ms = 3);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            "{}",
            ex_err
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            $($field)*
        );
    }};
}

/// Log an entity that was skipped during a run
///
/// # Example
///
/// ```
/// # use schemawatch_core::log_entity_skip;
/// # use schemawatch_core::errors::{ExError, ExErrorKind};
/// let err = ExError::new(ExErrorKind::MalformedDocument);
/// log_entity_skip!("aggregate", "s3", &err);
/// ```
#[macro_export]
macro_rules! log_entity_skip {
    ($op:expr, $entity:expr, $err:expr) => {{
        let ex_err: &$crate::errors::ExError = $err;
        tracing::warn!(
            component = module_path!(),
            op = $op,
            event = $crate::schema::EVENT_SKIP,
            entity = $entity,
            err_code = ex_err.code(),
            "skipping entity: {}",
            ex_err
        );
    }};
}
