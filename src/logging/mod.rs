//! Logging for satchel
//!
//! [`init_logging`] installs the subscriber; the macros below give every
//! export the same start, finish and failure events so log queries can key
//! on them.

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of an export request
///
/// # Example
///
/// ```no_run
/// use satchel::log_export_start;
///
/// log_export_start!("group grp-7", "LinkedZipExporter");
/// ```
#[macro_export]
macro_rules! log_export_start {
    ($target:expr, $format:expr) => {
        tracing::info!(
            target_desc = %$target,
            format = %$format,
            "Starting export"
        );
    };
}

/// Log the completion of an export request
///
/// # Example
///
/// ```no_run
/// use satchel::log_export_complete;
/// use std::path::Path;
/// use std::time::Duration;
///
/// let archive = Path::new("/tmp/2024-03-01_10-15_TimeSeries.zip");
/// log_export_complete!(archive.display(), Duration::from_millis(350));
/// ```
#[macro_export]
macro_rules! log_export_complete {
    ($archive:expr, $duration:expr) => {
        tracing::info!(
            archive = %$archive,
            duration_ms = $duration.as_millis() as u64,
            "Export finished"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use satchel::log_error_with_context;
/// use satchel::domain::SatchelError;
///
/// let error = SatchelError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
