//! Subscriber setup
//!
//! Two sinks: a plain text layer on stderr, always on, and a JSON layer
//! writing to a rolling `satchel.log` when `[logging] local_enabled` is set.
//! Both share one filter, `RUST_LOG` when present, otherwise
//! `satchel=<level>`.
//!
//! ```no_run
//! use satchel::config::LoggingConfig;
//! use satchel::logging::init_logging;
//!
//! let _guard = init_logging("info", &LoggingConfig::default()).expect("logging");
//! ```

use crate::config::LoggingConfig;
use crate::domain::{Result, SatchelError};
use std::str::FromStr;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// File name of the local log, before the rotation suffix
pub const LOG_FILE_NAME: &str = "satchel.log";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Keeps the file writer thread alive; drop it last so buffered lines land
pub struct LoggingGuard {
    _writer: Option<WorkerGuard>,
}

/// Install the global subscriber
///
/// # Errors
///
/// Fails on an unknown level, an uncreatable log directory, or when a
/// subscriber is already installed.
pub fn init_logging(level: &str, config: &LoggingConfig) -> Result<LoggingGuard> {
    let level = parse_log_level(level)?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("satchel={level}")));

    let mut layers = vec![console_layer(filter.clone())];
    let writer = if config.local_enabled {
        let (layer, guard) = file_layer(config, filter)?;
        layers.push(layer);
        Some(guard)
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| SatchelError::Configuration(format!("Log subscriber already set: {e}")))?;

    tracing::debug!(
        %level,
        log_file = config.local_enabled,
        log_dir = %config.local_path,
        "Logging ready"
    );

    Ok(LoggingGuard { _writer: writer })
}

// stdout is reserved for command output
fn console_layer(filter: EnvFilter) -> BoxedLayer {
    tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(filter)
        .boxed()
}

fn file_layer(config: &LoggingConfig, filter: EnvFilter) -> Result<(BoxedLayer, WorkerGuard)> {
    std::fs::create_dir_all(&config.local_path).map_err(|e| {
        SatchelError::Configuration(format!("Cannot create log dir {}: {e}", config.local_path))
    })?;

    let appender = RollingFileAppender::new(
        parse_rotation(&config.local_rotation),
        &config.local_path,
        LOG_FILE_NAME,
    );
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let layer = tracing_subscriber::fmt::layer()
        .json()
        .with_thread_ids(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(writer)
        .with_filter(filter)
        .boxed();
    Ok((layer, guard))
}

fn parse_log_level(level: &str) -> Result<Level> {
    Level::from_str(level.trim())
        .map_err(|_| SatchelError::Configuration(format!("Unknown log level '{level}'")))
}

fn parse_rotation(rotation: &str) -> Rotation {
    match rotation {
        "hourly" => Rotation::HOURLY,
        "never" => Rotation::NEVER,
        _ => Rotation::DAILY,
    }
}
