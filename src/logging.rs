//! Installs the global `tracing` subscriber.
//!
//! Logs go to stderr so `--json` output on stdout stays machine-readable. When a log
//! directory is configured, they go to a daily rolling file instead; the returned
//! guard must be held until exit so buffered lines are flushed.

use crate::config::{LogFormat, LoggingConfig};
use crate::error::{AppError, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE_PREFIX: &str = "hazard-watch.log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

pub fn init(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter());

    let (result, guard) = match (&config.directory, config.format) {
        (Some(dir), format) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let builder = builder.with_writer(writer).with_ansi(false);
            let result = match format {
                LogFormat::Json => builder.json().try_init(),
                LogFormat::Text => builder.try_init(),
            };
            (result, Some(guard))
        },
        (None, LogFormat::Json) => (
            builder.with_writer(std::io::stderr).json().try_init(),
            None,
        ),
        (None, LogFormat::Text) => (builder.with_writer(std::io::stderr).try_init(), None),
    };

    result.map_err(|e| AppError::Logging(e.to_string()))?;
    Ok(guard)
}
