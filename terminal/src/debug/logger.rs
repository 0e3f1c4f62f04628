//! Subscriber initialization

use std::fs;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::config::{LogConfig, DEFAULT_FILTER};

const LOG_FILE_NAME: &str = "skelly.log";

/// Initialize the logging system
///
/// Console output goes to stderr so command output on stdout stays clean for
/// piping. When a log directory is configured, a non-blocking daily-rotated
/// file layer is added. Hold the returned guard until exit so buffered lines
/// get flushed.
pub fn init() -> Option<WorkerGuard> {
    let config = LogConfig::from_env();

    let env_filter = EnvFilter::try_new(&config.log_level)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let console_layer = fmt::layer()
        .compact()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => match fs::create_dir_all(dir) {
            Ok(()) => {
                let file_appender = tracing_appender::rolling::daily(dir, LOG_FILE_NAME);
                let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
                let layer = fmt::layer()
                    .with_writer(non_blocking)
                    .with_target(true)
                    .with_line_number(true)
                    .with_ansi(false); // No ANSI codes in log files
                (Some(layer), Some(guard))
            }
            Err(e) => {
                eprintln!("Warning: Failed to create log directory {}: {}", dir.display(), e);
                (None, None)
            }
        },
        None => (None, None),
    };

    if let Err(e) = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
    {
        eprintln!("Warning: Logging already initialized: {}", e);
    }

    tracing::debug!(
        log_level = %config.log_level,
        log_dir = ?config.log_dir,
        "Logging initialized"
    );

    guard
}
