//! Tracing setup shared by the binary and anything embedding the core.
//!
//! Two outputs: a non-blocking file writer (daily rolling under
//! `<data dir>/logs/`, or a fixed file when one is given) and warn+ on stderr
//! so stdout stays clean for JSON results.

use anyhow::Result;
use std::fs;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Default filter when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "mcp_terminal=info";

const LOG_FILE_NAME: &str = "mcp-terminal.log";

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop; keep it alive for the
/// lifetime of the process.
pub fn init_logging(logs_dir: &Path, log_file: Option<&Path>) -> Result<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))?;

    let file_appender = match log_file {
        Some(file) => {
            let dir = file
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            fs::create_dir_all(dir)?;
            let name = file
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or(LOG_FILE_NAME);
            rolling::never(dir, name)
        }
        None => {
            fs::create_dir_all(logs_dir)?;
            rolling::daily(logs_dir, LOG_FILE_NAME)
        }
    };
    let (non_blocking_file, file_guard) = non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(LevelFilter::WARN),
        )
        .with(
            fmt::layer()
                .with_writer(non_blocking_file)
                .with_target(true)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true),
        )
        .try_init()?;

    Ok(file_guard)
}
