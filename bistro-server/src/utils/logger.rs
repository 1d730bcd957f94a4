//! Logging Infrastructure
//!
//! Console output always; an extra daily-rolling file when a log directory is
//! configured.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the logger
///
/// `RUST_LOG` wins over `log_level`. The returned guard flushes the file
/// writer and must live as long as the process.
pub fn init_logger(
    log_level: &str,
    json: bool,
    log_dir: Option<&str>,
) -> std::io::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(Path::new(dir))?;
            let appender = tracing_appender::rolling::daily(dir, "bistro-server.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = if json {
                fmt::layer().json().with_writer(writer).boxed()
            } else {
                fmt::layer().with_ansi(false).with_writer(writer).boxed()
            };
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let console = fmt::layer()
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    // Already initialized (tests, embedding) is not an error
    let _ = tracing_subscriber::registry()
        .with(file_layer)
        .with(console)
        .with(filter)
        .try_init();

    Ok(guard)
}
