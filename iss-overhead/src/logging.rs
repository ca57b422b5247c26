use std::{
    fs,
    path::Path,
    time::{Duration, SystemTime},
};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const MAX_LOG_AGE: Duration = Duration::from_secs(60 * 60 * 24 * 3);

/// Flushes the file writer on drop; hold it for the life of `main`.
#[allow(dead_code)]
pub struct LoggerGuard(Option<WorkerGuard>);

/// Console logging on stderr, plus daily files under `log_dir` when given.
///
/// stdout is left alone for the pass listing.
pub fn init_logging(log_dir: Option<&Path>, prefix: &str, level: &str) -> anyhow::Result<LoggerGuard> {
    let level = match level {
        "trace" | "debug" | "info" | "warn" | "error" => level,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to 'info'", level);
            "info"
        }
    };

    let builder = EnvFilter::builder().with_default_directive(level.parse()?);
    let rust_log = std::env::var("RUST_LOG").unwrap_or_default();

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_filter(builder.clone().parse_lossy(&rust_log));

    let Some(log_dir) = log_dir else {
        tracing_subscriber::registry().with(console_layer).try_init()?;
        return Ok(LoggerGuard(None));
    };

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .build(log_dir)?;
    let (non_blocking, guard) = NonBlocking::new(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_filter(builder.parse_lossy(&rust_log));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    match cleanup_old_logs(log_dir, prefix, MAX_LOG_AGE) {
        Ok(0) => {}
        Ok(removed) => tracing::debug!("Removed {} old log files", removed),
        Err(e) => tracing::warn!("Failed to delete old log file: {}", e),
    }

    Ok(LoggerGuard(Some(guard)))
}

/// Remove `<prefix>*.log` files in `log_dir` last modified more than `max_age` ago.
pub fn cleanup_old_logs(log_dir: &Path, prefix: &str, max_age: Duration) -> std::io::Result<usize> {
    let now = SystemTime::now();
    let mut removed = 0;

    for entry in fs::read_dir(log_dir)? {
        let path = entry?.path();

        if let Some(file_name) = path.file_name().and_then(|n| n.to_str()) {
            if file_name.starts_with(prefix) && file_name.ends_with(".log") {
                let metadata = fs::metadata(&path)?;
                if let Ok(modified) = metadata.modified() {
                    if now.duration_since(modified).unwrap_or_default() > max_age {
                        fs::remove_file(&path)?;
                        removed += 1;
                    }
                }
            }
        }
    }
    Ok(removed)
}
