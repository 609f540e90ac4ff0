use std::{
    fs,
    path::{Path, PathBuf},
    time::{Duration, SystemTime},
};
use anyhow::Context;
use tokio::task;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, EnvFilter};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};

/// Keeps the file writer flushing; hold it for the lifetime of the process.
#[allow(dead_code)]
pub struct LoggerGuard(WorkerGuard);

const MAX_LOG_AGE: Duration = Duration::from_secs(60 * 60 * 24 * 3);
const CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

fn default_level(level: &str) -> LevelFilter {
    match level.parse::<LevelFilter>() {
        Ok(filter) => filter,
        Err(_) => {
            eprintln!("Invalid log level '{}', defaulting to 'info'", level);
            LevelFilter::INFO
        }
    }
}

/// Console plus daily-rotated file logging. `RUST_LOG` refines `level`.
///
/// Must be called from within a tokio runtime; it spawns the old-log cleanup task.
pub fn init_logging(log_dir: impl AsRef<Path>, prefix: &str, level: &str) -> anyhow::Result<LoggerGuard> {
    let log_dir = log_dir.as_ref().to_path_buf();

    let builder = EnvFilter::builder().with_default_directive(default_level(level).into());
    let directives = std::env::var("RUST_LOG").unwrap_or_default();
    let console_filter = builder.clone().parse_lossy(&directives);
    let file_filter = builder.parse_lossy(&directives);

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .build(&log_dir)
        .with_context(|| format!("Failed to create log appender in {}", log_dir.display()))?;
    let (non_blocking, guard) = NonBlocking::new(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_filter(file_filter);
    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_filter(console_filter);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stdout_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    start_log_cleanup_task(log_dir, prefix.to_string());

    Ok(LoggerGuard(guard))
}

fn start_log_cleanup_task(log_dir: PathBuf, prefix: String) {
    task::spawn(async move {
        loop {
            if let Err(e) = cleanup_old_logs(&log_dir, &prefix, MAX_LOG_AGE) {
                tracing::warn!("Failed to delete old log file: {}", e);
            }
            tokio::time::sleep(CLEANUP_INTERVAL).await;
        }
    });
}

/// Delete `<prefix>*.log` files older than `max_age`. Returns how many were removed.
fn cleanup_old_logs(log_dir: &Path, prefix: &str, max_age: Duration) -> std::io::Result<usize> {
    let now = SystemTime::now();
    let mut removed = 0;

    for entry in fs::read_dir(log_dir)? {
        let path = entry?.path();

        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !file_name.starts_with(prefix) || !file_name.ends_with(".log") {
            continue;
        }

        let modified = fs::metadata(&path)?.modified()?;
        if now.duration_since(modified).unwrap_or_default() > max_age {
            fs::remove_file(&path)?;
            tracing::info!("Old log file deleted: {}", file_name);
            removed += 1;
        }
    }
    Ok(removed)
}
