//! Logging setup for the CLI and library consumers.
//!
//! Installs a global tracing subscriber writing to stderr and a per-launch
//! log file under the app's logs directory. Old launch logs are pruned so
//! the directory stays bounded.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::OnceLock,
    time::SystemTime,
};

use time::{OffsetDateTime, format_description::FormatItem, macros::format_description};
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*};

use crate::app_dirs;

/// Maximum number of launch log files to retain.
const MAX_LOG_FILES: usize = 8;
const LOG_FILE_PREFIX: &str = "dropsight";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Errors that may occur while initializing logging.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// Could not resolve or create the logs directory.
    #[error(transparent)]
    AppDir(#[from] app_dirs::AppDirError),
    /// Failed to enumerate existing log files for pruning.
    #[error("Failed to read log directory {path}: {source}")]
    ReadDir {
        /// Logs directory path.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// Failed to format a timestamp for the log filename.
    #[error("Failed to format log filename time: {0}")]
    FormatTime(time::error::Format),
    /// Failed to set the global tracing subscriber.
    #[error("Failed to install global tracing subscriber: {0}")]
    SetGlobal(tracing::subscriber::SetGlobalDefaultError),
}

/// Initialize tracing to write to stderr and a per-launch log file.
///
/// `default_filter` applies when `RUST_LOG` is unset (typically from the
/// app config). Subsequent calls are no-ops; failures are returned so the
/// caller can degrade to stderr-only output without aborting startup.
pub fn init(default_filter: Option<&str>) -> Result<(), LoggingError> {
    if LOG_GUARD.get().is_some() {
        return Ok(());
    }

    let log_dir = app_dirs::logs_dir()?;
    let file_name = launch_file_name(now_utc())?;
    prune_old_logs(&log_dir, MAX_LOG_FILES)?;

    let appender = rolling::never(&log_dir, &file_name);
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let stderr_layer = fmt::layer().with_writer(std::io::stderr);
    let file_layer = fmt::layer().with_ansi(false).with_writer(file_writer);
    let subscriber = Registry::default()
        .with(env_filter(default_filter))
        .with(stderr_layer)
        .with(file_layer);
    tracing::subscriber::set_global_default(subscriber).map_err(LoggingError::SetGlobal)?;
    let _ = LOG_GUARD.set(guard);

    tracing::debug!("Logging to {}", log_dir.join(file_name).display());
    Ok(())
}

fn env_filter(default_filter: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter.unwrap_or("info")))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

fn launch_file_name(now: OffsetDateTime) -> Result<String, LoggingError> {
    const NAME_FORMAT: &[FormatItem<'_>] =
        format_description!("[year][month][day]-[hour][minute][second]");
    let stamp = now.format(NAME_FORMAT).map_err(LoggingError::FormatTime)?;
    Ok(format!("{LOG_FILE_PREFIX}_{stamp}.log"))
}

fn now_utc() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

fn prune_old_logs(dir: &Path, max_files: usize) -> Result<(), LoggingError> {
    let mut logs: Vec<(SystemTime, PathBuf)> = fs::read_dir(dir)
        .map_err(|source| LoggingError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file() && path.extension().and_then(|ext| ext.to_str()) == Some("log")
        })
        .map(|path| {
            let modified = fs::metadata(&path)
                .and_then(|meta| meta.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            (modified, path)
        })
        .collect();

    logs.sort_by_key(|(modified, _)| *modified);
    let excess = logs.len().saturating_sub(max_files);
    for (_, path) in logs.into_iter().take(excess) {
        if let Err(err) = fs::remove_file(&path) {
            tracing::debug!("Could not remove old log {}: {err}", path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn launch_file_name_embeds_timestamp() {
        let fixed = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();
        let name = launch_file_name(fixed).unwrap();
        assert_eq!(name, "dropsight_20231114-221320.log");
    }

    #[test]
    fn prune_keeps_newest_logs() {
        let dir = tempdir().unwrap();
        for idx in 0..10 {
            let path = dir.path().join(format!("dropsight_{idx}.log"));
            fs::write(&path, b"log").unwrap();
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        prune_old_logs(dir.path(), 8).unwrap();
        let remaining = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(remaining, 8);
        // The oldest two are the ones that went away.
        assert!(!dir.path().join("dropsight_0.log").exists());
        assert!(!dir.path().join("dropsight_1.log").exists());
        assert!(dir.path().join("dropsight_9.log").exists());
    }

    #[test]
    fn prune_ignores_non_log_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("keep.txt"), b"x").unwrap();
        prune_old_logs(dir.path(), 0).unwrap();
        assert!(dir.path().join("keep.txt").exists());
    }
}
