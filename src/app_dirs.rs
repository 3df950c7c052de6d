//! Application directory helpers anchored to a single `.dropsight` folder.
//!
//! Config, logs, and model artifacts live under one directory beneath the
//! OS config root. `DROPSIGHT_CONFIG_HOME` overrides the base for portable
//! setups; tests use the in-process override instead to stay parallel-safe.

use std::{
    path::PathBuf,
    sync::{LazyLock, Mutex},
};

use directories::BaseDirs;
use thiserror::Error;

/// Name of the application directory under the OS config root.
pub const APP_DIR_NAME: &str = ".dropsight";

static BASE_OVERRIDE: LazyLock<Mutex<Option<PathBuf>>> = LazyLock::new(|| Mutex::new(None));

/// Errors that can occur while resolving or preparing application directories.
#[derive(Debug, Error)]
pub enum AppDirError {
    /// No suitable base config directory could be resolved.
    #[error("No suitable base config directory available for application files")]
    NoBaseDir,
    /// Failed to create an application directory.
    #[error("Failed to create application directory at {path}: {source}")]
    CreateDir {
        /// Directory that failed to create.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
}

/// Root `.dropsight` directory, created on first use.
pub fn app_root_dir() -> Result<PathBuf, AppDirError> {
    let base = base_dir().ok_or(AppDirError::NoBaseDir)?;
    ensure_dir(base.join(APP_DIR_NAME))
}

/// Logs directory under the app root.
pub fn logs_dir() -> Result<PathBuf, AppDirError> {
    ensure_dir(app_root_dir()?.join("logs"))
}

/// Default directory holding the model artifacts.
pub fn models_dir() -> Result<PathBuf, AppDirError> {
    ensure_dir(app_root_dir()?.join("models"))
}

fn ensure_dir(path: PathBuf) -> Result<PathBuf, AppDirError> {
    std::fs::create_dir_all(&path).map_err(|source| AppDirError::CreateDir {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

fn base_dir() -> Option<PathBuf> {
    if let Some(path) = BASE_OVERRIDE.lock().ok().and_then(|guard| guard.clone()) {
        return Some(path);
    }
    if let Ok(path) = std::env::var("DROPSIGHT_CONFIG_HOME") {
        return Some(PathBuf::from(path));
    }
    BaseDirs::new().map(|dirs| dirs.config_dir().to_path_buf())
}

#[cfg(test)]
pub(crate) fn set_base_override(path: Option<PathBuf>) {
    let mut guard = BASE_OVERRIDE.lock().expect("base override mutex poisoned");
    *guard = path;
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    struct OverrideGuard;

    impl OverrideGuard {
        fn set(path: PathBuf) -> Self {
            set_base_override(Some(path));
            Self
        }
    }

    impl Drop for OverrideGuard {
        fn drop(&mut self) {
            set_base_override(None);
        }
    }

    #[test]
    fn creates_nested_dirs_under_override() {
        let base = tempdir().unwrap();
        let _guard = OverrideGuard::set(base.path().to_path_buf());
        let root = app_root_dir().unwrap();
        assert_eq!(root, base.path().join(APP_DIR_NAME));
        let models = models_dir().unwrap();
        assert!(models.is_dir());
        assert_eq!(models, root.join("models"));
    }
}
