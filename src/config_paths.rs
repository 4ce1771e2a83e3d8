//! Where gridsheet keeps its files
//!
//! ```text
//! <root>/config.yaml   sheet configuration
//! <root>/logs/         daily rotated gridsheet.log.YYYY-MM-DD
//! ```
//!
//! `<root>` is `$XDG_CONFIG_HOME/gridsheet` or `~/.config/gridsheet` on
//! Unix and macOS, and `%APPDATA%\gridsheet` on Windows.

use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "gridsheet";
const CONFIG_FILE: &str = "config.yaml";
const LOGS_DIR: &str = "logs";

/// Prefix of the daily rotated log files
pub const LOG_FILE_PREFIX: &str = "gridsheet.log";

/// File layout under one root directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    root: PathBuf,
}

impl ConfigPaths {
    /// Layout rooted at an explicit directory
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Layout in the user's config directory, if one can be determined
    pub fn user() -> Option<Self> {
        user_config_base().map(|base| Self::at(base.join(APP_DIR)))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join(LOGS_DIR)
    }

    /// Create the root and logs directories, returning the logs directory
    pub fn ensure_logs_dir(&self) -> Result<PathBuf, String> {
        let logs = self.logs_dir();
        create_dir(&logs)?;
        Ok(logs)
    }
}

#[cfg(not(target_os = "windows"))]
fn user_config_base() -> Option<PathBuf> {
    // XDG_CONFIG_HOME is honored on macOS too, unlike dirs::config_dir
    std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
}

#[cfg(target_os = "windows")]
fn user_config_base() -> Option<PathBuf> {
    dirs::config_dir()
}

fn create_dir(path: &Path) -> Result<(), String> {
    fs::create_dir_all(path)
        .map_err(|e| format!("Failed to create directory {}: {}", path.display(), e))
}

// ---------------------------------------------------------------------------
// User-directory shorthands
// ---------------------------------------------------------------------------

pub fn config_dir() -> Option<PathBuf> {
    ConfigPaths::user().map(|paths| paths.root)
}

pub fn config_file() -> Option<PathBuf> {
    ConfigPaths::user().map(|paths| paths.config_file())
}

pub fn logs_dir() -> Option<PathBuf> {
    ConfigPaths::user().map(|paths| paths.logs_dir())
}

/// Ensure the user config directory exists, returning it
pub fn ensure_config_dir() -> Result<PathBuf, String> {
    let paths = ConfigPaths::user().ok_or_else(|| "No config directory available".to_string())?;
    create_dir(paths.root())?;
    Ok(paths.root)
}

/// Ensure the user logs directory exists, returning it
pub fn ensure_logs_dir() -> Result<PathBuf, String> {
    ConfigPaths::user()
        .ok_or_else(|| "No config directory available".to_string())?
        .ensure_logs_dir()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_under_root() {
        let paths = ConfigPaths::at("/tmp/grid");
        assert_eq!(paths.config_file(), PathBuf::from("/tmp/grid/config.yaml"));
        assert_eq!(paths.logs_dir(), PathBuf::from("/tmp/grid/logs"));
    }

    #[test]
    fn test_ensure_logs_dir_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ConfigPaths::at(dir.path().join("a").join("b"));
        let logs = paths.ensure_logs_dir().unwrap();
        assert!(logs.is_dir());
        assert!(paths.root().is_dir());
        // Idempotent
        assert_eq!(paths.ensure_logs_dir().unwrap(), logs);
    }

    #[test]
    fn test_ensure_fails_under_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        assert!(ConfigPaths::at(&blocker).ensure_logs_dir().is_err());
    }
}
