//! Application Directories
//!
//! Settings and log locations.

use std::fs;
use std::path::PathBuf;

use directories::ProjectDirs;
use snafu::ResultExt;

use crate::error::{Error, IoSnafu, Result};

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "common-table", "common-table").ok_or_else(|| Error::Invalid {
        message: "Could not determine project directories".to_string(),
    })
}

/// Get or create the configuration directory
///
/// Platform-specific locations:
/// - **Linux**: `~/.config/common-table/`
/// - **macOS**: `~/Library/Application Support/com.common-table.common-table/`
/// - **Windows**: `C:\Users\<User>\AppData\Roaming\common-table\common-table\config\`
pub fn get_or_create_config_dir() -> Result<PathBuf> {
    let dirs = project_dirs()?;
    let config_dir = dirs.config_dir();
    if !config_dir.exists() {
        fs::create_dir_all(config_dir).context(IoSnafu)?;
    }
    Ok(config_dir.to_path_buf())
}

/// Get or create the log directory under the data directory
pub fn get_or_create_log_dir() -> Result<PathBuf> {
    let dirs = project_dirs()?;
    let log_dir = dirs.data_dir().join("logs");
    if !log_dir.exists() {
        fs::create_dir_all(&log_dir).context(IoSnafu)?;
    }
    Ok(log_dir)
}

/// Path of the table settings file
pub fn settings_path() -> Result<PathBuf> {
    Ok(get_or_create_config_dir()?.join("table.toml"))
}
