//! Unified path management for portal files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/portal/            # Config directory
//! ├── config.toml              # Client configuration
//! └── storage.json             # Persistent key-value store (token, user, appSettings)
//! ```

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

pub struct PortalPaths;

impl PortalPaths {
    const APP_DIR: &'static str = "portal";

    /// Returns the portal configuration directory (e.g. `~/.config/portal/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(Self::APP_DIR))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the path to config.toml.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to the persistent key-value store.
    pub fn storage_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("storage.json"))
    }
}
