//! Client configuration.
//!
//! Values are resolved in this order, later sources winning:
//! 1. Built-in defaults
//! 2. `~/.config/portal/config.toml` (optional)
//! 3. `PORTAL_*` environment variables

use crate::paths::PortalPaths;
use portal_core::error::{PortalError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

pub const ENV_API_URL: &str = "PORTAL_API_URL";
pub const ENV_APP_TITLE: &str = "PORTAL_APP_TITLE";
pub const ENV_APP_VERSION: &str = "PORTAL_APP_VERSION";
pub const ENV_APP_ENV: &str = "PORTAL_APP_ENV";
pub const ENV_REQUEST_TIMEOUT: &str = "PORTAL_REQUEST_TIMEOUT";

/// Resolved client configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend origin; endpoint paths are appended verbatim
    pub api_url: String,
    pub request_timeout_secs: u64,
    /// Overrides the default storage file location
    pub storage_path: Option<PathBuf>,
    pub app_title: String,
    pub app_version: String,
    /// "development", "production", ...
    pub app_env: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            storage_path: None,
            app_title: "MEVN Application".to_string(),
            app_version: "1.0.0".to_string(),
            app_env: "development".to_string(),
        }
    }
}

/// Summary printed by `portal status` and logged at start-up.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentInfo {
    pub api_url: String,
    pub app_title: String,
    pub app_version: String,
    pub app_env: String,
    pub is_development: bool,
    pub is_production: bool,
}

impl ClientConfig {
    /// Loads config from the default file location and the process environment.
    pub fn load() -> Result<Self> {
        let path = PortalPaths::config_file().map_err(|e| PortalError::config(e.to_string()))?;
        Self::load_from(&path, |key| std::env::var(key).ok())
    }

    /// Loads config from `path` (missing file means defaults) and applies
    /// overrides from `lookup`.
    pub fn load_from<F>(path: &Path, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml_str(&content)?
        } else {
            Self::default()
        };
        config.apply_overrides(lookup)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL) {
            self.api_url = url;
        }
        if let Some(title) = lookup(ENV_APP_TITLE) {
            self.app_title = title;
        }
        if let Some(version) = lookup(ENV_APP_VERSION) {
            self.app_version = version;
        }
        if let Some(env) = lookup(ENV_APP_ENV) {
            self.app_env = env;
        }
        if let Some(timeout) = lookup(ENV_REQUEST_TIMEOUT) {
            self.request_timeout_secs = timeout.trim().parse().map_err(|_| {
                PortalError::config(format!("{} must be a number of seconds", ENV_REQUEST_TIMEOUT))
            })?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.api_url.trim().is_empty() {
            return Err(PortalError::config("api_url must not be empty"));
        }
        if self.request_timeout_secs == 0 {
            return Err(PortalError::config("request_timeout_secs must be positive"));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Storage file path, falling back to the platform default.
    pub fn storage_path(&self) -> Result<PathBuf> {
        match &self.storage_path {
            Some(path) => Ok(path.clone()),
            None => PortalPaths::storage_file().map_err(|e| PortalError::config(e.to_string())),
        }
    }

    pub fn is_development(&self) -> bool {
        self.app_env == "development"
    }

    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }

    pub fn environment_info(&self) -> EnvironmentInfo {
        EnvironmentInfo {
            api_url: self.api_url.clone(),
            app_title: self.app_title.clone(),
            app_version: self.app_version.clone(),
            app_env: self.app_env.clone(),
            is_development: self.is_development(),
            is_production: self.is_production(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = ClientConfig::load_from(&temp_dir.path().join("config.toml"), no_env).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert!(config.is_development());
        assert!(!config.is_production());
    }

    #[test]
    fn test_file_values_then_env_overrides() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "api_url = \"https://api.example.com\"\napp_env = \"staging\"\n",
        )
        .unwrap();

        let env: HashMap<&str, &str> =
            HashMap::from([(ENV_APP_ENV, "production"), (ENV_REQUEST_TIMEOUT, "25")]);
        let config =
            ClientConfig::load_from(&path, |key| env.get(key).map(|v| v.to_string())).unwrap();

        assert_eq!(config.api_url, "https://api.example.com");
        assert_eq!(config.app_env, "production");
        assert_eq!(config.request_timeout(), Duration::from_secs(25));
        assert!(config.environment_info().is_production);
    }

    #[test]
    fn test_invalid_timeout_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = ClientConfig::load_from(&temp_dir.path().join("config.toml"), |key| {
            (key == ENV_REQUEST_TIMEOUT).then(|| "soon".to_string())
        });
        assert!(result.unwrap_err().is_config());
    }

    #[test]
    fn test_invalid_toml_is_serialization_error() {
        let result = ClientConfig::from_toml_str("api_url = ");
        assert!(result.unwrap_err().is_serialization());
    }
}
