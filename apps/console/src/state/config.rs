//! # Console Configuration
//!
//! Where the document lives and who is operating the till.
//!
//! ## Configuration Sources (later overrides earlier)
//! 1. Defaults (this file)
//! 2. Config file (`orina.toml` in the platform config dir)
//! 3. Environment variables (`ORINA_*`)
//!
//! ```toml
//! # orina.toml
//! state_path = "/srv/orina/orina_state.json"
//! backup_dir = "/srv/orina/backups"
//! operator = "Counter 1"
//! pretty = true
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use orina_store::STATE_FILE_NAME;

/// Config file name inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "orina.toml";

/// Errors loading the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Console configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// The JSON document.
    /// Default: `orina_state.json` in the platform data dir
    pub state_path: PathBuf,

    /// Where `backup export` writes files.
    /// Default: current directory
    pub backup_dir: PathBuf,

    /// Name written as `recordedBy` on sales.
    /// Default: none (the stored identity's name is used)
    pub operator: Option<String>,

    /// Indent the saved document.
    pub pretty: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        ConsoleConfig {
            state_path: default_data_dir().join(STATE_FILE_NAME),
            backup_dir: PathBuf::from("."),
            operator: None,
            pretty: false,
        }
    }
}

impl ConsoleConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// A missing config file is not an error.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(path = %path.display(), "Loading config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(path = %path.display(), "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Loads config or returns the defaults if the file is broken.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            let mut config = Self::default();
            config.apply_overrides(|key| std::env::var(key).ok());
            config
        })
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Applies `ORINA_*` overrides from a variable lookup.
    ///
    /// ## Variables
    /// - `ORINA_STATE_PATH`: document path
    /// - `ORINA_BACKUP_DIR`: backup directory
    /// - `ORINA_USER`: operator name for `recordedBy`
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("ORINA_STATE_PATH").filter(|p| !p.is_empty()) {
            debug!(path = %path, "Overriding state path from environment");
            self.state_path = PathBuf::from(path);
        }

        if let Some(dir) = lookup("ORINA_BACKUP_DIR").filter(|d| !d.is_empty()) {
            self.backup_dir = PathBuf::from(dir);
        }

        if let Some(user) = lookup("ORINA_USER").filter(|u| !u.trim().is_empty()) {
            self.operator = Some(user);
        }
    }

    /// `orina.toml` in the platform config directory.
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "orina", "operations").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}

/// Platform data directory, or the current directory when none is known.
///
/// - **Linux**: `~/.local/share/operations`
/// - **macOS**: `~/Library/Application Support/com.orina.operations`
/// - **Windows**: `%APPDATA%\orina\operations\data`
pub fn default_data_dir() -> PathBuf {
    ProjectDirs::from("com", "orina", "operations")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = ConsoleConfig::default();
        assert!(config.state_path.ends_with(STATE_FILE_NAME));
        assert!(config.operator.is_none());
        assert!(!config.pretty);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ConsoleConfig = toml::from_str(r#"operator = "Counter 1""#).unwrap();
        assert_eq!(config.operator.as_deref(), Some("Counter 1"));
        assert_eq!(config.state_path, ConsoleConfig::default().state_path);
    }

    #[test]
    fn test_file_then_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            "state_path = \"/srv/orina/state.json\"\noperator = \"Counter 1\"\npretty = true\n",
        )
        .unwrap();

        let mut config = ConsoleConfig::from_file(&path).unwrap();
        assert_eq!(config.state_path, PathBuf::from("/srv/orina/state.json"));
        assert!(config.pretty);

        let env: HashMap<&str, &str> = [("ORINA_USER", "Night Shift"), ("ORINA_STATE_PATH", "")]
            .into_iter()
            .collect();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.operator.as_deref(), Some("Night Shift"));
        // Blank overrides are ignored.
        assert_eq!(config.state_path, PathBuf::from("/srv/orina/state.json"));
    }

    #[test]
    fn test_broken_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "pretty = \"very\"").unwrap();

        assert!(matches!(ConsoleConfig::load(Some(path)), Err(ConfigError::Parse(_))));
    }
}
