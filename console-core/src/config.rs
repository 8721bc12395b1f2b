use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::activity::DEFAULT_ACTIVITY_LIMIT;
use crate::navigation::Screen;

/// Environment variable overriding the config file location
pub const CONFIG_ENV_VAR: &str = "ADMIN_CONSOLE_CONFIG";

fn default_true() -> bool {
    true
}

fn default_activity_limit() -> usize {
    DEFAULT_ACTIVITY_LIMIT
}

/// User preferences for the console front ends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Directory task exports are written to when no path is given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,

    /// Screen shown after sign-in
    #[serde(default)]
    pub default_screen: Screen,

    /// Ask before deleting records
    #[serde(default = "default_true")]
    pub confirm_deletes: bool,

    /// Number of recent activity entries kept for the dashboard
    #[serde(default = "default_activity_limit")]
    pub activity_limit: usize,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            export_dir: None,
            default_screen: Screen::Dashboard,
            confirm_deletes: true,
            activity_limit: DEFAULT_ACTIVITY_LIMIT,
        }
    }
}

impl ConsoleConfig {
    /// Loads the config from `path`; a missing file gives the defaults
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        // An empty file is a valid "all defaults" config
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Loads from an explicit path, or from [`config_path`] when none is given
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => Self::load_from(config_path()?),
        }
    }

    /// Saves the config as YAML, creating parent directories
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)?;

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write config to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Where exports go when the caller names no file
    pub fn export_dir(&self) -> PathBuf {
        self.export_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Gets the path to the config file
pub fn config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        return Ok(PathBuf::from(path));
    }

    let config_dir = dirs::config_dir().context("Failed to determine config directory")?;

    Ok(config_dir.join("admin-console").join("config.yaml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = ConsoleConfig::load_from(dir.path().join("nope.yaml")).unwrap();
        assert_eq!(config, ConsoleConfig::default());
        assert!(config.confirm_deletes);
        assert_eq!(config.activity_limit, 20);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "default_screen: tasks\nconfirm_deletes: false\n").unwrap();

        let config = ConsoleConfig::load_from(&path).unwrap();
        assert_eq!(config.default_screen, Screen::Tasks);
        assert!(!config.confirm_deletes);
        assert_eq!(config.activity_limit, 20);
        assert_eq!(config.export_dir(), PathBuf::from("."));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "activity_limit: [not, a, number]\n").unwrap();

        let err = ConsoleConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        let config = ConsoleConfig {
            export_dir: Some(dir.path().join("exports")),
            default_screen: Screen::Sprints,
            confirm_deletes: false,
            activity_limit: 5,
        };

        config.save(&path).unwrap();
        assert_eq!(ConsoleConfig::load_from(&path).unwrap(), config);
    }
}
