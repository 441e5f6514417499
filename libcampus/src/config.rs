//! Configuration management for Campus

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

/// Maximum post length in characters
pub const DEFAULT_MAX_POST_CHARS: usize = 280;
/// Number of announcements kept in the pinned list
pub const DEFAULT_PINNED_CAPACITY: usize = 10;
/// Number of most recent posts scanned for trends
pub const DEFAULT_TREND_WINDOW: usize = 500;
/// Number of trends kept after ranking
pub const DEFAULT_TREND_COUNT: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub limits: Limits,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding persisted records (one file per key)
    pub path: String,
}

/// Tunable sizes used by the store and trend computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub max_post_chars: usize,
    pub pinned_capacity: usize,
    pub trend_window: usize,
    pub trend_count: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let path = resolve_data_path()
            .map(|dir| dir.to_string_lossy().into_owned())
            .unwrap_or_else(|_| "~/.campus".to_string());
        Self { path }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_post_chars: DEFAULT_MAX_POST_CHARS,
            pinned_capacity: DEFAULT_PINNED_CAPACITY,
            trend_window: DEFAULT_TREND_WINDOW,
            trend_count: DEFAULT_TREND_COUNT,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    /// Load configuration from the default location
    ///
    /// A missing config file is not an error: defaults are used instead.
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path()?;
        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "No config file, using defaults");
            return Ok(Self::default_config());
        }
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    /// Create a default configuration
    pub fn default_config() -> Self {
        Self {
            storage: StorageConfig::default(),
            limits: Limits::default(),
        }
    }

    /// Reject limits that would make the store unusable
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("limits.max_post_chars", self.limits.max_post_chars),
            ("limits.pinned_capacity", self.limits.pinned_capacity),
            ("limits.trend_window", self.limits.trend_window),
            ("limits.trend_count", self.limits.trend_count),
        ];
        for (field, value) in checks {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: "must be greater than zero".to_string(),
                }
                .into());
            }
        }
        if self.storage.path.trim().is_empty() {
            return Err(ConfigError::MissingField("storage.path".to_string()).into());
        }
        Ok(())
    }

    /// Storage directory with `~` expanded
    pub fn storage_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.storage.path).to_string())
    }
}

/// Resolve the configuration file path using XDG base directories
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("CAMPUS_CONFIG") {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("campus").join("config.toml"))
}

/// Resolve the data directory path using XDG base directories
pub fn resolve_data_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| ConfigError::MissingField("data directory".to_string()))?;

    Ok(data_dir.join("campus"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_limits() {
        let config = Config::default_config();
        assert_eq!(config.limits.max_post_chars, 280);
        assert_eq!(config.limits.pinned_capacity, 10);
        assert_eq!(config.limits.trend_window, 500);
        assert_eq!(config.limits.trend_count, 10);
    }

    #[test]
    fn test_load_partial_config_fills_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[storage]\npath = \"/tmp/campus-test\"\n\n[limits]\ntrend_count = 5").unwrap();

        let config = Config::load_from_path(file.path()).unwrap();
        assert_eq!(config.storage.path, "/tmp/campus-test");
        assert_eq!(config.limits.trend_count, 5);
        assert_eq!(config.limits.pinned_capacity, DEFAULT_PINNED_CAPACITY);
    }

    #[test]
    fn test_load_empty_config_is_default() {
        let file = NamedTempFile::new().unwrap();
        let config = Config::load_from_path(file.path()).unwrap();
        assert_eq!(config, Config::default_config());
    }

    #[test]
    fn test_zero_limit_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[limits]\npinned_capacity = 0").unwrap();

        let err = Config::load_from_path(file.path()).unwrap_err();
        assert!(err.to_string().contains("limits.pinned_capacity"));
    }

    #[test]
    fn test_malformed_config_is_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[limits\ntrend_count = ").unwrap();

        let err = Config::load_from_path(file.path()).unwrap_err();
        assert!(matches!(
            err,
            crate::CampusError::Config(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_default_storage_follows_platform_data_dir() {
        let config = Config::default_config();
        let expected = resolve_data_path().unwrap();
        assert_eq!(config.storage_dir(), expected);
        assert!(expected.starts_with(dirs::data_dir().unwrap()));
    }

    #[test]
    fn test_storage_dir_expands_tilde() {
        let config = Config {
            storage: StorageConfig {
                path: "~/campus-data".to_string(),
            },
            limits: Limits::default(),
        };
        let dir = config.storage_dir();
        assert!(!dir.to_string_lossy().starts_with('~'));
        assert!(dir.ends_with("campus-data"));
    }

    #[test]
    #[serial]
    fn test_config_path_from_env() {
        std::env::set_var("CAMPUS_CONFIG", "/tmp/campus/custom.toml");
        let path = resolve_config_path().unwrap();
        std::env::remove_var("CAMPUS_CONFIG");
        assert_eq!(path, PathBuf::from("/tmp/campus/custom.toml"));
    }

    #[test]
    #[serial]
    fn test_load_missing_file_uses_defaults() {
        std::env::set_var("CAMPUS_CONFIG", "/nonexistent/campus/config.toml");
        let config = Config::load().unwrap();
        std::env::remove_var("CAMPUS_CONFIG");
        assert_eq!(config, Config::default_config());
    }
}
