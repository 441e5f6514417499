//! Config resolution for the `campus` binary

use std::path::Path;

use libcampus::config::Config;
use libcampus::Result;

/// Build the effective config from the command-line options
///
/// An explicit config path that does not exist falls back to defaults
/// with a warning. `data_dir` replaces the configured storage path.
pub fn load_config(config_path: Option<&Path>, data_dir: Option<&Path>) -> Result<Config> {
    let mut config = match config_path {
        Some(path) if path.exists() => Config::load_from_path(path)?,
        Some(path) => {
            tracing::warn!(
                path = %path.display(),
                "Config file not found, using defaults"
            );
            Config::default_config()
        }
        None => Config::load()?,
    };

    if let Some(dir) = data_dir {
        config.storage.path = dir.to_string_lossy().into_owned();
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_missing_config_path_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("absent.toml");

        let config = load_config(Some(&missing), None).unwrap();
        assert_eq!(config, Config::default_config());
    }

    #[test]
    fn test_data_dir_overrides_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[storage]\npath = \"/srv/campus\"\n\n[limits]\ntrend_count = 3").unwrap();
        let temp_dir = TempDir::new().unwrap();

        let config = load_config(Some(file.path()), Some(temp_dir.path())).unwrap();
        assert_eq!(config.storage_dir(), temp_dir.path());
        assert_eq!(config.limits.trend_count, 3);
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[limits]\nmax_post_chars = 0").unwrap();

        let err = load_config(Some(file.path()), None).unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }
}
