//! Locating, loading and saving `~/.jobmill/config.ini`.
//!
//! A missing file is not an error: the scheduler falls back to
//! [`ConfigFile::default`]. Section parsing lives in the parser module and
//! rendering in the writer module.

use ini::Ini;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::settings::ConfigFile;

const CONFIG_DIR_NAME: &str = ".jobmill";
const CONFIG_FILE_NAME: &str = "config.ini";

/// Why a scheduler configuration could not be loaded or stored.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// The file exists but is not valid INI.
    #[error("cannot read scheduler config: {0}")]
    Read(#[from] ini::Error),

    #[error("cannot write scheduler config to {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    /// A `[manager]` or `[logging]` key holds a value the scheduler cannot use.
    #[error("invalid value for {section}.{key} ('{value}'): {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    #[error("cannot create config directory {}: {source}", path.display())]
    CreateDirectory { path: PathBuf, source: io::Error },
}

impl ConfigFile {
    /// Reads `~/.jobmill/config.ini`, or returns defaults when it is absent.
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Reads the manager and logging sections from `path`.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        super::parser::parse_ini(&Ini::load_from_file(path)?)
    }

    pub fn save(&self) -> Result<(), ConfigFileError> {
        self.save_to(&config_file_path())
    }

    /// Writes the commented INI rendering to `path`, creating parent
    /// directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|source| ConfigFileError::CreateDirectory {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, super::writer::to_config_string(self)).map_err(|source| {
            ConfigFileError::Write {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    /// Writes a default config unless one is already there. Returns its path.
    pub fn ensure_exists() -> Result<PathBuf, ConfigFileError> {
        let path = config_file_path();
        if !path.exists() {
            Self::default().save_to(&path)?;
        }
        Ok(path)
    }
}

/// `~/.jobmill`, or `./.jobmill` when no home directory is known.
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
}

pub fn config_file_path() -> PathBuf {
    config_directory().join(CONFIG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::DEFAULT_MAX_WORKERS;

    #[test]
    fn test_default_config() {
        let config = ConfigFile::default();

        assert_eq!(config.manager.max_workers, DEFAULT_MAX_WORKERS);
        assert_eq!(config.manager.dedicated_max_workers, 10_000);
        assert_eq!(config.manager.idle_timeout_secs, 30);
        assert_eq!(config.logging.directory, PathBuf::from("logs"));
        assert_eq!(config.logging.file, "jobmill.log");
    }

    #[test]
    fn test_load_nonexistent_returns_defaults() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.ini");

        let config = ConfigFile::load_from(&config_path).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_save_then_load_preserves_values() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.ini");

        let mut config = ConfigFile::default();
        config.manager.max_workers = 8;
        config.manager.idle_timeout_secs = 5;
        config.logging.file = "scheduler.log".to_string();
        config.save_to(&config_path).unwrap();

        let loaded = ConfigFile::load_from(&config_path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_save_into_unwritable_location_reports_path() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let blocker = temp_dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();

        let err = ConfigFile::default()
            .save_to(&blocker.join("config.ini"))
            .unwrap_err();
        assert!(matches!(err, ConfigFileError::CreateDirectory { ref path, .. } if *path == blocker));
    }

    #[test]
    fn test_config_file_path_is_under_config_directory() {
        let path = config_file_path();
        assert!(path.starts_with(config_directory()));
        assert!(path.ends_with("config.ini"));
    }
}
