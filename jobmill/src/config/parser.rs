//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use ini::Ini;
use std::path::PathBuf;
use std::str::FromStr;

use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [manager] section
    if let Some(section) = ini.section(Some("manager")) {
        if let Some(v) = section.get("max_workers") {
            let parsed: usize = parse_number("manager", "max_workers", v)?;
            if parsed == 0 {
                return Err(invalid(
                    "manager",
                    "max_workers",
                    v,
                    "must be at least 1",
                ));
            }
            config.manager.max_workers = parsed;
        }
        if let Some(v) = section.get("dedicated_max_workers") {
            let parsed: usize = parse_number("manager", "dedicated_max_workers", v)?;
            if parsed == 0 {
                return Err(invalid(
                    "manager",
                    "dedicated_max_workers",
                    v,
                    "must be at least 1",
                ));
            }
            config.manager.dedicated_max_workers = parsed;
        }
        if let Some(v) = section.get("idle_timeout_secs") {
            config.manager.idle_timeout_secs = parse_number("manager", "idle_timeout_secs", v)?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.directory = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = v.to_string();
            }
        }
    }

    Ok(config)
}

fn parse_number<T: FromStr>(section: &str, key: &str, value: &str) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, "must be a non-negative integer"))
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
