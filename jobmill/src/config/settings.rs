//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    /// Job manager settings
    pub manager: ManagerSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Job manager configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerSettings {
    /// Worker cap for the high priority tier; lower tiers get one fewer each
    pub max_workers: usize,
    /// Worker cap for the dedicated tier
    pub dedicated_max_workers: usize,
    /// Seconds an idle worker waits for a job before exiting
    pub idle_timeout_secs: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Directory the log file is written to
    pub directory: PathBuf,
    /// Log file name, truncated on every start
    pub file: String,
}
