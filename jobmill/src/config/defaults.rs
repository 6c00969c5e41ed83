//! Default values for all configuration settings.

use std::path::PathBuf;

use super::settings::*;
use crate::jobs::{DEFAULT_DEDICATED_MAX_WORKERS, DEFAULT_IDLE_TIMEOUT_SECS, DEFAULT_MAX_WORKERS};

/// Default log directory, relative to the working directory.
pub const DEFAULT_LOG_DIRECTORY: &str = "logs";

/// Default log file name.
pub const DEFAULT_LOG_FILE: &str = "jobmill.log";

impl Default for ManagerSettings {
    fn default() -> Self {
        Self {
            max_workers: DEFAULT_MAX_WORKERS,
            dedicated_max_workers: DEFAULT_DEDICATED_MAX_WORKERS,
            idle_timeout_secs: DEFAULT_IDLE_TIMEOUT_SECS,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(DEFAULT_LOG_DIRECTORY),
            file: DEFAULT_LOG_FILE.to_string(),
        }
    }
}
