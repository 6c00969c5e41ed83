//! INI serialization logic for converting `ConfigFile` → INI string.

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    format!(
        r#"[manager]
; Worker threads shared by the high, normal, low and low_pausable tiers.
; High priority jobs may use all of them; each lower tier may use one fewer
; (never less than one). Must be at least 1.
max_workers = {}
; Worker cap for dedicated priority jobs (default: 10000)
dedicated_max_workers = {}
; Seconds an idle worker thread waits for a job before exiting (default: 30)
idle_timeout_secs = {}

[logging]
; Directory for the log file, relative to the working directory unless absolute
directory = {}
; Log file name. The file is cleared at the start of every session.
file = {}
"#,
        config.manager.max_workers,
        config.manager.dedicated_max_workers,
        config.manager.idle_timeout_secs,
        config.logging.directory.display(),
        config.logging.file,
    )
}
