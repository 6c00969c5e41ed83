//! Job manager configuration.
//!
//! This module contains the [`ManagerConfig`] struct and the constants that
//! shape the worker pool.

use std::time::Duration;

// =============================================================================
// Configuration Constants
// =============================================================================

/// Default size of the shared worker pool for the non-dedicated tiers.
pub const DEFAULT_MAX_WORKERS: usize = 5;

/// Worker cap for the dedicated tier ("a large number").
pub const DEFAULT_DEDICATED_MAX_WORKERS: usize = 10_000;

/// How long an idle worker waits for a job before retiring.
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// Manager Configuration
// =============================================================================

/// Configuration for the job manager.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManagerConfig {
    /// Worker cap for [`Priority::High`](super::Priority::High). Each tier
    /// below it gets one slot fewer, but never less than one.
    pub max_workers: usize,

    /// Worker cap for [`Priority::Dedicated`](super::Priority::Dedicated).
    pub dedicated_max_workers: usize,

    /// Idle time after which a worker thread exits.
    pub idle_timeout: Duration,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            max_workers: DEFAULT_MAX_WORKERS,
            dedicated_max_workers: DEFAULT_DEDICATED_MAX_WORKERS,
            idle_timeout: Duration::from_secs(DEFAULT_IDLE_TIMEOUT_SECS),
        }
    }
}

impl ManagerConfig {
    /// Sets the shared pool size.
    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    /// Sets the dedicated tier cap.
    pub fn with_dedicated_max_workers(mut self, cap: usize) -> Self {
        self.dedicated_max_workers = cap;
        self
    }

    /// Sets the worker idle timeout.
    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }
}

impl From<&crate::config::ManagerSettings> for ManagerConfig {
    fn from(settings: &crate::config::ManagerSettings) -> Self {
        Self {
            max_workers: settings.max_workers,
            dedicated_max_workers: settings.dedicated_max_workers,
            idle_timeout: Duration::from_secs(settings.idle_timeout_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manager_config_default() {
        let config = ManagerConfig::default();
        assert_eq!(config.max_workers, DEFAULT_MAX_WORKERS);
        assert_eq!(config.dedicated_max_workers, DEFAULT_DEDICATED_MAX_WORKERS);
        assert_eq!(config.idle_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_manager_config_builders() {
        let config = ManagerConfig::default()
            .with_max_workers(2)
            .with_dedicated_max_workers(8)
            .with_idle_timeout(Duration::from_millis(250));
        assert_eq!(config.max_workers, 2);
        assert_eq!(config.dedicated_max_workers, 8);
        assert_eq!(config.idle_timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_manager_config_from_settings() {
        let settings = crate::config::ManagerSettings {
            max_workers: 3,
            dedicated_max_workers: 50,
            idle_timeout_secs: 4,
        };
        let config = ManagerConfig::from(&settings);
        assert_eq!(config.max_workers, 3);
        assert_eq!(config.dedicated_max_workers, 50);
        assert_eq!(config.idle_timeout, Duration::from_secs(4));
    }
}
