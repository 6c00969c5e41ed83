//! Scheduling tiers for jobs.
//!
//! Jobs are queued per tier and workers always scan from the highest tier
//! down, so a job in [`Priority::High`] is claimed before any job in
//! [`Priority::Normal`] even if it was submitted later.

use std::fmt;
use std::str::FromStr;

/// Scheduling tier of a job, lowest first.
///
/// [`Priority::LowPausable`] is the only tier affected by
/// [`JobManager::pause_jobs`](super::JobManager::pause_jobs).
/// [`Priority::Dedicated`] is effectively uncapped and always gets a worker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    /// Background work that can be suspended as a whole.
    LowPausable,

    /// Default tier for fire-and-forget work.
    #[default]
    Low,

    /// Regular interactive work.
    Normal,

    /// Work the user is actively waiting on.
    High,

    /// Long-running work that must never wait for a pool slot.
    Dedicated,
}

impl Priority {
    /// Number of tiers.
    pub const COUNT: usize = 5;

    /// All tiers, lowest first.
    pub const ALL: [Priority; Priority::COUNT] = [
        Priority::LowPausable,
        Priority::Low,
        Priority::Normal,
        Priority::High,
        Priority::Dedicated,
    ];

    /// Returns the ordinal of this tier (0 for `LowPausable`).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns the short name used in logs and config files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LowPausable => "low_pausable",
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
            Self::Dedicated => "dedicated",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown priority name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown priority '{0}' (expected one of: low_pausable, low, normal, high, dedicated)")]
pub struct ParsePriorityError(String);

impl FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase().replace('-', "_");
        Priority::ALL
            .into_iter()
            .find(|p| p.as_str() == name)
            .ok_or_else(|| ParsePriorityError(s.to_string()))
    }
}
