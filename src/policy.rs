use std::fmt;
use std::time::Duration;

pub(crate) const DEFAULT_RETRY_COUNT: u32 = 3;
pub(crate) const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_secs(5);

/// Reaction applied when an app's health probe fails.
///
/// Policies are plain values: they are attached to an app wholesale and
/// replaced wholesale, never edited in place. Two policies behave the same
/// whenever they are the same variant; the parameters only tune the
/// restart path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnFailure {
    /// Relaunch the app, attempting its start routine up to `retry_count`
    /// times with `retry_backoff` between failed attempts.
    Restart {
        retry_count: u32,
        retry_backoff: Duration,
    },
    /// Drop the app from the supervisor permanently; it receives no
    /// further probes and no replacement task.
    Ignore,
}

impl OnFailure {
    /// Restart policy with the default budget: 3 attempts, 5s backoff.
    pub const fn restart() -> Self {
        Self::Restart {
            retry_count: DEFAULT_RETRY_COUNT,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
        }
    }

    pub const fn ignore() -> Self {
        Self::Ignore
    }

    /// Sets the retry count. No effect on `Ignore`.
    #[must_use]
    pub const fn with_retry_count(self, retry_count: u32) -> Self {
        match self {
            Self::Restart { retry_backoff, .. } => Self::Restart {
                retry_count,
                retry_backoff,
            },
            Self::Ignore => Self::Ignore,
        }
    }

    /// Sets the delay between failed start attempts. No effect on `Ignore`.
    #[must_use]
    pub const fn with_retry_backoff(self, retry_backoff: Duration) -> Self {
        match self {
            Self::Restart { retry_count, .. } => Self::Restart {
                retry_count,
                retry_backoff,
            },
            Self::Ignore => Self::Ignore,
        }
    }

    pub const fn is_restart(&self) -> bool {
        matches!(self, Self::Restart { .. })
    }

    pub const fn is_ignore(&self) -> bool {
        matches!(self, Self::Ignore)
    }

    /// Total start attempts granted by this policy. `Ignore` grants a
    /// single attempt; a `Restart` count of zero is treated as one.
    pub(crate) fn attempts(&self) -> u32 {
        match self {
            Self::Restart { retry_count, .. } => (*retry_count).max(1),
            Self::Ignore => 1,
        }
    }

    pub(crate) fn backoff(&self) -> Duration {
        match self {
            Self::Restart { retry_backoff, .. } => *retry_backoff,
            Self::Ignore => Duration::ZERO,
        }
    }
}

impl Default for OnFailure {
    fn default() -> Self {
        Self::restart()
    }
}

impl fmt::Display for OnFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Restart { .. } => write!(f, "restart"),
            Self::Ignore => write!(f, "ignore"),
        }
    }
}
