//! Severity levels that gate which call sites are allowed to emit.

use std::fmt;
use std::str::FromStr;

/// Derives `Ord` so the backend can compare a message's level against a logger's threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Level {
    /// Development-time diagnostics, routed to stdout in green by the console renderer.
    Debug = 0,
    /// Normal operational milestones — the default threshold for new loggers.
    #[default]
    Info = 1,
    /// Non-fatal anomalies that may need attention (retries, deprecations).
    Warn = 2,
    /// Failures worth recording — the last one is kept in the last-error slot.
    Error = 3,
    /// Failures the application is not expected to survive.
    Fatal = 4,
}

impl Level {
    /// Lowercase because config files and logger tables use lowercase level strings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Fatal => "fatal",
        }
    }

    /// Single-letter code used by the `${severity}` template token.
    #[must_use]
    pub const fn letter(self) -> &'static str {
        match self {
            Self::Debug => "D",
            Self::Info => "I",
            Self::Warn => "W",
            Self::Error => "E",
            Self::Fatal => "F",
        }
    }

    /// Convenience for iteration — used by the built-in backend's logger table and tests.
    #[must_use]
    pub const fn all() -> [Self; 5] {
        [
            Self::Debug,
            Self::Info,
            Self::Warn,
            Self::Error,
            Self::Fatal,
        ]
    }

    /// Call sites store their level as a raw atomic byte; this maps it back.
    /// Out-of-range values cannot be produced through the registry, so they
    /// collapse to the default rather than panicking.
    #[must_use]
    pub(crate) const fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::Debug,
            2 => Self::Warn,
            3 => Self::Error,
            4 => Self::Fatal,
            _ => Self::Info,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned by `FromStr` so callers can distinguish "unknown level" from other parse failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLevelError(String);

impl fmt::Display for ParseLevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown log level: '{}'", self.0)
    }
}

impl std::error::Error for ParseLevelError {}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" | "err" => Ok(Self::Error),
            "fatal" => Ok(Self::Fatal),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}
