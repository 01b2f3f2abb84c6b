//! Startup configuration: TOML file loading plus environment overrides.
//!
//! Read once when the console is constructed; the print pipeline never
//! re-reads configuration mid-flight. A completely empty config file must
//! still produce a working facade — `#[serde(default)]` on every field
//! ensures zero-config works out of the box.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Format used when neither config file nor environment overrides one.
pub const DEFAULT_FORMAT: &str = "[${severity}] [${time}]: ${message}";

/// Template override, mirrors the `format` config key.
pub const ENV_FORMAT: &str = "SITELOG_FORMAT";
/// `1` forces a flush after every stdout line; `0` (default) leaves stdout buffered.
pub const ENV_LINE_BUFFERED: &str = "SITELOG_STDOUT_LINE_BUFFERED";
/// Presence of `NO_COLOR` (any value) disables colorized console output.
pub const ENV_NO_COLOR: &str = "NO_COLOR";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Console line template, `${name}` placeholder syntax.
    pub format: String,
    /// Force a flush after every stdout line — useful when stdout is piped
    /// and the consumer needs lines promptly.
    pub stdout_line_buffered: bool,
    /// Piped output and CI environments can't render ANSI escape codes.
    pub colors: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format: DEFAULT_FORMAT.to_string(),
            stdout_line_buffered: false,
            colors: true,
        }
    }
}

impl Config {
    /// Primary entry point: platform config file (if any) with environment
    /// overrides applied on top. A missing file is not an error — defaults
    /// apply, because the facade must come up even with no configuration.
    #[must_use]
    pub fn load() -> Self {
        let mut config = Self::config_path()
            .and_then(|path| Self::load_from(&path).ok())
            .unwrap_or_default();
        config.apply_env();
        config
    }

    /// Loads from an explicit path instead of the default location — for
    /// tests and embedders with their own config layout. Does not touch the
    /// environment.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed; a missing file
    /// yields defaults instead.
    pub fn load_from(path: &Path) -> Result<Self, crate::Error> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Environment wins over the config file — it is the operator's
    /// per-invocation knob.
    pub fn apply_env(&mut self) {
        if let Ok(format) = std::env::var(ENV_FORMAT) {
            self.format = format;
        }
        if let Ok(value) = std::env::var(ENV_LINE_BUFFERED) {
            match parse_line_buffered(&value) {
                Some(forced) => self.stdout_line_buffered = forced,
                None => eprintln!(
                    "Warning: unexpected value {value} specified for {ENV_LINE_BUFFERED}. \
                     Default value 0 will be used. Valid values are 1 or 0."
                ),
            }
        }
        if std::env::var(ENV_NO_COLOR).is_ok() {
            self.colors = false;
        }
    }

    fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "sitelog")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

/// Only `1` and `0` are valid; anything else is reported and ignored.
#[must_use]
pub fn parse_line_buffered(value: &str) -> Option<bool> {
    match value {
        "1" => Some(true),
        "0" => Some(false),
        _ => None,
    }
}
