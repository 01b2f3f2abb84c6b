//! Color and stream selection for the built-in console renderer.
//!
//! Basic 8-color SGR codes rather than true color: log lines land in piped
//! output, CI captures, and remote shells where 24-bit support is not a given.

use crate::level::Level;

/// Terminates any active SGR styling so subsequent text returns to the
/// terminal default.
pub const RESET: &str = "\x1b[0m";

const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const NORMAL: &str = "";

/// Where and how the console renderer writes one level: the SGR prefix and
/// whether the line goes to stdout (`true`) or stderr (`false`).
#[must_use]
pub const fn console_style(level: Level) -> (&'static str, bool) {
    match level {
        Level::Fatal | Level::Error => (RED, false),
        Level::Warn => (YELLOW, false),
        Level::Info => (NORMAL, true),
        Level::Debug => (GREEN, true),
    }
}
