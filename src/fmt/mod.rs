//! Message rendering: template compilation, token evaluation, and the ANSI
//! color scheme of the built-in console renderer.
//!
//! A template is compiled once into a token sequence; every emitted line then
//! walks that sequence instead of re-scanning the template string.

mod color;
mod template;
mod token;

pub use color::{RESET, console_style};
pub use template::Formatter;
pub use token::Token;

use crate::level::Level;
use std::collections::HashMap;

/// Everything a token may need from one emission — rendering is a pure
/// function of this plus the render context.
#[derive(Debug, Clone, Copy)]
pub struct LogEvent<'a> {
    pub level: Level,
    /// The already-formatted message text (the `${message}` token inserts it verbatim).
    pub message: &'a str,
    pub file: &'a str,
    pub function: &'a str,
    pub line: u32,
    /// Resolved ahead of rendering so tokens never have to call back into the backend.
    pub logger: &'a str,
}

/// Process-wide state tokens resolve against: the fixed-token map for unknown
/// `${name}` placeholders, and the simulated clock for `${time}`.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub fixed_tokens: &'a HashMap<String, String>,
    /// Simulated time in seconds since epoch, when a sim clock is active and valid.
    pub sim_time: Option<f64>,
}

impl RenderContext<'_> {
    /// Most call paths have no fixed tokens and no sim clock.
    #[must_use]
    pub fn empty() -> RenderContext<'static> {
        static EMPTY: std::sync::LazyLock<HashMap<String, String>> =
            std::sync::LazyLock::new(HashMap::new);
        RenderContext {
            fixed_tokens: &EMPTY,
            sim_time: None,
        }
    }
}
