//! Per-emission veto and rewrite hook.
//!
//! A filter sees one fully formatted message with its call-site metadata and
//! may veto emission, change the outgoing level in place, or swap the message
//! text. Absence of a filter is equivalent to an always-true no-op.

use crate::backend::LoggerHandle;
use crate::level::Level;

/// Mutable view of one emission, alive only for the duration of that call.
#[derive(Debug)]
pub struct FilterParams<'a> {
    pub file: &'a str,
    pub function: &'a str,
    pub line: u32,
    /// Mutating this changes the level that gets recorded and forwarded.
    pub level: Level,
    pub logger: LoggerHandle,
    /// The rendered message as formatted by the print pipeline.
    pub message: &'a str,
    /// When set non-empty, replaces the outgoing message text.
    pub out_message: Option<String>,
}

/// Implementations must not touch global state beyond the params — a filter
/// that logs from inside `is_enabled` hits the reentrancy guard and loses the
/// nested message.
pub trait Filter {
    /// `false` vetoes emission entirely, before any backend interaction.
    fn is_enabled(&mut self, params: &mut FilterParams<'_>) -> bool;
}
