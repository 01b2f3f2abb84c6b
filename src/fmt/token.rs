//! One render function per token kind. The variant set is closed and small,
//! so an enum beats trait objects: no allocation per token, exhaustive
//! matching, and structural equality for free (the template tests rely on it).

use super::{LogEvent, RenderContext};
use chrono::{DateTime, Local};
use std::fmt::Write;

/// Paths longer than this render as `...` plus their final bytes.
const SHORT_FILE_MAX: usize = 30;

/// One unit of a compiled message template, literal or computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Verbatim text between placeholders.
    Literal(String),
    /// Unknown placeholder name, resolved against the fixed-token map at
    /// render time; falls back to the literal `${key}` text when unset.
    FixedMap(String),
    /// Single-letter severity code (D/I/W/E/F).
    Severity,
    /// The formatted message itself.
    Message,
    /// Wall-clock time, with the simulated time appended comma-separated when
    /// a sim clock is active. Optional chrono format string.
    Time(Option<String>),
    /// Wall-clock time only, never the simulated clock. Optional format string.
    WallTime(Option<String>),
    /// Identifier of the emitting thread.
    Thread,
    /// Name of the backend logger the call site resolved to.
    Logger,
    /// Full file path of the call site.
    File,
    /// File path truncated to its final 30 bytes with a `...` marker.
    ShortFile,
    /// Function (module path) of the call site.
    Function,
    /// Line number of the call site.
    Line,
}

impl Token {
    /// Dynamic tokens (time, thread) re-evaluate on every call — no caching
    /// across events.
    #[must_use]
    pub fn render(&self, event: &LogEvent<'_>, ctx: &RenderContext<'_>) -> String {
        match self {
            Self::Literal(text) => text.clone(),
            Self::FixedMap(key) => ctx
                .fixed_tokens
                .get(key)
                .cloned()
                .unwrap_or_else(|| format!("${{{key}}}")),
            Self::Severity => event.level.letter().to_string(),
            Self::Message => event.message.to_string(),
            Self::Time(format) => render_time(format.as_deref(), ctx.sim_time),
            Self::WallTime(format) => render_wall_time(format.as_deref()),
            Self::Thread => format!("{:?}", std::thread::current().id()),
            Self::Logger => event.logger.to_string(),
            Self::File => event.file.to_string(),
            Self::ShortFile => short_file(event.file),
            Self::Function => event.function.to_string(),
            Self::Line => event.line.to_string(),
        }
    }
}

/// `${time}` — epoch seconds with five decimals by default, calendar rendering
/// with a format string, sim time appended when one is active.
fn render_time(format: Option<&str>, sim_time: Option<f64>) -> String {
    let now = Local::now();
    let mut out = match format {
        None => format!("{:.5}", epoch_seconds(&now)),
        Some(fmt) => calendar(&now, fmt, 5),
    };
    if let Some(sim) = sim_time {
        out.push_str(", ");
        match format {
            None => {
                let _ = write!(out, "{sim:.5}");
            }
            Some(fmt) => out.push_str(&sim_calendar(sim, fmt)),
        }
    }
    out
}

/// `${walltime}` — like `${time}` but with three decimals and no sim clock.
fn render_wall_time(format: Option<&str>) -> String {
    let now = Local::now();
    match format {
        None => format!("{:.3}", epoch_seconds(&now)),
        Some(fmt) => calendar(&now, fmt, 3),
    }
}

fn epoch_seconds(now: &DateTime<Local>) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let secs = now.timestamp() as f64;
    secs + f64::from(now.timestamp_subsec_micros()) / 1_000_000.0
}

/// chrono reports bad format specifiers through `fmt::Error` when the delayed
/// format is written out; a malformed user format must degrade to the epoch
/// rendering, never panic the emitting thread.
fn calendar(now: &DateTime<Local>, fmt: &str, decimals: usize) -> String {
    let mut out = String::new();
    if write!(out, "{}", now.format(fmt)).is_err() {
        return format!("{:.*}", decimals, epoch_seconds(now));
    }
    out
}

fn sim_calendar(sim: f64, fmt: &str) -> String {
    #[allow(clippy::cast_possible_truncation)]
    let secs = sim.trunc() as i64;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let nanos = (sim.fract() * 1_000_000_000.0).max(0.0) as u32;
    DateTime::from_timestamp(secs, nanos).map_or_else(
        || format!("{sim:.5}"),
        |dt| {
            let local = dt.with_timezone(&Local);
            calendar(&local, fmt, 5)
        },
    )
}

/// The bound is a byte count, not a character count: call-site paths are
/// compiler-provided and effectively ASCII, and a byte bound keeps the hot
/// path free of UTF-8 walking. A cut mid-sequence is rendered lossily.
fn short_file(file: &str) -> String {
    let len = file.len();
    if len > SHORT_FILE_MAX + 3 {
        let tail = String::from_utf8_lossy(&file.as_bytes()[len - SHORT_FILE_MAX..]);
        format!("...{tail}")
    } else {
        file.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::short_file;

    #[test]
    fn short_file_byte_bound() {
        let path = "a".repeat(33);
        assert_eq!(short_file(&path), path);

        let path = "b".repeat(34);
        assert_eq!(short_file(&path), format!("...{}", "b".repeat(30)));
    }
}
