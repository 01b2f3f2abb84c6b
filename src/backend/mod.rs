//! Boundary to the external logging implementation.
//!
//! The facade never decides which loggers exist or what their thresholds are —
//! it caches and invokes decisions made behind this trait. The built-in
//! [`DefaultBackend`] keeps a flat logger table so the crate works stand-alone;
//! richer implementations (hierarchical loggers, persistent config) plug in
//! through the same trait.

mod default;

pub use default::DefaultBackend;

use crate::error::Error;
use crate::level::Level;
use std::collections::HashMap;
use std::sync::Arc;

/// Opaque reference to one backend logger. Cheap to copy so every call site
/// can carry one; only the issuing backend can interpret the raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoggerHandle(usize);

impl LoggerHandle {
    /// Backends mint handles from whatever index scheme they use internally.
    #[must_use]
    pub const fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    /// Raw value back out — only meaningful to the backend that minted it.
    #[must_use]
    pub const fn as_raw(self) -> usize {
        self.0
    }
}

/// An output sink managed entirely by the backend (file, network, console).
///
/// `Send + Sync` because appenders are invoked from whichever application
/// thread happens to be printing.
pub trait LogAppender: Send + Sync {
    /// Receives every record that survived filtering, with full call-site metadata.
    fn log(&self, level: Level, message: &str, file: &str, function: &str, line: u32);
}

/// Required operations the facade invokes on its backend collaborator.
pub trait Backend: Send + Sync {
    /// Lifecycle hook, called once when the console is constructed.
    fn initialize(&self);

    /// Lifecycle hook, called once at console shutdown.
    fn shutdown(&self);

    /// Resolves a logger name to a handle, creating the logger if needed.
    fn get_handle(&self, name: &str) -> LoggerHandle;

    /// Reverse lookup for the `${logger}` template token.
    fn get_name(&self, handle: LoggerHandle) -> String;

    /// The threshold decision every cached enabled bit is derived from.
    fn is_enabled_for(&self, handle: LoggerHandle, level: Level) -> bool;

    /// Hands over one record for persistence or display.
    ///
    /// Returns `Ok(true)` if the backend rendered the record itself, `Ok(false)`
    /// to ask the facade to render it with its own console formatter.
    ///
    /// # Errors
    /// Whatever the backend's sink reports; the caller isolates the failure and
    /// the process continues.
    fn print(
        &self,
        handle: LoggerHandle,
        level: Level,
        message: &str,
        file: &str,
        function: &str,
        line: u32,
    ) -> Result<bool, Error>;

    /// Adds a sink that receives every surviving record.
    fn register_appender(&self, appender: Arc<dyn LogAppender>);

    /// Removes a previously registered sink (identity by `Arc::ptr_eq`).
    fn deregister_appender(&self, appender: &Arc<dyn LogAppender>);

    /// Fills `out` with the current logger table; `false` if unsupported.
    fn get_loggers(&self, out: &mut HashMap<String, Level>) -> bool;

    /// Updates one logger's threshold; `false` if unsupported or rejected.
    /// Callers must follow a successful update with a levels-changed
    /// notification so cached bits are recomputed.
    fn set_logger_level(&self, name: &str, level: Level) -> bool;
}
