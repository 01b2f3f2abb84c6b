//! Minimal built-in backend: a flat name→threshold table plus appender fan-out.
//!
//! Deliberately has no renderer of its own — `print` forwards to appenders and
//! then asks the facade to render the line with its console formatter.

use super::{Backend, LogAppender, LoggerHandle};
use crate::error::Error;
use crate::level::Level;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// One entry per logger name; the handle is the entry's index, so handles stay
/// valid for the process lifetime (the table is append-only).
struct LoggerEntry {
    name: String,
    level: Level,
}

/// Flat logger table — no hierarchy, no persistence. Enough for stand-alone use
/// and for tests; anything richer belongs in an external backend.
pub struct DefaultBackend {
    loggers: Mutex<Vec<LoggerEntry>>,
    appenders: Mutex<Vec<Arc<dyn LogAppender>>>,
    default_level: Level,
}

impl DefaultBackend {
    /// New loggers start at `default_level` until `set_logger_level` says otherwise.
    #[must_use]
    pub const fn new(default_level: Level) -> Self {
        Self {
            loggers: Mutex::new(Vec::new()),
            appenders: Mutex::new(Vec::new()),
            default_level,
        }
    }

    fn lock_loggers(&self) -> std::sync::MutexGuard<'_, Vec<LoggerEntry>> {
        self.loggers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_appenders(&self) -> std::sync::MutexGuard<'_, Vec<Arc<dyn LogAppender>>> {
        self.appenders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for DefaultBackend {
    fn default() -> Self {
        Self::new(Level::Info)
    }
}

impl Backend for DefaultBackend {
    fn initialize(&self) {}

    fn shutdown(&self) {}

    fn get_handle(&self, name: &str) -> LoggerHandle {
        let mut loggers = self.lock_loggers();
        if let Some(index) = loggers.iter().position(|entry| entry.name == name) {
            return LoggerHandle::from_raw(index);
        }
        loggers.push(LoggerEntry {
            name: name.to_string(),
            level: self.default_level,
        });
        LoggerHandle::from_raw(loggers.len() - 1)
    }

    fn get_name(&self, handle: LoggerHandle) -> String {
        self.lock_loggers()
            .get(handle.as_raw())
            .map_or_else(String::new, |entry| entry.name.clone())
    }

    fn is_enabled_for(&self, handle: LoggerHandle, level: Level) -> bool {
        self.lock_loggers()
            .get(handle.as_raw())
            .is_some_and(|entry| level >= entry.level)
    }

    fn print(
        &self,
        handle: LoggerHandle,
        level: Level,
        message: &str,
        file: &str,
        function: &str,
        line: u32,
    ) -> Result<bool, Error> {
        let _ = handle;
        for appender in self.lock_appenders().iter() {
            appender.log(level, message, file, function, line);
        }
        // No renderer of its own — the facade's console formatter takes over.
        Ok(false)
    }

    fn register_appender(&self, appender: Arc<dyn LogAppender>) {
        self.lock_appenders().push(appender);
    }

    fn deregister_appender(&self, appender: &Arc<dyn LogAppender>) {
        self.lock_appenders()
            .retain(|existing| !Arc::ptr_eq(existing, appender));
    }

    fn get_loggers(&self, out: &mut HashMap<String, Level>) -> bool {
        for entry in self.lock_loggers().iter() {
            out.insert(entry.name.clone(), entry.level);
        }
        true
    }

    fn set_logger_level(&self, name: &str, level: Level) -> bool {
        let mut loggers = self.lock_loggers();
        if let Some(entry) = loggers.iter_mut().find(|entry| entry.name == name) {
            entry.level = level;
        } else {
            loggers.push(LoggerEntry {
                name: name.to_string(),
                level,
            });
        }
        true
    }
}
