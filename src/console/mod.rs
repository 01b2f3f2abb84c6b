//! The facade's lifecycle object and single emission entry point.
//!
//! One `Console` owns everything a call site needs after its enabled bit says
//! "go": the compiled formatter, the shared scratch buffer, the reentrancy
//! marker, the site registry, and the backend handle. Applications normally
//! use the process-wide instance behind [`Console::global`]; tests construct
//! their own with a mock backend.

use crate::backend::{Backend, DefaultBackend, LogAppender, LoggerHandle};
use crate::config::Config;
use crate::filter::{Filter, FilterParams};
use crate::fmt::{Formatter, LogEvent, RenderContext, console_style};
use crate::level::Level;
use crate::site::{LogSite, SiteRegistry};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::io::{self, Write as _};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use std::thread::{self, ThreadId};

static GLOBAL: OnceLock<Console> = OnceLock::new();

/// A poisoned lock must never take logging down with it — recover the guard.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Clears the "currently printing" marker on every exit path — veto, success,
/// reported backend failure, or unwind — so no thread is ever permanently
/// locked out.
struct PrintingGuard<'a> {
    printing: &'a Mutex<Option<ThreadId>>,
}

impl<'a> PrintingGuard<'a> {
    fn set(printing: &'a Mutex<Option<ThreadId>>, id: ThreadId) -> Self {
        *lock(printing) = Some(id);
        Self { printing }
    }
}

impl Drop for PrintingGuard<'_> {
    fn drop(&mut self) {
        *lock(self.printing) = None;
    }
}

/// Process-wide logging state with an explicit init/teardown lifecycle.
/// Configuration is fixed at construction; everything mutable afterwards
/// (registry, scratch buffer, fixed tokens, sim clock, last error) lives
/// behind its own lock or atomic.
pub struct Console {
    backend: Arc<dyn Backend>,
    formatter: Formatter,
    registry: SiteRegistry,
    /// Shared across all emissions, retaining capacity — sized to the largest
    /// message formatted so far.
    scratch: Mutex<String>,
    /// Which thread is inside an emission right now. A marker, not a counter:
    /// at most one emission is active process-wide, and a nested attempt from
    /// the same thread is dropped rather than deadlocking.
    printing: Mutex<Option<ThreadId>>,
    shutting_down: AtomicBool,
    last_error: Mutex<String>,
    fixed_tokens: Mutex<HashMap<String, String>>,
    sim_time: Mutex<Option<f64>>,
    colors: bool,
    stdout_line_buffered: bool,
    /// A persistently failing flush would otherwise spam one report per line.
    flush_failure_reported: AtomicBool,
}

impl Console {
    /// Compiles the format template and runs the backend's init hook.
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>, config: &Config) -> Self {
        backend.initialize();
        Self {
            backend,
            formatter: Formatter::compile(&config.format),
            registry: SiteRegistry::new(),
            scratch: Mutex::new(String::new()),
            printing: Mutex::new(None),
            shutting_down: AtomicBool::new(false),
            last_error: Mutex::new("Unknown Error".to_string()),
            fixed_tokens: Mutex::new(HashMap::new()),
            sim_time: Mutex::new(None),
            colors: config.colors,
            stdout_line_buffered: config.stdout_line_buffered,
            flush_failure_reported: AtomicBool::new(false),
        }
    }

    /// The process-wide instance the logging macros use. Auto-initializes on
    /// first use with the built-in backend and loaded config, so a bare
    /// `info!(...)` works without setup.
    pub fn global() -> &'static Self {
        GLOBAL.get_or_init(|| Self::new(Arc::new(DefaultBackend::default()), &Config::load()))
    }

    /// Installs an explicit backend and config as the process-wide instance.
    /// Only the first initializer takes effect; later calls (and the
    /// auto-init path) return the existing instance.
    pub fn init_global(backend: Arc<dyn Backend>, config: &Config) -> &'static Self {
        GLOBAL.get_or_init(|| Self::new(backend, config))
    }

    /// After this, every emission is a silent no-op. Called once at teardown.
    pub fn shutdown(&self) {
        self.shutting_down.store(true, Ordering::Relaxed);
        self.backend.shutdown();
    }

    /// Binds a value to an unknown `${key}` placeholder; until set, the
    /// placeholder renders as its literal `${key}` text.
    pub fn set_fixed_token(&self, key: impl Into<String>, value: impl Into<String>) {
        lock(&self.fixed_tokens).insert(key.into(), value.into());
    }

    /// Activates (`Some`) or clears (`None`) the simulated clock the
    /// `${time}` token appends.
    pub fn set_sim_time(&self, seconds: Option<f64>) {
        *lock(&self.sim_time) = seconds;
    }

    /// Text of the most recent emission whose final level was `Error`.
    #[must_use]
    pub fn last_error(&self) -> String {
        lock(&self.last_error).clone()
    }

    /// Lazy one-time registration for a call site; safe to race from
    /// concurrent first hits of the same statement.
    pub fn initialize_site(&self, site: &'static LogSite, name: &str, level: Level) {
        self.registry
            .initialize(self.backend.as_ref(), site, name, level);
    }

    /// Per-site level override; the enabled bit stays untouched until the
    /// next recompute.
    pub fn set_site_level(&self, site: &LogSite, level: Level) {
        self.registry.set_level(site, level);
    }

    /// Recomputes one site's enabled bit against the backend's current state.
    pub fn check_site_enabled(&self, site: &LogSite) {
        self.registry.check_enabled(self.backend.as_ref(), site);
    }

    /// Consumes the backend's "logger levels changed" notification: one sweep
    /// over every registered site.
    pub fn notify_levels_changed(&self) {
        self.registry.notify_levels_changed(self.backend.as_ref());
    }

    /// Registered sites — exposed for diagnostics and tests.
    #[must_use]
    pub const fn registry(&self) -> &SiteRegistry {
        &self.registry
    }

    pub fn register_appender(&self, appender: Arc<dyn LogAppender>) {
        self.backend.register_appender(appender);
    }

    pub fn deregister_appender(&self, appender: &Arc<dyn LogAppender>) {
        self.backend.deregister_appender(appender);
    }

    /// Snapshot of the backend's logger table; `false` if unsupported.
    pub fn get_loggers(&self, out: &mut HashMap<String, Level>) -> bool {
        self.backend.get_loggers(out)
    }

    /// Updates a backend threshold and, on success, recomputes every cached
    /// enabled bit so call sites observe the change.
    pub fn set_logger_level(&self, name: &str, level: Level) -> bool {
        let changed = self.backend.set_logger_level(name, level);
        if changed {
            self.notify_levels_changed();
        }
        changed
    }

    /// Emission entry point for format arguments, rendered into the shared
    /// scratch buffer.
    ///
    /// Guarantees: a no-op after shutdown; a same-thread nested call is
    /// dropped with a one-line stderr warning; emissions from different
    /// threads are fully serialized; a backend failure is reported to stderr,
    /// never propagated.
    pub fn print(
        &self,
        filter: Option<&mut dyn Filter>,
        handle: LoggerHandle,
        level: Level,
        file: &str,
        line: u32,
        function: &str,
        args: std::fmt::Arguments<'_>,
    ) {
        if self.shutting_down.load(Ordering::Relaxed) {
            return;
        }
        let current = thread::current().id();
        if self.is_printing(current) {
            eprintln!("Warning: recursive print statement has occurred. Throwing out recursive print.");
            return;
        }

        let mut scratch = lock(&self.scratch);
        let _guard = PrintingGuard::set(&self.printing, current);

        // Formatting into a capacity-retaining String: grows to the largest
        // message seen, then reuses that allocation.
        scratch.clear();
        let _ = scratch.write_fmt(args);

        self.emit(filter, handle, level, file, line, function, &mut scratch);
    }

    /// Emission entry point for an already-rendered message; bypasses the
    /// shared scratch buffer but follows the same serialization and guards.
    pub fn print_str(
        &self,
        filter: Option<&mut dyn Filter>,
        handle: LoggerHandle,
        level: Level,
        file: &str,
        line: u32,
        function: &str,
        message: &str,
    ) {
        if self.shutting_down.load(Ordering::Relaxed) {
            return;
        }
        let current = thread::current().id();
        if self.is_printing(current) {
            eprintln!("Warning: recursive print statement has occurred. Throwing out recursive print.");
            return;
        }

        let _serialize = lock(&self.scratch);
        let _guard = PrintingGuard::set(&self.printing, current);

        let mut owned = message.to_string();
        self.emit(filter, handle, level, file, line, function, &mut owned);
    }

    fn is_printing(&self, current: ThreadId) -> bool {
        *lock(&self.printing) == Some(current)
    }

    /// Filter, last-error tracking, and backend dispatch for one formatted
    /// message. The filter runs after formatting so it sees the final text;
    /// its level mutation is what gets recorded and forwarded.
    fn emit(
        &self,
        filter: Option<&mut dyn Filter>,
        handle: LoggerHandle,
        level: Level,
        file: &str,
        line: u32,
        function: &str,
        message: &mut String,
    ) {
        let mut enabled = true;
        let mut level = level;

        if let Some(filter) = filter {
            let (filter_enabled, filter_level, replacement) = {
                let mut params = FilterParams {
                    file,
                    function,
                    line,
                    level,
                    logger: handle,
                    message: message.as_str(),
                    out_message: None,
                };
                let filter_enabled = filter.is_enabled(&mut params);
                (filter_enabled, params.level, params.out_message)
            };
            enabled = filter_enabled;
            level = filter_level;
            if let Some(replacement) = replacement {
                if !replacement.is_empty() {
                    message.clear();
                    message.push_str(&replacement);
                }
            }
        }

        if !enabled {
            return;
        }

        if level == Level::Error {
            lock(&self.last_error).clone_from(message);
        }

        match self
            .backend
            .print(handle, level, message, file, function, line)
        {
            Ok(true) => {}
            Ok(false) => self.console_print(handle, level, message, file, function, line),
            Err(e) => eprintln!("Caught error while logging: [{e}]"),
        }
    }

    /// The built-in renderer, used when the backend reports it has no richer
    /// one: template rendering, per-level color and stream, optional forced
    /// stdout flush.
    fn console_print(
        &self,
        handle: LoggerHandle,
        level: Level,
        message: &str,
        file: &str,
        function: &str,
        line: u32,
    ) {
        let logger_name = self.backend.get_name(handle);
        let event = LogEvent {
            level,
            message,
            file,
            function,
            line,
            logger: &logger_name,
        };
        let rendered = {
            let fixed_tokens = lock(&self.fixed_tokens);
            let ctx = RenderContext {
                fixed_tokens: &fixed_tokens,
                sim_time: *lock(&self.sim_time),
            };
            self.formatter.render(&event, &ctx)
        };

        let (color, to_stdout) = console_style(level);
        let text = if self.colors && !color.is_empty() {
            format!("{color}{rendered}{}", crate::fmt::RESET)
        } else {
            rendered
        };

        if to_stdout {
            let mut out = io::stdout().lock();
            let _ = writeln!(out, "{text}");
            if self.stdout_line_buffered {
                if let Err(e) = out.flush() {
                    if !self.flush_failure_reported.swap(true, Ordering::Relaxed) {
                        eprintln!("Error: failed to flush stdout: {e}");
                    }
                }
            }
        } else {
            let _ = writeln!(io::stderr().lock(), "{text}");
        }
    }
}
