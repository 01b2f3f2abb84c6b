//! Call-site macros: the per-statement static site, its lazy registration,
//! and the cached-bit fast path.
//!
//! Each expansion declares its own `static LogSite`, so a disabled statement
//! costs one relaxed atomic load after its first hit — no lock, no backend
//! query, no formatting.

/// Logs at `level` through a named logger.
///
/// The name is resolved to a backend handle once, on the statement's first
/// execution; later executions only consult the cached enabled bit.
#[macro_export]
macro_rules! log_named {
    ($level:expr, $name:expr, $($arg:tt)+) => {{
        static SITE: $crate::LogSite = $crate::LogSite::new();
        let console = $crate::Console::global();
        if !SITE.is_initialized() {
            console.initialize_site(&SITE, $name, $level);
        }
        if SITE.is_enabled() {
            console.print(
                ::core::option::Option::None,
                SITE.handle(),
                $level,
                file!(),
                line!(),
                module_path!(),
                format_args!($($arg)+),
            );
        }
    }};
}

/// Logs at `level` through the logger named after the enclosing module.
#[macro_export]
macro_rules! log {
    ($level:expr, $($arg:tt)+) => {
        $crate::log_named!($level, module_path!(), $($arg)+)
    };
}

/// Debug-level shorthand for [`log!`].
#[macro_export]
macro_rules! debug {
    ($($arg:tt)+) => { $crate::log!($crate::Level::Debug, $($arg)+) };
}

/// Info-level shorthand for [`log!`].
#[macro_export]
macro_rules! info {
    ($($arg:tt)+) => { $crate::log!($crate::Level::Info, $($arg)+) };
}

/// Warn-level shorthand for [`log!`].
#[macro_export]
macro_rules! warn {
    ($($arg:tt)+) => { $crate::log!($crate::Level::Warn, $($arg)+) };
}

/// Error-level shorthand for [`log!`].
#[macro_export]
macro_rules! error {
    ($($arg:tt)+) => { $crate::log!($crate::Level::Error, $($arg)+) };
}

/// Fatal-level shorthand for [`log!`].
#[macro_export]
macro_rules! fatal {
    ($($arg:tt)+) => { $crate::log!($crate::Level::Fatal, $($arg)+) };
}

/// Debug-level shorthand for [`log_named!`].
#[macro_export]
macro_rules! debug_named {
    ($name:expr, $($arg:tt)+) => { $crate::log_named!($crate::Level::Debug, $name, $($arg)+) };
}

/// Info-level shorthand for [`log_named!`].
#[macro_export]
macro_rules! info_named {
    ($name:expr, $($arg:tt)+) => { $crate::log_named!($crate::Level::Info, $name, $($arg)+) };
}

/// Warn-level shorthand for [`log_named!`].
#[macro_export]
macro_rules! warn_named {
    ($name:expr, $($arg:tt)+) => { $crate::log_named!($crate::Level::Warn, $name, $($arg)+) };
}

/// Error-level shorthand for [`log_named!`].
#[macro_export]
macro_rules! error_named {
    ($name:expr, $($arg:tt)+) => { $crate::log_named!($crate::Level::Error, $name, $($arg)+) };
}

/// Fatal-level shorthand for [`log_named!`].
#[macro_export]
macro_rules! fatal_named {
    ($name:expr, $($arg:tt)+) => { $crate::log_named!($crate::Level::Fatal, $name, $($arg)+) };
}
