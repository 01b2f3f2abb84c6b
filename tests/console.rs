//! Tests for the print pipeline: filtering, buffer reuse, reentrancy,
//! last-error tracking, and backend failure isolation.

use sitelog::{
    Backend, Config, Console, Error, Filter, FilterParams, Level, LogAppender, LoggerHandle,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

/// Records every print it receives and renders nothing itself beyond that.
#[derive(Default)]
struct RecordingBackend {
    prints: Mutex<Vec<(Level, String)>>,
}

impl RecordingBackend {
    fn prints(&self) -> Vec<(Level, String)> {
        self.prints.lock().unwrap().clone()
    }
}

impl Backend for RecordingBackend {
    fn initialize(&self) {}
    fn shutdown(&self) {}

    fn get_handle(&self, _name: &str) -> LoggerHandle {
        LoggerHandle::from_raw(0)
    }

    fn get_name(&self, _handle: LoggerHandle) -> String {
        "test".to_string()
    }

    fn is_enabled_for(&self, _handle: LoggerHandle, _level: Level) -> bool {
        true
    }

    fn print(
        &self,
        _handle: LoggerHandle,
        level: Level,
        message: &str,
        _file: &str,
        _function: &str,
        _line: u32,
    ) -> Result<bool, Error> {
        self.prints.lock().unwrap().push((level, message.to_string()));
        Ok(true)
    }

    fn register_appender(&self, _appender: Arc<dyn LogAppender>) {}
    fn deregister_appender(&self, _appender: &Arc<dyn LogAppender>) {}

    fn get_loggers(&self, _out: &mut HashMap<String, Level>) -> bool {
        false
    }

    fn set_logger_level(&self, _name: &str, _level: Level) -> bool {
        false
    }
}

fn console_with_recorder() -> (Console, Arc<RecordingBackend>) {
    let backend = Arc::new(RecordingBackend::default());
    let console = Console::new(backend.clone(), &Config::default());
    (console, backend)
}

fn handle() -> LoggerHandle {
    LoggerHandle::from_raw(0)
}

struct VetoFilter;

impl Filter for VetoFilter {
    fn is_enabled(&mut self, _params: &mut FilterParams<'_>) -> bool {
        false
    }
}

struct ReplaceFilter(&'static str);

impl Filter for ReplaceFilter {
    fn is_enabled(&mut self, params: &mut FilterParams<'_>) -> bool {
        params.out_message = Some(self.0.to_string());
        true
    }
}

struct DowngradeFilter;

impl Filter for DowngradeFilter {
    fn is_enabled(&mut self, params: &mut FilterParams<'_>) -> bool {
        params.level = Level::Warn;
        true
    }
}

#[test]
fn plain_print_reaches_backend() {
    let (console, backend) = console_with_recorder();
    console.print(
        None,
        handle(),
        Level::Info,
        "src/a.rs",
        1,
        "a::run",
        format_args!("hello {}", 7),
    );
    assert_eq!(backend.prints(), vec![(Level::Info, "hello 7".to_string())]);
}

#[test]
fn print_str_passes_message_verbatim() {
    let (console, backend) = console_with_recorder();
    console.print_str(None, handle(), Level::Info, "src/a.rs", 1, "a::run", "as-is");
    assert_eq!(backend.prints(), vec![(Level::Info, "as-is".to_string())]);
}

#[test]
fn filter_veto_reaches_no_backend() {
    let (console, backend) = console_with_recorder();
    let mut filter = VetoFilter;
    console.print(
        Some(&mut filter),
        handle(),
        Level::Fatal,
        "src/a.rs",
        1,
        "a::run",
        format_args!("vetoed"),
    );
    assert!(backend.prints().is_empty());
}

#[test]
fn filter_replacement_overwrites_message() {
    let (console, backend) = console_with_recorder();
    let mut filter = ReplaceFilter("replacement");
    console.print(
        Some(&mut filter),
        handle(),
        Level::Info,
        "src/a.rs",
        1,
        "a::run",
        format_args!("original"),
    );
    assert_eq!(
        backend.prints(),
        vec![(Level::Info, "replacement".to_string())]
    );
}

#[test]
fn filter_level_mutation_is_forwarded() {
    let (console, backend) = console_with_recorder();
    let mut filter = DowngradeFilter;
    console.print(
        Some(&mut filter),
        handle(),
        Level::Error,
        "src/a.rs",
        1,
        "a::run",
        format_args!("downgraded"),
    );
    assert_eq!(
        backend.prints(),
        vec![(Level::Warn, "downgraded".to_string())]
    );
    // Downgraded below Error before the last-error slot was written.
    assert_eq!(console.last_error(), "Unknown Error");
}

#[test]
fn last_error_keeps_most_recent() {
    let (console, _backend) = console_with_recorder();
    assert_eq!(console.last_error(), "Unknown Error");
    for msg in ["a", "b"] {
        console.print(
            None,
            handle(),
            Level::Error,
            "src/a.rs",
            1,
            "a::run",
            format_args!("{msg}"),
        );
    }
    assert_eq!(console.last_error(), "b");
}

#[test]
fn scratch_buffer_grows_and_is_reused() {
    let (console, backend) = console_with_recorder();
    let big = "x".repeat(64 * 1024);
    console.print(
        None,
        handle(),
        Level::Info,
        "src/a.rs",
        1,
        "a::run",
        format_args!("{big}"),
    );
    console.print(
        None,
        handle(),
        Level::Info,
        "src/a.rs",
        2,
        "a::run",
        format_args!("small"),
    );
    let prints = backend.prints();
    assert_eq!(prints[0].1, big);
    assert_eq!(prints[1].1, "small");
}

#[test]
fn shutdown_makes_print_a_noop() {
    let (console, backend) = console_with_recorder();
    console.shutdown();
    console.print(
        None,
        handle(),
        Level::Fatal,
        "src/a.rs",
        1,
        "a::run",
        format_args!("dropped"),
    );
    assert!(backend.prints().is_empty());
}

/// A backend whose print logs through the console — the pathological case the
/// reentrancy guard exists for.
#[derive(Default)]
struct ReentrantBackend {
    console: OnceLock<Arc<Console>>,
    outer_prints: Mutex<Vec<String>>,
}

impl Backend for ReentrantBackend {
    fn initialize(&self) {}
    fn shutdown(&self) {}

    fn get_handle(&self, _name: &str) -> LoggerHandle {
        LoggerHandle::from_raw(0)
    }

    fn get_name(&self, _handle: LoggerHandle) -> String {
        "reentrant".to_string()
    }

    fn is_enabled_for(&self, _handle: LoggerHandle, _level: Level) -> bool {
        true
    }

    fn print(
        &self,
        handle: LoggerHandle,
        _level: Level,
        message: &str,
        file: &str,
        function: &str,
        line: u32,
    ) -> Result<bool, Error> {
        self.outer_prints.lock().unwrap().push(message.to_string());
        if let Some(console) = self.console.get() {
            // This nested attempt must be dropped, not deadlock.
            console.print(
                None,
                handle,
                Level::Info,
                file,
                line,
                function,
                format_args!("nested"),
            );
        }
        Ok(true)
    }

    fn register_appender(&self, _appender: Arc<dyn LogAppender>) {}
    fn deregister_appender(&self, _appender: &Arc<dyn LogAppender>) {}

    fn get_loggers(&self, _out: &mut HashMap<String, Level>) -> bool {
        false
    }

    fn set_logger_level(&self, _name: &str, _level: Level) -> bool {
        false
    }
}

#[test]
fn reentrant_print_is_dropped_and_marker_cleared() {
    let backend = Arc::new(ReentrantBackend::default());
    let console = Arc::new(Console::new(backend.clone(), &Config::default()));
    backend.console.set(console.clone()).ok().unwrap();

    console.print(
        None,
        handle(),
        Level::Info,
        "src/a.rs",
        1,
        "a::run",
        format_args!("outer"),
    );
    // The nested "nested" message was thrown out.
    assert_eq!(*backend.outer_prints.lock().unwrap(), vec!["outer"]);

    // The printing marker was cleared: a later emission goes through.
    console.print(
        None,
        handle(),
        Level::Info,
        "src/a.rs",
        2,
        "a::run",
        format_args!("after"),
    );
    assert_eq!(
        *backend.outer_prints.lock().unwrap(),
        vec!["outer", "after"]
    );
}

/// Always fails from print — the facade must absorb it.
struct FailingBackend;

impl Backend for FailingBackend {
    fn initialize(&self) {}
    fn shutdown(&self) {}

    fn get_handle(&self, _name: &str) -> LoggerHandle {
        LoggerHandle::from_raw(0)
    }

    fn get_name(&self, _handle: LoggerHandle) -> String {
        String::new()
    }

    fn is_enabled_for(&self, _handle: LoggerHandle, _level: Level) -> bool {
        true
    }

    fn print(
        &self,
        _handle: LoggerHandle,
        _level: Level,
        _message: &str,
        _file: &str,
        _function: &str,
        _line: u32,
    ) -> Result<bool, Error> {
        Err(Error::Backend("sink unavailable".to_string()))
    }

    fn register_appender(&self, _appender: Arc<dyn LogAppender>) {}
    fn deregister_appender(&self, _appender: &Arc<dyn LogAppender>) {}

    fn get_loggers(&self, _out: &mut HashMap<String, Level>) -> bool {
        false
    }

    fn set_logger_level(&self, _name: &str, _level: Level) -> bool {
        false
    }
}

#[test]
fn backend_failure_is_isolated() {
    let console = Console::new(Arc::new(FailingBackend), &Config::default());
    console.print(
        None,
        handle(),
        Level::Error,
        "src/a.rs",
        1,
        "a::run",
        format_args!("still recorded"),
    );
    // The failure was absorbed; the last-error slot was written before dispatch.
    assert_eq!(console.last_error(), "still recorded");

    // And the pipeline is still usable.
    console.print(
        None,
        handle(),
        Level::Info,
        "src/a.rs",
        2,
        "a::run",
        format_args!("next"),
    );
}

#[test]
fn set_logger_level_triggers_bit_recompute() {
    static SITE: sitelog::LogSite = sitelog::LogSite::new();
    let console = Console::new(
        Arc::new(sitelog::DefaultBackend::default()),
        &Config::default(),
    );

    console.initialize_site(&SITE, "app", Level::Info);
    assert!(SITE.is_enabled());

    assert!(console.set_logger_level("app", Level::Error));
    assert!(!SITE.is_enabled());
}
