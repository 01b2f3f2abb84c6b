#![forbid(unsafe_code)]

//! `sitelog` - Call-site logging facade with cached enablement and compiled
//! message templates.
//!
//! The facade turns a call site (file, line, function, severity, format
//! arguments) into a rendered, filtered, emitted log line while keeping
//! disabled statements nearly free:
//! - Every statement caches an enabled bit that tracks the backend's mutable
//!   severity configuration — the hot path is one atomic load.
//! - Format templates compile once into a token sequence evaluated per line.
//! - One serialized emission path with reentrancy protection, a growable
//!   shared scratch buffer, and isolation of backend failures.
//!
//! # Example
//!
//! ```
//! use sitelog::{info, warn_named};
//!
//! info!("application started");
//! warn_named!("net", "connection timeout after {} ms", 250);
//! ```
//!
//! Threshold decisions live behind the [`Backend`] trait; the built-in
//! [`DefaultBackend`] keeps a flat logger table and delegates rendering to
//! the console formatter (template syntax: `[${severity}] [${time}]:
//! ${message}`).

pub mod backend;
pub mod config;
pub mod console;
pub mod filter;
pub mod fmt;
pub mod level;
pub mod site;

mod error;
mod macros;

// Re-exports for convenience
pub use backend::{Backend, DefaultBackend, LogAppender, LoggerHandle};
pub use config::Config;
pub use console::Console;
pub use error::Error;
pub use filter::{Filter, FilterParams};
pub use fmt::{Formatter, LogEvent, RenderContext, Token};
pub use level::Level;
pub use site::{LogSite, SiteRegistry};
