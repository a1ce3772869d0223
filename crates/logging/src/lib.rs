#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! crates/logging/src/lib.rs
//!
//! # Overview
//!
//! `logging` is the front half of the console logging workspace. It decides
//! *whether* an event is written and *which* logger writes it; the
//! `logging-sink` crate decides *how*.
//!
//! # Design
//!
//! - [`SeverityModel`] is data: an ordered set of named levels. The standard
//!   model is `debug` < `info` < `warn` < `error` < `fatal`.
//! - [`Filter`] holds an atomic threshold rank and gates every emission.
//! - [`Logger`] pairs a shared [`Filter`] with a shared
//!   [`OutputChain`](logging_sink::OutputChain). Clones share both.
//! - [`Resolver`] maps subsystem names to threshold overrides and holds the
//!   process fallback logger.
//! - [`context`] keeps one logger per thread, replaced for a scope with
//!   [`context::scoped`] and inherited by threads started with
//!   [`context::spawn`].
//!
//! # Invariants
//!
//! - A filter's stored threshold is a defined rank or the silent rank.
//! - Rejected events are never formatted and never reach the chain.
//! - Replacing a thread's logger does not affect any other thread.
//!
//! # Errors
//!
//! [`UnknownLevelError`] is returned when a threshold names neither a level
//! nor an integer. Output failures never reach callers.
//!
//! # Examples
//!
//! ```
//! use logging::{Logger, Resolver, DEBUG};
//! use logging_sink::{OutputChain, SharedBuffer};
//!
//! let buffer = SharedBuffer::new();
//! let logger = Logger::new(OutputChain::builder(buffer.clone()).build());
//!
//! let resolver = Resolver::new();
//! resolver.set_default_logger(logger.clone());
//! resolver.register("net.http", DEBUG);
//!
//! let http = resolver.logger_for("net.http").unwrap();
//! http.debug("request headers sent");
//! logger.debug("dropped at the default threshold");
//!
//! let output = buffer.contents_lossy();
//! assert!(output.contains("request headers sent"));
//! assert!(!output.contains("dropped"));
//! ```

mod config;
pub mod context;
mod error;
mod filter;
mod levels;
mod logger;
mod macros;
mod progress;
mod resolver;
#[cfg(feature = "tracing")]
pub mod tracing_bridge;

pub use config::{
    Environment, LEVEL_VAR, LoggerConfig, NO_COLOR_VAR, OUTPUT_VAR, SUBSYSTEM_VAR_PREFIX,
    SubsystemOverride, SystemEnvironment, VERBOSE_VAR, subsystem_overrides,
};
pub use error::UnknownLevelError;
pub use filter::{Filter, Threshold};
pub use levels::{DEBUG, ERROR, FATAL, INFO, Level, SeverityModel, SeverityModelError, WARN};
pub use logger::Logger;
pub use progress::Progress;
pub use resolver::{Resolver, default_resolver, logger_for};
#[cfg(feature = "tracing")]
pub use tracing_bridge::{ConsoleLayer, init_tracing, init_tracing_with_filter};
