#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `console` is the single entry point for the console logging workspace. It
//! re-exports the three member crates so applications depend on one package:
//!
//! - [`logging`]: severity models, filters, loggers, the resolver, and the
//!   thread-local logger context.
//! - [`sink`]: output chains, destinations, and record formatting.
//! - [`terminal`]: xterm style encoding.
//!
//! The most common items are also available at the crate root.
//!
//! # Examples
//!
//! ```
//! use console::{Logger, OutputChain, SharedBuffer, WARN};
//!
//! let buffer = SharedBuffer::new();
//! let logger = Logger::new(OutputChain::builder(buffer.clone()).build());
//! logger.set_threshold(WARN)?;
//!
//! logger.info("x");
//! assert!(buffer.is_empty());
//!
//! logger.error("disk full");
//! assert!(buffer.contents_lossy().contains("error: disk full"));
//! # Ok::<(), console::UnknownLevelError>(())
//! ```

pub use logging;
pub use logging_sink as sink;
pub use terminal;

pub use logging::{
    DEBUG, ERROR, FATAL, Filter, INFO, Level, Logger, LoggerConfig, Progress, Resolver,
    SeverityModel, SystemEnvironment, UnknownLevelError, WARN, context, default_resolver,
    logger_for,
};
pub use logging::{
    console_debug, console_error, console_fatal, console_info, console_log, console_warn,
};
pub use logging_sink::{
    Destination, OutputChain, OutputFormat, Record, SharedBuffer, TerminalDestination,
    WriterDestination,
};
