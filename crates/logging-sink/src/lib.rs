#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! crates/logging-sink/src/lib.rs
//!
//! # Overview
//!
//! `logging-sink` provides the output side of the console logging workspace:
//! raw [`Destination`]s, formatting layers that turn a [`Record`] into bytes,
//! and the [`FailureOutput`] layer that keeps a broken destination from ever
//! crashing the process it is diagnosing.
//!
//! # Design
//!
//! Every layer implements [`Output`] and owns exactly one inner layer or
//! destination. [`OutputChain`] assembles the stack explicitly:
//!
//! ```text
//! FailureOutput -> TerminalOutput | SerializedOutput -> Destination
//! ```
//!
//! The failure layer sits outside the formatter so rendering errors are
//! absorbed as well as transport errors. Formatting renders each record into a
//! reusable scratch buffer first and hands the destination a single write.
//!
//! # Invariants
//!
//! - A degraded chain performs no further destination writes until
//!   [`OutputChain::reset`] is called.
//! - Degradation is reported once, to a fallback writer outside the chain.
//! - Non-terminal destinations never receive escape sequences.
//! - [`OutputChain::close`] runs at most once and always runs on drop.
//!
//! # Errors
//!
//! Inner layers report [`OutputError`]; the chain surface returns `()` because
//! those errors never reach the code being logged.
//!
//! # Examples
//!
//! ```
//! use logging_sink::{OutputChain, Record, SharedBuffer};
//!
//! let buffer = SharedBuffer::new();
//! let chain = OutputChain::builder(buffer.clone()).build();
//! let subject = Some("cache");
//! chain.write(&Record::new("warn", 2, "evicting\n42 entries").with_subject(subject));
//!
//! let output = buffer.contents_lossy();
//! let mut lines = output.lines();
//! assert!(lines.next().unwrap().ends_with("warn: cache"));
//! assert!(lines.next().unwrap().ends_with("| evicting"));
//! ```

mod chain;
mod clock;
mod destination;
mod failure;
mod format;
mod output;
mod record;

pub use chain::{OutputChain, OutputChainBuilder};
pub use clock::formatted_duration;
pub use destination::{
    Destination, SharedBuffer, TerminalDestination, WriterDestination,
};
pub use failure::FailureOutput;
#[cfg(feature = "serde")]
pub use format::SerializedOutput;
pub use format::TerminalOutput;
pub use output::{Output, OutputError, OutputFormat};
pub use record::{Field, Record};
pub use terminal::ColorMode;
