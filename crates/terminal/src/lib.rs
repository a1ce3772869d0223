#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! crates/terminal/src/lib.rs
//!
//! # Overview
//!
//! `terminal` converts symbolic style descriptors into the minimal SGR escape
//! sequences understood by xterm-compatible terminals and writes styled text
//! without leaking colors across line boundaries.
//!
//! # Design
//!
//! - [`Color`] and [`Attribute`] are fixed token tables. Unknown token names
//!   resolve to `None` and are skipped, so callers can pass hints that only some
//!   platforms understand.
//! - [`Style`] is an ordered, deduplicated token set. [`Style::encode`] joins the
//!   parameters with `;` in the order foreground, background, attributes.
//! - [`Terminal`] pairs a writer with a registry of named styles and a cache of
//!   encoded sequences. [`ColorMode::Plain`] turns every sequence into an empty
//!   string for destinations that are not interactive terminals.
//!
//! # Invariants
//!
//! - Equal token sets always encode to byte-identical sequences.
//! - [`Terminal::print`] never appends a reset; [`Terminal::print_line`]
//!   always resets immediately before each line terminator.
//!
//! # Examples
//!
//! ```
//! use terminal::{Style, Terminal};
//!
//! assert_eq!(Style::from_tokens(Some("blue"), None, &[]).encode(), "\x1b[34m");
//!
//! let mut terminal = Terminal::xterm(Vec::new());
//! let bold = terminal.style(None, None, &["bold"]);
//! terminal.set_style("bold", bold);
//! terminal.print("bold", "Hello World")?;
//! assert_eq!(terminal.into_inner(), b"\x1b[1mHello World".to_vec());
//! # Ok::<(), std::io::Error>(())
//! ```

mod codes;
mod style;
mod terminal;

pub use codes::{Attribute, Color};
pub use style::{CSI, RESET, Style};
pub use terminal::{ColorMode, MINIMUM_COLOR_DEPTH, Terminal};
