//! crates/logging-sink/src/output.rs
//! The capability every layer of an output chain implements.

use std::io;

use thiserror::Error;

use crate::record::Record;

/// Errors raised by output layers.
///
/// These never reach application code: the outermost
/// [`FailureOutput`](crate::FailureOutput) absorbs them.
#[derive(Debug, Error)]
pub enum OutputError {
    /// The destination rejected the bytes (closed stream, broken pipe, ...).
    #[error("failed to write log record: {0}")]
    Io(#[from] io::Error),
    /// The record could not be rendered.
    #[error("failed to format log record: {0}")]
    Format(String),
    /// A layer panicked while rendering or writing.
    #[error("output layer panicked: {0}")]
    Panicked(String),
    /// JSON encoding failed in the serialized layer.
    #[cfg(feature = "serde")]
    #[error("failed to serialize log record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// One node of an output chain.
///
/// Each layer owns exactly one inner destination or layer and is shared by
/// every logger that references the chain, so methods take `&self` and
/// implementations synchronise internally.
pub trait Output: Send + Sync {
    /// Renders and forwards `record`.
    fn write(&self, record: &Record<'_>) -> Result<(), OutputError>;

    /// Flushes and releases the layer. Called once when the chain closes.
    fn close(&self) -> Result<(), OutputError> {
        Ok(())
    }
}

impl<O> Output for Box<O>
where
    O: Output + ?Sized,
{
    fn write(&self, record: &Record<'_>) -> Result<(), OutputError> {
        (**self).write(record)
    }

    fn close(&self) -> Result<(), OutputError> {
        (**self).close()
    }
}

/// Formatting layer selected for a chain.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OutputFormat {
    /// Human-readable records, styled when the destination is a terminal.
    #[default]
    Terminal,
    /// Human-readable records with escape sequences always suppressed.
    Text,
    /// One JSON object per line. Falls back to [`Self::Text`] without the
    /// `serde` feature.
    Serialized,
}

impl OutputFormat {
    /// Parses a format name as used by `CONSOLE_OUTPUT`.
    ///
    /// ```
    /// use logging_sink::OutputFormat;
    ///
    /// assert_eq!(OutputFormat::from_name("xterm"), Some(OutputFormat::Terminal));
    /// assert_eq!(OutputFormat::from_name("JSON"), Some(OutputFormat::Serialized));
    /// assert_eq!(OutputFormat::from_name("carrier-pigeon"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "terminal" | "xterm" => Some(Self::Terminal),
            "text" | "plain" => Some(Self::Text),
            "serialized" | "json" => Some(Self::Serialized),
            _ => None,
        }
    }
}
