//! Formatting layers sitting directly above a destination.

#[cfg(feature = "serde")]
mod serialized;
mod text;

#[cfg(feature = "serde")]
pub use serialized::SerializedOutput;
pub use text::TerminalOutput;
