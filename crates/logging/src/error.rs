//! crates/logging/src/error.rs
//! Errors surfaced to callers that configure thresholds.

use thiserror::Error;

/// A threshold value named neither a known level nor an integer.
///
/// Raised by [`Filter::set_threshold`](crate::Filter::set_threshold) and by
/// environment parsing. Integers are never rejected; out-of-range values
/// silence the filter instead.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("unknown log level '{value}' (expected one of {expected}, or an integer)")]
pub struct UnknownLevelError {
    value: String,
    expected: String,
}

impl UnknownLevelError {
    pub(crate) fn new(value: &str, expected: String) -> Self {
        Self {
            value: value.to_owned(),
            expected,
        }
    }

    /// The rejected input.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_names_the_value_and_alternatives() {
        let error = UnknownLevelError::new("loud", "debug, info".to_owned());
        assert_eq!(error.value(), "loud");
        assert_eq!(
            error.to_string(),
            "unknown log level 'loud' (expected one of debug, info, or an integer)"
        );
    }
}
