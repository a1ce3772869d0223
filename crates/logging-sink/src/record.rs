//! crates/logging-sink/src/record.rs
//! The unit of data handed down an output chain.

use std::fmt;
use std::time::SystemTime;

/// A key/value attribute attached to a record.
pub type Field<'a> = (&'a str, &'a dyn fmt::Display);

/// A log event that passed its logger's filter.
///
/// Records borrow everything from the caller; output layers render them
/// synchronously and never retain references past [`Output::write`].
///
/// [`Output::write`]: crate::Output::write
#[derive(Clone, Copy)]
pub struct Record<'a> {
    severity: &'a str,
    rank: i32,
    subject: Option<&'a str>,
    message: &'a str,
    fields: &'a [Field<'a>],
    timestamp: SystemTime,
}

impl<'a> Record<'a> {
    /// Creates a record stamped with the current time.
    #[must_use]
    pub fn new(severity: &'a str, rank: i32, message: &'a str) -> Self {
        Self {
            severity,
            rank,
            subject: None,
            message,
            fields: &[],
            timestamp: SystemTime::now(),
        }
    }

    /// Attaches the subsystem the record originates from.
    #[must_use]
    pub const fn with_subject(mut self, subject: Option<&'a str>) -> Self {
        self.subject = subject;
        self
    }

    /// Attaches key/value attributes.
    #[must_use]
    pub const fn with_fields(mut self, fields: &'a [Field<'a>]) -> Self {
        self.fields = fields;
        self
    }

    /// Overrides the timestamp.
    #[must_use]
    pub const fn with_timestamp(mut self, timestamp: SystemTime) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Severity name, for example `"warn"`.
    #[must_use]
    pub const fn severity(&self) -> &'a str {
        self.severity
    }

    /// Numeric rank of the severity.
    #[must_use]
    pub const fn rank(&self) -> i32 {
        self.rank
    }

    /// Originating subsystem, if any.
    #[must_use]
    pub const fn subject(&self) -> Option<&'a str> {
        self.subject
    }

    /// Message text; may span several lines.
    #[must_use]
    pub const fn message(&self) -> &'a str {
        self.message
    }

    /// Attached attributes in the order supplied.
    #[must_use]
    pub const fn fields(&self) -> &'a [Field<'a>] {
        self.fields
    }

    /// Time at which the record was created.
    #[must_use]
    pub const fn timestamp(&self) -> SystemTime {
        self.timestamp
    }
}

impl fmt::Debug for Record<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("severity", &self.severity)
            .field("rank", &self.rank)
            .field("subject", &self.subject)
            .field("message", &self.message)
            .field("fields", &self.fields.len())
            .finish_non_exhaustive()
    }
}
