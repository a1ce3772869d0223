//! crates/logging-sink/src/format/serialized.rs
//! JSON-lines rendering for machine consumers.

use std::fmt::Write as _;
use std::io::Write;
use std::sync::{Mutex, PoisonError};
use std::time::UNIX_EPOCH;

use serde_json::{Map, Value};

use crate::destination::Destination;
use crate::output::{Output, OutputError};
use crate::record::Record;

/// Formatting layer writing one JSON object per record.
///
/// Objects carry `time` (seconds since the Unix epoch), `severity`, `pid`,
/// `subject` when present, `message`, and every attached field as a string.
/// Field names never overwrite the standard keys.
pub struct SerializedOutput<D> {
    destination: Mutex<D>,
}

impl<D> SerializedOutput<D>
where
    D: Destination,
{
    /// Wraps `destination`.
    #[must_use]
    pub fn new(destination: D) -> Self {
        Self {
            destination: Mutex::new(destination),
        }
    }

    fn to_value(record: &Record<'_>) -> Value {
        let mut object = Map::new();
        let time = record
            .timestamp()
            .duration_since(UNIX_EPOCH)
            .map_or(0.0, |elapsed| elapsed.as_secs_f64());
        object.insert("time".to_owned(), Value::from(time));
        object.insert("severity".to_owned(), Value::from(record.severity()));
        object.insert("pid".to_owned(), Value::from(std::process::id()));
        if let Some(subject) = record.subject() {
            object.insert("subject".to_owned(), Value::from(subject));
        }
        object.insert("message".to_owned(), Value::from(record.message()));
        for (key, value) in record.fields() {
            object.entry((*key).to_owned()).or_insert_with(|| {
                let mut text = String::new();
                // Keeps whatever was written before a Display error.
                let _ = write!(text, "{value}");
                Value::from(text)
            });
        }
        Value::Object(object)
    }
}

impl<D> Output for SerializedOutput<D>
where
    D: Destination,
{
    fn write(&self, record: &Record<'_>) -> Result<(), OutputError> {
        let mut line = serde_json::to_vec(&Self::to_value(record))?;
        line.push(b'\n');

        let mut destination = self.destination.lock().unwrap_or_else(PoisonError::into_inner);
        destination.write_all(&line)?;
        destination.flush()?;
        Ok(())
    }

    fn close(&self) -> Result<(), OutputError> {
        self.destination
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::destination::SharedBuffer;
    use std::fmt;

    #[test]
    fn writes_one_object_per_line() {
        let buffer = SharedBuffer::new();
        let output = SerializedOutput::new(buffer.clone());
        let attempts = 3;
        let fields: [crate::Field<'_>; 2] = [("attempts", &attempts), ("message", &"shadowed")];

        output
            .write(
                &Record::new("warn", 2, "retrying")
                    .with_subject(Some("db.pool"))
                    .with_fields(&fields),
            )
            .expect("write succeeds");
        output.write(&Record::new("info", 1, "ok")).expect("write succeeds");

        let text = buffer.contents_lossy();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: Value = serde_json::from_str(lines[0]).expect("valid json");
        assert_eq!(first["severity"], "warn");
        assert_eq!(first["subject"], "db.pool");
        assert_eq!(first["message"], "retrying");
        assert_eq!(first["attempts"], "3");

        let second: Value = serde_json::from_str(lines[1]).expect("valid json");
        assert!(second.get("subject").is_none());
    }

    #[test]
    fn failing_field_keeps_partial_text_and_chain_active() {
        struct Broken;
        impl fmt::Display for Broken {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("part")?;
                Err(fmt::Error)
            }
        }

        let buffer = SharedBuffer::new();
        let output = crate::FailureOutput::with_fallback(
            SerializedOutput::new(buffer.clone()),
            std::io::sink(),
        );
        let fields: [crate::Field<'_>; 1] = [("state", &Broken)];
        output
            .write(&Record::new("warn", 2, "one").with_fields(&fields))
            .expect("swallowed");
        output.write(&Record::new("info", 1, "two")).expect("swallowed");

        assert!(!output.is_degraded());
        let text = buffer.contents_lossy();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: Value = serde_json::from_str(lines[0]).expect("valid json");
        assert_eq!(first["state"], "part");
        let second: Value = serde_json::from_str(lines[1]).expect("valid json");
        assert_eq!(second["message"], "two");
    }
}
