//! Shared test utilities for the console logging workspace.
//!
//! The helpers here only depend on the standard library and `tempfile`, so any
//! crate in the workspace can use them as a dev-dependency without creating
//! a dependency cycle.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tempfile::TempDir;

/// Writer that fails every call with the configured error kind.
#[derive(Clone, Debug)]
pub struct FailingWriter {
    kind: io::ErrorKind,
    attempts: Arc<AtomicUsize>,
}

impl FailingWriter {
    /// Fails with `BrokenPipe`, the usual symptom of a closed reader.
    #[must_use]
    pub fn broken_pipe() -> Self {
        Self::new(io::ErrorKind::BrokenPipe)
    }

    /// Fails with `kind`.
    #[must_use]
    pub fn new(kind: io::ErrorKind) -> Self {
        Self {
            kind,
            attempts: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of write or flush calls received, shared between clones.
    #[must_use]
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl Write for FailingWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(self.kind.into())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(self.kind.into())
    }
}

/// Writer that succeeds until tripped, then fails with `BrokenPipe`.
#[derive(Clone, Debug, Default)]
pub struct TripWriter {
    tripped: Arc<AtomicBool>,
    written: Arc<std::sync::Mutex<Vec<u8>>>,
}

impl TripWriter {
    /// Creates a healthy writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later call fail.
    pub fn trip(&self) {
        self.tripped.store(true, Ordering::SeqCst);
    }

    /// Restores successful writes.
    pub fn repair(&self) {
        self.tripped.store(false, Ordering::SeqCst);
    }

    /// Bytes accepted while healthy, decoded lossily.
    #[must_use]
    pub fn written(&self) -> String {
        let bytes = self
            .written
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }

    fn check(&self) -> io::Result<()> {
        if self.tripped.load(Ordering::SeqCst) {
            Err(io::ErrorKind::BrokenPipe.into())
        } else {
            Ok(())
        }
    }
}

impl Write for TripWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.check()?;
        self.written
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.check()
    }
}

/// Builds an environment map from key/value pairs.
#[must_use]
pub fn env_map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
        .collect()
}

/// Creates a temporary directory that is removed on drop.
pub fn temp_dir() -> io::Result<TempDir> {
    tempfile::tempdir()
}

/// Reads a file written by a test as UTF-8, replacing invalid sequences.
pub fn read_lossy(path: &Path) -> io::Result<String> {
    fs::read(path).map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
}
