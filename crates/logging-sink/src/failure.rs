//! crates/logging-sink/src/failure.rs
//! Outermost chain layer that keeps logging failures away from the host.

use std::any::Any;
use std::fmt;
use std::io::{self, Write};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::output::{Output, OutputError};
use crate::record::Record;

/// Wraps an output so that its failures never reach the caller.
///
/// The layer starts `active`. The first failed write (an I/O error, a
/// formatting error, or a panic inside an inner layer) moves it to
/// `degraded`: the failure is reported once to a separate fallback writer,
/// which is standard error unless overridden, and every later write returns
/// immediately without touching the inner output. Only [`reset`](Self::reset)
/// returns the layer to `active`.
///
/// # Examples
///
/// ```
/// use std::io;
/// use logging_sink::{FailureOutput, Output, Record, TerminalOutput, WriterDestination};
///
/// struct Broken;
///
/// impl io::Write for Broken {
///     fn write(&mut self, _: &[u8]) -> io::Result<usize> {
///         Err(io::ErrorKind::BrokenPipe.into())
///     }
///     fn flush(&mut self) -> io::Result<()> {
///         Ok(())
///     }
/// }
///
/// let output = FailureOutput::with_fallback(
///     TerminalOutput::new(WriterDestination::new(Broken)),
///     io::sink(),
/// );
/// assert!(output.write(&Record::new("info", 1, "lost")).is_ok());
/// assert!(output.is_degraded());
/// ```
pub struct FailureOutput<O> {
    inner: O,
    degraded: AtomicBool,
    fallback: Mutex<Box<dyn Write + Send>>,
}

impl<O> FailureOutput<O> {
    /// Wraps `inner`, reporting failures to standard error.
    #[must_use]
    pub fn new(inner: O) -> Self {
        Self::with_fallback(inner, io::stderr())
    }

    /// Wraps `inner`, reporting failures to `fallback`.
    #[must_use]
    pub fn with_fallback<F>(inner: O, fallback: F) -> Self
    where
        F: Write + Send + 'static,
    {
        Self {
            inner,
            degraded: AtomicBool::new(false),
            fallback: Mutex::new(Box::new(fallback)),
        }
    }

    /// Reports whether the layer has stopped forwarding writes.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Acquire)
    }

    /// Returns the layer to the `active` state.
    ///
    /// Recovery never happens automatically; callers that know the
    /// destination has been repaired must ask for it.
    pub fn reset(&self) {
        self.degraded.store(false, Ordering::Release);
    }

    /// Borrows the wrapped output.
    #[must_use]
    pub const fn get_ref(&self) -> &O {
        &self.inner
    }

    fn degrade(&self, error: &OutputError) {
        if self.degraded.swap(true, Ordering::AcqRel) {
            return;
        }

        #[cfg(feature = "tracing")]
        tracing::warn!(target: "console::output", %error, "log output degraded");

        let mut fallback = self.fallback.lock().unwrap_or_else(PoisonError::into_inner);
        // The fallback is best effort; there is nowhere left to report to.
        let _ = writeln!(
            fallback,
            "console: log output failed, discarding further records: {error}"
        );
        let _ = fallback.flush();
    }
}

impl<O> FailureOutput<O>
where
    O: Output,
{
    fn guarded<F>(&self, operation: F) -> Result<(), OutputError>
    where
        F: FnOnce(&O) -> Result<(), OutputError>,
    {
        match panic::catch_unwind(AssertUnwindSafe(|| operation(&self.inner))) {
            Ok(result) => result,
            Err(payload) => Err(OutputError::Panicked(panic_message(payload.as_ref()))),
        }
    }
}

impl<O> Output for FailureOutput<O>
where
    O: Output,
{
    fn write(&self, record: &Record<'_>) -> Result<(), OutputError> {
        if self.is_degraded() {
            return Ok(());
        }
        if let Err(error) = self.guarded(|inner| inner.write(record)) {
            self.degrade(&error);
        }
        Ok(())
    }

    /// Closes the inner output; a degraded layer skips it so the broken
    /// destination is not flushed again.
    fn close(&self) -> Result<(), OutputError> {
        if self.is_degraded() {
            return Ok(());
        }
        if let Err(error) = self.guarded(Output::close) {
            self.degrade(&error);
        }
        Ok(())
    }
}

impl<O> fmt::Debug for FailureOutput<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FailureOutput")
            .field("degraded", &self.is_degraded())
            .finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_owned()
    }
}
