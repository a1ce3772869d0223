//! crates/logging-sink/src/chain.rs
//! Explicit assembly of failure layer, formatting layer, and destination.

use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use terminal::ColorMode;

use crate::destination::Destination;
use crate::failure::FailureOutput;
use crate::format::TerminalOutput;
use crate::output::{Output, OutputFormat};
use crate::record::Record;

/// The complete decorator stack a logger writes through.
///
/// The head is always a [`FailureOutput`], so [`write`](Self::write) and
/// [`close`](Self::close) never fail from the caller's perspective. The chain
/// closes itself when dropped, which covers normal returns and unwinding; an
/// explicit [`close`](Self::close) beforehand makes the drop a no-op.
///
/// # Examples
///
/// ```
/// use logging_sink::{OutputChain, Record, SharedBuffer};
///
/// let buffer = SharedBuffer::new();
/// let chain = OutputChain::builder(buffer.clone()).build();
/// chain.write(&Record::new("info", 1, "ready").with_subject(Some("boot")));
///
/// assert!(buffer.contents_lossy().contains("info: boot"));
/// ```
pub struct OutputChain {
    head: FailureOutput<Box<dyn Output>>,
    closed: AtomicBool,
}

impl OutputChain {
    /// Starts building a chain around `destination`.
    pub fn builder<D>(destination: D) -> OutputChainBuilder<D>
    where
        D: Destination + 'static,
    {
        OutputChainBuilder::new(destination)
    }

    /// Places a custom formatting layer under the failure layer.
    pub fn from_output<O>(output: O) -> Self
    where
        O: Output + 'static,
    {
        Self::with_head(FailureOutput::new(Box::new(output)))
    }

    /// Like [`from_output`](Self::from_output) with an explicit fallback writer.
    pub fn from_output_with_fallback<O, F>(output: O, fallback: F) -> Self
    where
        O: Output + 'static,
        F: Write + Send + 'static,
    {
        Self::with_head(FailureOutput::with_fallback(Box::new(output), fallback))
    }

    fn with_head(head: FailureOutput<Box<dyn Output>>) -> Self {
        Self {
            head,
            closed: AtomicBool::new(false),
        }
    }

    /// Forwards `record` down the chain. Failures are absorbed by the head.
    pub fn write(&self, record: &Record<'_>) {
        if self.closed.load(Ordering::Acquire) {
            return;
        }
        let _ = self.head.write(record);
    }

    /// Releases every layer. Only the first call has an effect.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            let _ = self.head.close();
        }
    }

    /// Reports whether [`close`](Self::close) has run.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Reports whether the chain has stopped forwarding after a failure.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.head.is_degraded()
    }

    /// Clears the degraded state so writes are attempted again.
    pub fn reset(&self) {
        self.head.reset();
    }
}

impl Drop for OutputChain {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for OutputChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputChain")
            .field("degraded", &self.is_degraded())
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Builder for [`OutputChain`].
pub struct OutputChainBuilder<D> {
    destination: D,
    format: OutputFormat,
    color_mode: Option<ColorMode>,
    verbose: bool,
    fallback: Option<Box<dyn Write + Send>>,
}

impl<D> OutputChainBuilder<D>
where
    D: Destination + 'static,
{
    fn new(destination: D) -> Self {
        Self {
            destination,
            format: OutputFormat::default(),
            color_mode: None,
            verbose: false,
            fallback: None,
        }
    }

    /// Selects the formatting layer.
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Overrides color detection for [`OutputFormat::Terminal`].
    pub fn color_mode(mut self, color_mode: ColorMode) -> Self {
        self.color_mode = Some(color_mode);
        self
    }

    /// Adds process and thread details to human-readable headers.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Routes failure reports to `fallback` instead of standard error.
    pub fn fallback<F>(mut self, fallback: F) -> Self
    where
        F: Write + Send + 'static,
    {
        self.fallback = Some(Box::new(fallback));
        self
    }

    /// Assembles the chain.
    pub fn build(self) -> OutputChain {
        let Self {
            destination,
            format,
            color_mode,
            verbose,
            fallback,
        } = self;

        let layer: Box<dyn Output> = match format {
            #[cfg(feature = "serde")]
            OutputFormat::Serialized => Box::new(crate::format::SerializedOutput::new(destination)),
            OutputFormat::Terminal => {
                let output = match color_mode {
                    Some(mode) => TerminalOutput::with_mode(destination, mode),
                    None => TerminalOutput::new(destination),
                };
                Box::new(output.verbose(verbose))
            }
            // Text, and Serialized when JSON support is compiled out.
            _ => Box::new(
                TerminalOutput::with_mode(destination, ColorMode::Plain).verbose(verbose),
            ),
        };

        let fallback = fallback.unwrap_or_else(|| Box::new(io::stderr()) as Box<dyn Write + Send>);
        OutputChain::with_head(FailureOutput::with_fallback(layer, fallback))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::destination::{SharedBuffer, TerminalDestination, WriterDestination};
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct CountingClose(Arc<AtomicUsize>);

    impl Output for CountingClose {
        fn write(&self, _record: &Record<'_>) -> Result<(), crate::OutputError> {
            Ok(())
        }

        fn close(&self) -> Result<(), crate::OutputError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn text_format_suppresses_escapes_on_terminals() {
        let buffer = SharedBuffer::new();
        let chain = OutputChain::builder(TerminalDestination::new(buffer.clone()))
            .format(OutputFormat::Text)
            .build();
        chain.write(&Record::new("error", 3, "plain"));
        assert!(!buffer.contents_lossy().contains('\x1b'));
    }

    #[test]
    fn terminal_format_styles_terminals() {
        let buffer = SharedBuffer::new();
        let chain = OutputChain::builder(TerminalDestination::new(buffer.clone())).build();
        chain.write(&Record::new("error", 3, "styled"));
        assert!(buffer.contents_lossy().contains("\x1b[31m"));
    }

    #[test]
    fn broken_destination_degrades_chain() {
        let fallback = SharedBuffer::new();
        let chain = OutputChain::builder(WriterDestination::new(Broken))
            .fallback(fallback.clone())
            .build();

        chain.write(&Record::new("info", 1, "lost"));
        chain.write(&Record::new("info", 1, "lost again"));

        assert!(chain.is_degraded());
        assert_eq!(fallback.contents_lossy().lines().count(), 1);
    }

    #[test]
    fn close_runs_once_including_drop() {
        let closes = Arc::new(AtomicUsize::new(0));
        {
            let chain = OutputChain::from_output_with_fallback(
                CountingClose(Arc::clone(&closes)),
                io::sink(),
            );
            chain.close();
            chain.close();
            assert!(chain.is_closed());
        }
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn drop_closes_unclosed_chain() {
        let closes = Arc::new(AtomicUsize::new(0));
        drop(OutputChain::from_output_with_fallback(
            CountingClose(Arc::clone(&closes)),
            io::sink(),
        ));
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn writes_after_close_are_ignored() {
        let buffer = SharedBuffer::new();
        let chain = OutputChain::builder(buffer.clone()).build();
        chain.close();
        chain.write(&Record::new("info", 1, "late"));
        assert!(buffer.is_empty());
    }
}
