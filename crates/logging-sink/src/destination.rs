//! crates/logging-sink/src/destination.rs
//! Raw byte destinations wrapped by output chains.

use std::fs::File;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use is_terminal::IsTerminal;

/// A byte-oriented sink at the end of an output chain.
///
/// Destinations expose the [`io::Write`] contract plus two optional
/// capabilities that decide whether escape sequences are emitted at all:
/// [`is_terminal`](Self::is_terminal) and [`color_depth`](Self::color_depth).
/// The defaults describe a non-interactive destination, which always receives
/// plain text.
pub trait Destination: Write + Send {
    /// Reports whether the destination is an interactive terminal.
    fn is_terminal(&self) -> bool {
        false
    }

    /// Number of colors the destination supports, when known.
    fn color_depth(&self) -> Option<u16> {
        None
    }
}

impl Destination for io::Stderr {
    fn is_terminal(&self) -> bool {
        IsTerminal::is_terminal(self)
    }
}

impl Destination for io::Stdout {
    fn is_terminal(&self) -> bool {
        IsTerminal::is_terminal(self)
    }
}

impl Destination for File {
    fn is_terminal(&self) -> bool {
        IsTerminal::is_terminal(self)
    }
}

impl Destination for Vec<u8> {}

impl<D> Destination for Box<D>
where
    D: Destination + ?Sized,
{
    fn is_terminal(&self) -> bool {
        (**self).is_terminal()
    }

    fn color_depth(&self) -> Option<u16> {
        (**self).color_depth()
    }
}

/// Adapts any writer into a non-interactive [`Destination`].
#[derive(Debug, Default)]
pub struct WriterDestination<W> {
    writer: W,
}

impl<W> WriterDestination<W> {
    /// Wraps `writer`.
    #[must_use]
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the adapter and returns the writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Write for WriterDestination<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl<W: Write + Send> Destination for WriterDestination<W> {}

/// Declares a writer to be an interactive terminal with a given palette.
///
/// Useful for capturing styled output in tests or for pipes that are known to
/// end at a terminal emulator.
#[derive(Debug)]
pub struct TerminalDestination<W> {
    writer: W,
    color_depth: Option<u16>,
}

impl<W> TerminalDestination<W> {
    /// Wraps `writer` as a terminal with an unknown (assumed sufficient) palette.
    #[must_use]
    pub const fn new(writer: W) -> Self {
        Self {
            writer,
            color_depth: None,
        }
    }

    /// Wraps `writer` as a terminal reporting `color_depth` colors.
    #[must_use]
    pub const fn with_color_depth(writer: W, color_depth: u16) -> Self {
        Self {
            writer,
            color_depth: Some(color_depth),
        }
    }

    /// Consumes the adapter and returns the writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Write for TerminalDestination<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl<W: Write + Send> Destination for TerminalDestination<W> {
    fn is_terminal(&self) -> bool {
        true
    }

    fn color_depth(&self) -> Option<u16> {
        self.color_depth
    }
}

/// Cloneable in-memory destination whose contents stay readable after the
/// chain that owns one handle has been dropped.
///
/// # Examples
///
/// ```
/// use std::io::Write;
/// use logging_sink::SharedBuffer;
///
/// let buffer = SharedBuffer::new();
/// let mut handle = buffer.clone();
/// handle.write_all(b"hello")?;
/// assert_eq!(buffer.contents_lossy(), "hello");
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies out the bytes written so far.
    #[must_use]
    pub fn contents(&self) -> Vec<u8> {
        self.bytes.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Returns the contents decoded as UTF-8, replacing invalid sequences.
    #[must_use]
    pub fn contents_lossy(&self) -> String {
        String::from_utf8_lossy(&self.contents()).into_owned()
    }

    /// Reports whether nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.lock().unwrap_or_else(PoisonError::into_inner).is_empty()
    }

    /// Discards the buffered bytes.
    pub fn clear(&self) {
        self.bytes.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Destination for SharedBuffer {}
