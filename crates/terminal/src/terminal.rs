//! crates/terminal/src/terminal.rs
//! Styled writer pairing a destination with a style registry and sequence cache.

use std::io::{self, Write};
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::style::{RESET, Style};

/// Minimum palette size required before escape sequences are emitted.
pub const MINIMUM_COLOR_DEPTH: u16 = 8;

/// Selects whether a [`Terminal`] emits escape sequences.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ColorMode {
    /// Emit SGR sequences (xterm-compatible destinations).
    Styled,
    /// Emit plain text only.
    #[default]
    Plain,
}

impl ColorMode {
    /// Chooses a mode from destination capabilities.
    ///
    /// Non-interactive destinations always receive plain text. Interactive
    /// destinations are styled unless they report a palette smaller than
    /// [`MINIMUM_COLOR_DEPTH`]; an unknown depth is treated as sufficient.
    ///
    /// ```
    /// use terminal::ColorMode;
    ///
    /// assert_eq!(ColorMode::detect(true, None), ColorMode::Styled);
    /// assert_eq!(ColorMode::detect(true, Some(2)), ColorMode::Plain);
    /// assert_eq!(ColorMode::detect(false, Some(256)), ColorMode::Plain);
    /// ```
    #[must_use]
    pub fn detect(is_terminal: bool, color_depth: Option<u16>) -> Self {
        if is_terminal && color_depth.is_none_or(|depth| depth >= MINIMUM_COLOR_DEPTH) {
            Self::Styled
        } else {
            Self::Plain
        }
    }

    /// Reports whether escape sequences are emitted.
    #[must_use]
    pub const fn is_styled(self) -> bool {
        matches!(self, Self::Styled)
    }
}

/// A destination that knows how to render named styles.
///
/// Named styles are registered once with [`set_style`](Self::set_style) and
/// resolved by name on every write. Sequences derived from [`Style`] values
/// are cached per token set, so repeated encodes of the same style return the
/// same shared allocation.
///
/// In [`ColorMode::Plain`] every sequence, including the reset, is empty and
/// the destination receives the text unchanged.
///
/// # Examples
///
/// ```
/// use terminal::{ColorMode, Terminal};
///
/// let mut terminal = Terminal::new(Vec::new(), ColorMode::Styled);
/// let bold = terminal.style(None, None, &["bold"]);
/// terminal.set_style("bold", bold.as_ref());
///
/// terminal.print_line("bold", "Hello World")?;
/// assert_eq!(terminal.into_inner(), b"\x1b[1mHello World\x1b[0m\n".to_vec());
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug)]
pub struct Terminal<W> {
    writer: W,
    mode: ColorMode,
    named: FxHashMap<String, Arc<str>>,
    cache: FxHashMap<Style, Arc<str>>,
}

impl<W> Terminal<W> {
    /// Wraps `writer` using the provided [`ColorMode`].
    #[must_use]
    pub fn new(writer: W, mode: ColorMode) -> Self {
        Self {
            writer,
            mode,
            named: FxHashMap::default(),
            cache: FxHashMap::default(),
        }
    }

    /// Wraps `writer` with escape sequences enabled.
    #[must_use]
    pub fn xterm(writer: W) -> Self {
        Self::new(writer, ColorMode::Styled)
    }

    /// Wraps `writer` in plain-text mode.
    #[must_use]
    pub fn plain(writer: W) -> Self {
        Self::new(writer, ColorMode::Plain)
    }

    /// Returns the active [`ColorMode`].
    #[must_use]
    pub const fn mode(&self) -> ColorMode {
        self.mode
    }

    /// Encodes a style built from symbolic tokens.
    ///
    /// The foreground and background slots accept `None` to leave the color
    /// unchanged; attributes are emitted in the order supplied.
    pub fn style(
        &mut self,
        foreground: Option<&str>,
        background: Option<&str>,
        attributes: &[&str],
    ) -> Arc<str> {
        self.encode(&Style::from_tokens(foreground, background, attributes))
    }

    /// Encodes `style`, reusing a cached sequence when one exists.
    pub fn encode(&mut self, style: &Style) -> Arc<str> {
        if !self.mode.is_styled() {
            return Arc::from("");
        }
        if let Some(sequence) = self.cache.get(style) {
            return Arc::clone(sequence);
        }
        let sequence: Arc<str> = Arc::from(style.encode());
        self.cache.insert(style.clone(), Arc::clone(&sequence));
        sequence
    }

    /// Registers `sequence` under `name`, replacing any earlier registration.
    pub fn set_style(&mut self, name: impl Into<String>, sequence: impl Into<Arc<str>>) {
        self.named.insert(name.into(), sequence.into());
    }

    /// Encodes `style` and registers the result under `name`.
    pub fn define(&mut self, name: impl Into<String>, style: &Style) {
        let sequence = self.encode(style);
        self.set_style(name, sequence);
    }

    /// Looks up a named style.
    ///
    /// Returns `None` for unregistered names. Plain terminals always resolve
    /// to an empty sequence for registered names.
    #[must_use]
    pub fn style_named(&self, name: &str) -> Option<&str> {
        let sequence = self.named.get(name)?;
        if self.mode.is_styled() {
            Some(sequence)
        } else {
            Some("")
        }
    }

    /// Returns the reset sequence, or an empty string in plain mode.
    #[must_use]
    pub const fn reset(&self) -> &'static str {
        if self.mode.is_styled() { RESET } else { "" }
    }

    /// Borrows the underlying writer.
    #[must_use]
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Mutably borrows the underlying writer.
    #[must_use]
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Consumes the terminal and returns the wrapped writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn sequence_for(&self, style_name: &str) -> Arc<str> {
        match self.named.get(style_name) {
            Some(sequence) if self.mode.is_styled() => Arc::clone(sequence),
            // Unknown names degrade to unstyled text.
            _ => Arc::from(""),
        }
    }
}

impl<W> Terminal<W>
where
    W: Write,
{
    /// Writes the named style's sequence followed by `text`, without a reset.
    ///
    /// Several styled fragments can be concatenated on one line; the caller
    /// decides when to emit [`reset`](Self::reset).
    pub fn print(&mut self, style_name: &str, text: &str) -> io::Result<()> {
        let sequence = self.sequence_for(style_name);
        self.write_raw(&sequence, text)
    }

    /// Writes `style` followed by `text`, without a reset.
    pub fn print_style(&mut self, style: &Style, text: &str) -> io::Result<()> {
        let sequence = self.encode(style);
        self.write_raw(&sequence, text)
    }

    /// Writes unstyled text.
    pub fn write_text(&mut self, text: &str) -> io::Result<()> {
        self.writer.write_all(text.as_bytes())
    }

    /// Writes the reset sequence.
    pub fn write_reset(&mut self) -> io::Result<()> {
        let reset = self.reset();
        self.writer.write_all(reset.as_bytes())
    }

    /// Writes `text` as one or more complete lines in the named style.
    ///
    /// Every physical line is opened with the style sequence and closed with
    /// the reset sequence immediately before its terminator, so a style never
    /// leaks across a line boundary. `\r\n` terminators are preserved with the
    /// reset placed before the carriage return. A trailing terminator in
    /// `text` does not produce an additional empty line.
    pub fn print_line(&mut self, style_name: &str, text: &str) -> io::Result<()> {
        let sequence = self.sequence_for(style_name);
        self.write_lines(&sequence, text)
    }

    /// Line-oriented counterpart of [`print_style`](Self::print_style).
    pub fn print_line_style(&mut self, style: &Style, text: &str) -> io::Result<()> {
        let sequence = self.encode(style);
        self.write_lines(&sequence, text)
    }

    /// Flushes the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    fn write_raw(&mut self, sequence: &str, text: &str) -> io::Result<()> {
        self.writer.write_all(sequence.as_bytes())?;
        self.writer.write_all(text.as_bytes())
    }

    fn write_lines(&mut self, sequence: &str, text: &str) -> io::Result<()> {
        let reset = if sequence.is_empty() { "" } else { self.reset() };

        if text.is_empty() {
            return write_line(&mut self.writer, sequence, "", reset, "\n");
        }

        for fragment in text.split_inclusive('\n') {
            let (body, terminator) = split_terminator(fragment);
            write_line(&mut self.writer, sequence, body, reset, terminator)?;
        }
        Ok(())
    }
}

fn split_terminator(fragment: &str) -> (&str, &str) {
    if let Some(body) = fragment.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = fragment.strip_suffix('\n') {
        (body, "\n")
    } else {
        (fragment, "\n")
    }
}

fn write_line<W: Write>(
    writer: &mut W,
    sequence: &str,
    body: &str,
    reset: &str,
    terminator: &str,
) -> io::Result<()> {
    writer.write_all(sequence.as_bytes())?;
    writer.write_all(body.as_bytes())?;
    writer.write_all(reset.as_bytes())?;
    writer.write_all(terminator.as_bytes())
}
