//! crates/logging-sink/src/format/text.rs
//! Human-readable record rendering, styled when the destination allows it.

use std::fmt::Write as _;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use terminal::{ColorMode, Style, Terminal};

use crate::clock::formatted_duration;
use crate::destination::Destination;
use crate::output::{Output, OutputError};
use crate::record::Record;

/// Width of the `elapsed severity` prefix; message lines hang under it.
const PREFIX_WIDTH: usize = 17;

const SUBJECT_STYLE: &str = "subject";
const SUFFIX_STYLE: &str = "suffix";

fn register_default_styles(terminal: &mut Terminal<Vec<u8>>) {
    terminal.define(SUBJECT_STYLE, &Style::from_tokens(Some("blue"), None, &["bold"]));
    terminal.define(SUFFIX_STYLE, &Style::from_tokens(Some("white"), None, &["faint"]));
    terminal.define("debug", &Style::from_tokens(Some("cyan"), None, &[]));
    terminal.define("info", &Style::from_tokens(Some("green"), None, &[]));
    terminal.define("warn", &Style::from_tokens(Some("yellow"), None, &[]));
    terminal.define("error", &Style::from_tokens(Some("red"), None, &[]));
    terminal.define("fatal", &Style::from_tokens(Some("red"), None, &["bold"]));
}

struct State<D> {
    /// Scratch terminal the record is rendered into before one destination write.
    scratch: Terminal<Vec<u8>>,
    destination: D,
}

/// Formatting layer producing one header line per record followed by the
/// message lines indented under a `|` gutter.
///
/// ```text
///    0.00s     warn: net.http [status=503]
///                  | upstream unavailable
/// ```
///
/// Records without a subject carry the first message line on the header.
/// Escape sequences are only emitted when the destination reports itself as a
/// terminal (see [`ColorMode::detect`]); every styled span is reset before the
/// line terminator.
pub struct TerminalOutput<D> {
    state: Mutex<State<D>>,
    started: Instant,
    verbose: bool,
}

impl<D> TerminalOutput<D>
where
    D: Destination,
{
    /// Wraps `destination`, choosing the color mode from its capabilities.
    #[must_use]
    pub fn new(destination: D) -> Self {
        let mode = ColorMode::detect(destination.is_terminal(), destination.color_depth());
        Self::with_mode(destination, mode)
    }

    /// Wraps `destination` with an explicit color mode.
    #[must_use]
    pub fn with_mode(destination: D, mode: ColorMode) -> Self {
        let mut scratch = Terminal::new(Vec::new(), mode);
        register_default_styles(&mut scratch);
        Self {
            state: Mutex::new(State {
                scratch,
                destination,
            }),
            started: Instant::now(),
            verbose: false,
        }
    }

    /// Adds process and thread details to every header when enabled.
    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Registers or replaces the style used for a severity or element name.
    pub fn set_style(&self, name: &str, style: &Style) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.scratch.define(name, style);
    }

    /// Reports the color mode in effect.
    pub fn color_mode(&self) -> ColorMode {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .scratch
            .mode()
    }

    fn suffix(&self, record: &Record<'_>) -> String {
        let mut suffix = String::new();
        for (key, value) in record.fields() {
            // Writing into a String cannot fail.
            let _ = write!(suffix, " [{key}={value}]");
        }
        if self.verbose {
            let _ = write!(suffix, " [pid={}]", std::process::id());
            if let Some(name) = std::thread::current().name() {
                let _ = write!(suffix, " [thread={name}]");
            }
        }
        suffix
    }

    fn render(&self, terminal: &mut Terminal<Vec<u8>>, record: &Record<'_>) -> io::Result<()> {
        let elapsed = formatted_duration(self.started.elapsed());
        let severity = record.severity();
        let suffix = self.suffix(record);

        terminal.write_text(&format!("{elapsed:>8} "))?;
        styled(terminal, severity, &format!("{severity:>8}"))?;
        terminal.write_text(": ")?;

        let mut lines = record.message().lines();
        match record.subject() {
            Some(subject) => styled(terminal, SUBJECT_STYLE, subject)?,
            None => terminal.write_text(lines.next().unwrap_or_default())?,
        }
        if !suffix.is_empty() {
            styled(terminal, SUFFIX_STYLE, &suffix)?;
        }
        terminal.write_text("\n")?;

        for line in lines {
            terminal.write_text(&format!("{:>width$} {line}\n", "|", width = PREFIX_WIDTH))?;
        }
        Ok(())
    }
}

/// Writes `text` in the named style, or plain when unstyled.
///
/// The style is closed before every line terminator inside `text` and
/// reopened after it, so no span stays open across a line break.
fn styled(terminal: &mut Terminal<Vec<u8>>, name: &str, text: &str) -> io::Result<()> {
    match terminal.style_named(name) {
        Some(sequence) if !sequence.is_empty() => {
            for fragment in text.split_inclusive('\n') {
                let (body, terminator) = split_terminator(fragment);
                terminal.print(name, body)?;
                terminal.write_reset()?;
                terminal.write_text(terminator)?;
            }
            Ok(())
        }
        _ => terminal.write_text(text),
    }
}

fn split_terminator(fragment: &str) -> (&str, &str) {
    if let Some(body) = fragment.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = fragment.strip_suffix('\n') {
        (body, "\n")
    } else {
        (fragment, "")
    }
}

impl<D> Output for TerminalOutput<D>
where
    D: Destination,
{
    fn write(&self, record: &Record<'_>) -> Result<(), OutputError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let State {
            scratch,
            destination,
        } = &mut *state;

        scratch.get_mut().clear();
        self.render(scratch, record)?;
        destination.write_all(scratch.get_ref())?;
        destination.flush()?;
        Ok(())
    }

    fn close(&self) -> Result<(), OutputError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.destination.flush()?;
        Ok(())
    }
}
