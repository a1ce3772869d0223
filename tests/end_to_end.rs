//! End-to-end tests through the `console` facade.
//!
//! These tests wire a logger, a resolver, the thread context, and an output
//! chain together the way an application would.

use console::sink::{FailureOutput, Output, TerminalOutput};
use console::terminal::{Style, Terminal};
use console::{
    DEBUG, ERROR, Logger, OutputChain, OutputFormat, Record, Resolver, SharedBuffer,
    TerminalDestination, WARN, WriterDestination, context,
};
use test_support::{FailingWriter, TripWriter};

fn capture() -> (Logger, SharedBuffer) {
    let buffer = SharedBuffer::new();
    (
        Logger::new(OutputChain::builder(buffer.clone()).build()),
        buffer,
    )
}

// ============================================================================
// Filtering
// ============================================================================

/// Verifies info at a warn threshold writes zero bytes and error is formatted.
#[test]
fn warn_threshold_end_to_end() {
    let (logger, buffer) = capture();
    logger.set_threshold(WARN).expect("known level");

    logger.info("x");
    assert_eq!(buffer.contents(), Vec::<u8>::new());

    logger.named("db").error("connection lost");
    let output = buffer.contents_lossy();
    assert!(output.contains("error: db"));
    assert!(output.contains("| connection lost"));
}

/// Verifies subsystem overrides pick the most specific prefix.
#[test]
fn resolver_specificity_end_to_end() {
    let (fallback, buffer) = capture();
    let resolver = Resolver::new();
    resolver.set_default_logger(fallback);
    resolver.register("a", ERROR);
    resolver.register("a.b", DEBUG);

    let ab = resolver.logger_for("a.b").expect("fallback");
    let a = resolver.logger_for("a").expect("fallback");
    let ac = resolver.logger_for("a::c").expect("fallback");

    ab.debug("ab debug");
    a.warn("a warn");
    ac.error("ac error");

    let output = buffer.contents_lossy();
    assert!(output.contains("ab debug"));
    assert!(!output.contains("a warn"));
    assert!(output.contains("ac error"));
}

// ============================================================================
// Context
// ============================================================================

/// Verifies child threads log through the parent's chain unless replaced.
#[test]
fn context_inheritance_and_replacement() {
    let (parent, parent_buffer) = capture();
    let _guard = context::scoped(parent);

    let inherited = context::spawn(|| console::console_warn!("inherited {}", 1));
    inherited.join().expect("child");

    let replaced = context::spawn(|| {
        let (own, own_buffer) = capture();
        let _own = context::scoped(own);
        console::console_warn!("replaced {}", 2);
        own_buffer.contents_lossy()
    });
    let child_output = replaced.join().expect("child");

    let parent_output = parent_buffer.contents_lossy();
    assert!(parent_output.contains("inherited 1"));
    assert!(!parent_output.contains("replaced 2"));
    assert!(child_output.contains("replaced 2"));
}

// ============================================================================
// Failure Isolation
// ============================================================================

/// Verifies a broken destination degrades once and stays quiet.
#[test]
fn failure_isolation_end_to_end() {
    let writer = FailingWriter::broken_pipe();
    let fallback = SharedBuffer::new();
    let logger = Logger::new(
        OutputChain::builder(WriterDestination::new(writer.clone()))
            .fallback(fallback.clone())
            .build(),
    );

    logger.error("first");
    let attempts = writer.attempts();
    logger.error("second");
    logger.fatal("third");

    assert_eq!(writer.attempts(), attempts);
    assert!(logger.is_degraded());
    assert_eq!(fallback.contents_lossy().lines().count(), 1);
}

/// Verifies recovery requires an explicit reset.
#[test]
fn reset_restores_writes() {
    let writer = TripWriter::new();
    let logger = Logger::new(
        OutputChain::builder(WriterDestination::new(writer.clone()))
            .fallback(std::io::sink())
            .build(),
    );
    writer.trip();
    logger.error("lost");
    writer.repair();
    logger.error("still lost");
    logger.reset_output();
    logger.error("recovered");

    let written = writer.written();
    assert!(!written.contains("lost"));
    assert!(written.contains("recovered"));
}

/// Verifies the failure layer can be used on its own around a formatter.
#[test]
fn failure_output_stands_alone() {
    let output = FailureOutput::with_fallback(
        TerminalOutput::new(WriterDestination::new(FailingWriter::broken_pipe())),
        std::io::sink(),
    );
    assert!(output.write(&Record::new("error", 3, "absorbed")).is_ok());
    assert!(output.is_degraded());
    output.reset();
    assert!(!output.is_degraded());
}

// ============================================================================
// Styling
// ============================================================================

/// Verifies terminal destinations get escape sequences and plain text ones do not.
#[test]
fn styling_follows_destination() {
    let styled = SharedBuffer::new();
    let plain = SharedBuffer::new();
    let styled_logger =
        Logger::new(OutputChain::builder(TerminalDestination::new(styled.clone())).build());
    let plain_logger = Logger::new(
        OutputChain::builder(TerminalDestination::new(plain.clone()))
            .format(OutputFormat::Text)
            .build(),
    );

    styled_logger.error("red");
    plain_logger.error("plain");

    assert!(styled.contents_lossy().contains('\x1b'));
    assert!(!plain.contents_lossy().contains('\x1b'));
}

/// Verifies the canonical style encodings.
#[test]
fn style_round_trips() {
    assert_eq!(Style::from_tokens(Some("blue"), None, &[]).encode(), "\x1b[34m");
    assert_eq!(
        Style::from_tokens(Some("blue"), None, &["underline", "bold"]).encode(),
        "\x1b[34;4;1m"
    );

    let mut terminal = Terminal::xterm(Vec::new());
    let bold = terminal.style(None, None, &["bold"]);
    terminal.set_style("bold", bold);
    terminal.print("bold", "Hello World").expect("in-memory write");
    assert_eq!(terminal.into_inner(), b"\x1b[1mHello World".to_vec());
}
