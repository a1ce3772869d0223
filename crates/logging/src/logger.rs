//! crates/logging/src/logger.rs
//! The handle application code logs through.

use std::fmt::{self, Write as _};
use std::io::{self, Write as _};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use logging_sink::{ColorMode, Destination, Field, OutputChain, Record};

use crate::config::{Environment, LoggerConfig, SystemEnvironment};
use crate::error::UnknownLevelError;
use crate::filter::{Filter, Threshold};
use crate::levels::{DEBUG, ERROR, FATAL, INFO, Level, SeverityModel, WARN};
use crate::progress::Progress;
use crate::resolver::Resolver;

/// A filter and an output chain, optionally tagged with a subject.
///
/// Cloning is cheap and shares both the filter and the chain: a threshold
/// change through one clone is visible through all of them. The chain closes
/// when the last logger referencing it is dropped.
///
/// # Examples
///
/// ```
/// use logging::{Logger, WARN};
/// use logging_sink::{OutputChain, SharedBuffer};
///
/// let buffer = SharedBuffer::new();
/// let logger = Logger::new(OutputChain::builder(buffer.clone()).build());
/// logger.set_threshold(WARN)?;
///
/// logger.info("not shown");
/// assert!(buffer.is_empty());
///
/// logger.named("disk").error(format_args!("{} blocks unreadable", 3));
/// let output = buffer.contents_lossy();
/// assert!(output.contains("error: disk"));
/// assert!(output.contains("| 3 blocks unreadable"));
/// # Ok::<(), logging::UnknownLevelError>(())
/// ```
#[derive(Clone)]
pub struct Logger {
    filter: Arc<Filter>,
    output: Arc<OutputChain>,
    subject: Option<Arc<str>>,
}

impl Logger {
    /// Standard model at `info`, writing to `output`.
    #[must_use]
    pub fn new(output: OutputChain) -> Self {
        Self::with_filter(output, Filter::standard())
    }

    /// Writes to `output` through `filter`.
    #[must_use]
    pub fn with_filter(output: OutputChain, filter: Filter) -> Self {
        Self {
            filter: Arc::new(filter),
            output: Arc::new(output),
            subject: None,
        }
    }

    /// Builds a logger for `destination` from explicit settings.
    ///
    /// Overrides in `config` are not registered anywhere; use
    /// [`default_logger`](Self::default_logger) for that.
    #[must_use]
    pub fn from_config<D>(destination: D, config: &LoggerConfig) -> Self
    where
        D: Destination + 'static,
    {
        Self::from_config_with_model(destination, config, SeverityModel::STANDARD)
    }

    /// Like [`from_config`](Self::from_config) over a custom model.
    #[must_use]
    pub fn from_config_with_model<D>(
        destination: D,
        config: &LoggerConfig,
        model: SeverityModel,
    ) -> Self
    where
        D: Destination + 'static,
    {
        let mut builder = OutputChain::builder(destination)
            .format(config.format)
            .verbose(config.verbose);
        if config.color == Some(false) {
            builder = builder.color_mode(ColorMode::Plain);
        }

        let filter = Filter::new(model);
        // Rank was canonicalized when the config was read; integers cannot fail.
        let _ = filter.set_threshold(Threshold::Rank(config.level));
        Self::with_filter(builder.build(), filter)
    }

    /// Builds the process default logger from the environment.
    ///
    /// Reads `CONSOLE_LEVEL`, `CONSOLE_VERBOSE`, `CONSOLE_OUTPUT`, `NO_COLOR`,
    /// and the `CONSOLE_<LEVEL>` subsystem lists, registers those lists with
    /// the global [`Resolver`], and installs the result as its fallback.
    pub fn default_logger<D, E>(destination: D, env: &E) -> Result<Self, UnknownLevelError>
    where
        D: Destination + 'static,
        E: Environment + ?Sized,
    {
        let config = LoggerConfig::from_env(env)?;
        let logger = Self::from_config(destination, &config);

        let resolver = Resolver::global();
        for entry in &config.overrides {
            resolver.register(&entry.name, entry.rank);
        }
        resolver.set_default_logger(logger.clone());
        Ok(logger)
    }

    /// Standard error logger used when a context has none yet.
    ///
    /// An invalid `CONSOLE_LEVEL` is reported once on standard error and
    /// the remaining settings are applied with an `info` threshold.
    pub(crate) fn local() -> Self {
        Self::default_logger(io::stderr(), &SystemEnvironment).unwrap_or_else(|error| {
            let _ = writeln!(io::stderr(), "console: ignoring {error}");
            Self::default_logger(io::stderr(), &WithoutLevel)
                .unwrap_or_else(|_| Self::from_config(io::stderr(), &LoggerConfig::default()))
        })
    }

    /// A logger sharing this one's filter and chain, tagged with `subject`.
    #[must_use]
    pub fn named(&self, subject: impl AsRef<str>) -> Self {
        Self {
            filter: Arc::clone(&self.filter),
            output: Arc::clone(&self.output),
            subject: Some(Arc::from(subject.as_ref())),
        }
    }

    /// A logger sharing this one's chain and subject with an independent
    /// filter set to `value`.
    pub fn with_threshold<'a, T>(&self, value: T) -> Result<Self, UnknownLevelError>
    where
        T: Into<Threshold<'a>>,
    {
        Ok(Self {
            filter: Arc::new(self.filter.with_threshold(value)?),
            output: Arc::clone(&self.output),
            subject: self.subject.clone(),
        })
    }

    /// The subject attached to every record, if any.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// The shared filter.
    #[must_use]
    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    /// The shared output chain.
    #[must_use]
    pub fn output(&self) -> &OutputChain {
        &self.output
    }

    /// Current threshold rank.
    #[must_use]
    pub fn threshold(&self) -> i32 {
        self.filter.threshold()
    }

    /// Sets the shared threshold; see [`Filter::set_threshold`].
    pub fn set_threshold<'a, T>(&self, value: T) -> Result<i32, UnknownLevelError>
    where
        T: Into<Threshold<'a>>,
    {
        self.filter.set_threshold(value)
    }

    /// Reports whether `level` would be written.
    #[must_use]
    pub fn accepts(&self, level: Level) -> bool {
        self.filter.accepts(level)
    }

    /// Reports whether `a` and `b` share the same filter.
    #[must_use]
    pub fn shares_filter(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.filter, &b.filter)
    }

    /// Reports whether `a` and `b` write through the same chain.
    #[must_use]
    pub fn shares_output(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.output, &b.output)
    }

    /// Writes `message` at `level` if the filter accepts it.
    ///
    /// `message` is only formatted when accepted, so passing
    /// `format_args!` costs nothing for rejected levels.
    pub fn emit(&self, level: Level, message: impl fmt::Display) {
        self.emit_with(level, message, &[]);
    }

    /// Like [`emit`](Self::emit) with key/value attributes.
    pub fn emit_with(&self, level: Level, message: impl fmt::Display, fields: &[Field<'_>]) {
        self.filter.emit(level, || {
            let text = render(&message);
            self.write_record(level, self.subject(), &text, fields);
        });
    }

    /// Writes a preformatted message with an explicit subject.
    pub fn log(&self, level: Level, subject: Option<&str>, message: &str, fields: &[Field<'_>]) {
        self.filter.emit(level, || {
            self.write_record(level, subject, message, fields);
        });
    }

    fn write_record(
        &self,
        level: Level,
        subject: Option<&str>,
        message: &str,
        fields: &[Field<'_>],
    ) {
        let record = Record::new(level.name(), level.rank(), message)
            .with_subject(subject)
            .with_fields(fields);
        self.output.write(&record);
    }

    /// Emits at `debug`.
    pub fn debug(&self, message: impl fmt::Display) {
        self.emit(DEBUG, message);
    }

    /// Emits at `info`.
    pub fn info(&self, message: impl fmt::Display) {
        self.emit(INFO, message);
    }

    /// Emits at `warn`.
    pub fn warn(&self, message: impl fmt::Display) {
        self.emit(WARN, message);
    }

    /// Emits at `error`.
    pub fn error(&self, message: impl fmt::Display) {
        self.emit(ERROR, message);
    }

    /// Emits at `fatal`.
    pub fn fatal(&self, message: impl fmt::Display) {
        self.emit(FATAL, message);
    }

    /// Starts a progress indicator reporting at `info`.
    #[must_use]
    pub fn progress(&self, subject: impl AsRef<str>, total: u64) -> Progress {
        Progress::new(self.clone(), subject.as_ref(), total)
    }

    /// Reports whether the chain stopped writing after a failure.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.output.is_degraded()
    }

    /// Resumes writing after a failure.
    pub fn reset_output(&self) {
        self.output.reset();
    }

    /// Closes the chain now instead of when the last clone drops.
    pub fn close(&self) {
        self.output.close();
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("subject", &self.subject)
            .field("filter", &self.filter)
            .field("output", &self.output)
            .finish()
    }
}

/// Placeholder written when a message's `Display` panics.
pub(crate) const UNPRINTABLE_MESSAGE: &str = "<message formatting panicked>";

/// Formats `message`, keeping partial output when `Display` reports an error
/// and substituting `UNPRINTABLE_MESSAGE` when it panics.
pub(crate) fn render(message: &impl fmt::Display) -> String {
    panic::catch_unwind(AssertUnwindSafe(|| {
        let mut text = String::new();
        let _ = write!(text, "{message}");
        text
    }))
    .unwrap_or_else(|_| UNPRINTABLE_MESSAGE.to_owned())
}

/// The process environment with `CONSOLE_LEVEL` hidden.
struct WithoutLevel;

impl Environment for WithoutLevel {
    fn get(&self, key: &str) -> Option<String> {
        if key == crate::config::LEVEL_VAR {
            None
        } else {
            SystemEnvironment.get(key)
        }
    }
}
