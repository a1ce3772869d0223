//! crates/logging/src/tracing_bridge.rs
//! Bridge from the `tracing` crate into console loggers.
//!
//! [`ConsoleLayer`] is a `tracing-subscriber` layer that turns each event into
//! a record on a [`Logger`]. Tracing levels map onto the standard model
//! (`TRACE` and `DEBUG` both become `debug`), the event target becomes the
//! record subject, and every field other than `message` is attached as a
//! key/value attribute.
//!
//! Thresholds come from the resolver first, keyed by target, and from the
//! logger's own filter otherwise, so `CONSOLE_DEBUG=my_crate::db` applies to
//! `tracing::debug!(target: "my_crate::db::pool", ...)` as well.
//!
//! # Usage
//!
//! ```rust,ignore
//! use logging::{Logger, init_tracing};
//!
//! let logger = Logger::default_logger(std::io::stderr(), &logging::SystemEnvironment)?;
//! init_tracing(logger);
//!
//! tracing::warn!(target: "app::cache", entries = 42, "evicting");
//! ```

use std::fmt;

use logging_sink::Record;
use tracing::Subscriber;
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

use crate::levels::{DEBUG, ERROR, INFO, Level, WARN};
use crate::logger::Logger;
use crate::resolver::Resolver;

/// A tracing layer writing events through a [`Logger`].
pub struct ConsoleLayer {
    logger: Logger,
    resolver: &'static Resolver,
}

impl ConsoleLayer {
    /// Writes through `logger`, consulting the global resolver.
    #[must_use]
    pub fn new(logger: Logger) -> Self {
        Self::with_resolver(logger, Resolver::global())
    }

    /// Writes through `logger`, consulting `resolver` for target overrides.
    #[must_use]
    pub fn with_resolver(logger: Logger, resolver: &'static Resolver) -> Self {
        Self { logger, resolver }
    }

    /// Maps a tracing level onto the standard model.
    const fn map_level(level: tracing::Level) -> Level {
        match level {
            tracing::Level::ERROR => ERROR,
            tracing::Level::WARN => WARN,
            tracing::Level::INFO => INFO,
            tracing::Level::DEBUG | tracing::Level::TRACE => DEBUG,
        }
    }

    fn enabled_for(&self, target: &str, level: Level) -> bool {
        match self.resolver.resolve(target) {
            Some(rank) => level.rank() >= rank,
            None => self.logger.accepts(level),
        }
    }
}

impl<S> Layer<S> for ConsoleLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let target = metadata.target();
        let level = Self::map_level(*metadata.level());
        if !self.enabled_for(target, level) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let fields: Vec<(&str, &dyn fmt::Display)> = visitor
            .fields
            .iter()
            .map(|(key, value)| (*key, value as &dyn fmt::Display))
            .collect();
        let message = visitor.message.unwrap_or_default();

        // The resolver has already decided, so write below the logger's filter.
        let record = Record::new(level.name(), level.rank(), &message)
            .with_subject(Some(target))
            .with_fields(&fields);
        self.logger.output().write(&record);
    }
}

/// Collects the `message` field and renders the rest as strings.
#[derive(Default)]
struct MessageVisitor {
    message: Option<String>,
    fields: Vec<(&'static str, String)>,
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        let rendered = format!("{value:?}");
        if field.name() == "message" {
            self.message = Some(rendered);
        } else {
            self.fields.push((field.name(), rendered));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_owned());
        } else {
            self.fields.push((field.name(), value.to_owned()));
        }
    }
}

/// Installs a global subscriber that forwards every event to `logger`.
///
/// Panics if a global subscriber is already set, like
/// [`SubscriberInitExt::init`](tracing_subscriber::util::SubscriberInitExt::init).
pub fn init_tracing(logger: Logger) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(ConsoleLayer::new(logger))
        .init();
}

/// Like [`init_tracing`] with an extra filter layer, such as an `EnvFilter`.
pub fn init_tracing_with_filter<F>(logger: Logger, filter: F)
where
    F: Layer<tracing_subscriber::Registry> + Send + Sync + 'static,
{
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(filter)
        .with(ConsoleLayer::new(logger))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use logging_sink::{OutputChain, SharedBuffer};
    use tracing_subscriber::layer::SubscriberExt;

    fn capture() -> (Logger, SharedBuffer) {
        let buffer = SharedBuffer::new();
        (
            Logger::new(OutputChain::builder(buffer.clone()).build()),
            buffer,
        )
    }

    fn leaked_resolver() -> &'static Resolver {
        Box::leak(Box::new(Resolver::new()))
    }

    #[test]
    fn levels_map_onto_standard_model() {
        assert_eq!(ConsoleLayer::map_level(tracing::Level::ERROR), ERROR);
        assert_eq!(ConsoleLayer::map_level(tracing::Level::WARN), WARN);
        assert_eq!(ConsoleLayer::map_level(tracing::Level::INFO), INFO);
        assert_eq!(ConsoleLayer::map_level(tracing::Level::DEBUG), DEBUG);
        assert_eq!(ConsoleLayer::map_level(tracing::Level::TRACE), DEBUG);
    }

    #[test]
    fn events_become_records() {
        let (logger, buffer) = capture();
        let layer = ConsoleLayer::with_resolver(logger, leaked_resolver());
        let subscriber = tracing_subscriber::registry().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(target: "app::cache", entries = 42, "evicting");
            tracing::debug!(target: "app::cache", "hidden");
        });

        let output = buffer.contents_lossy();
        assert!(output.contains("warn: app::cache"));
        assert!(output.contains("entries=42"));
        assert!(output.contains("| evicting"));
        assert!(!output.contains("hidden"));
    }

    #[test]
    fn resolver_overrides_apply_by_target_prefix() {
        let (logger, buffer) = capture();
        let resolver = leaked_resolver();
        resolver.register("app::db", DEBUG);
        resolver.register("app::noisy", ERROR);
        let subscriber =
            tracing_subscriber::registry().with(ConsoleLayer::with_resolver(logger, resolver));

        tracing::subscriber::with_default(subscriber, || {
            tracing::trace!(target: "app::db::pool", "checkout");
            tracing::warn!(target: "app::noisy", "suppressed");
        });

        let output = buffer.contents_lossy();
        assert!(output.contains("checkout"));
        assert!(!output.contains("suppressed"));
    }
}
