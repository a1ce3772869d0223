//! crates/logging/src/resolver.rs
//! Process-wide per-subsystem threshold overrides.

use std::fmt;
use std::sync::{OnceLock, PoisonError, RwLock};

use dashmap::DashMap;
use rustc_hash::FxBuildHasher;

use crate::config::{Environment, subsystem_overrides};
use crate::levels::SeverityModel;
use crate::logger::Logger;

static GLOBAL: OnceLock<Resolver> = OnceLock::new();

/// Maps subsystem names to thresholds that override the default logger's.
///
/// Names are namespaces: `net.http` and `net::http` are the same subsystem,
/// and an override registered for `net` also applies to `net.http` unless a
/// more specific one exists. Registration is an upsert; the last call for a
/// name wins. Lookups never fail.
///
/// # Examples
///
/// ```
/// use logging::{Resolver, DEBUG, ERROR};
///
/// let resolver = Resolver::new();
/// resolver.register("net", ERROR);
/// resolver.register("net::http", DEBUG);
///
/// assert_eq!(resolver.resolve("net.http.client"), Some(0));
/// assert_eq!(resolver.resolve("net.dns"), Some(3));
/// assert_eq!(resolver.resolve("disk"), None);
/// ```
pub struct Resolver {
    entries: DashMap<String, i32, FxBuildHasher>,
    fallback: RwLock<Option<Logger>>,
}

impl Resolver {
    /// Creates an empty resolver with no fallback logger.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: DashMap::with_hasher(FxBuildHasher),
            fallback: RwLock::new(None),
        }
    }

    /// The process-wide resolver.
    pub fn global() -> &'static Self {
        GLOBAL.get_or_init(Self::new)
    }

    /// Sets the threshold for `name`, replacing any earlier registration.
    pub fn register(&self, name: &str, rank: impl Into<i32>) {
        let key = normalize(name);
        if key.is_empty() {
            return;
        }
        self.entries.insert(key, rank.into());
    }

    /// Registers every `CONSOLE_<LEVEL>` list found in `env`.
    pub fn register_from_env<E>(&self, env: &E, model: &SeverityModel)
    where
        E: Environment + ?Sized,
    {
        for entry in subsystem_overrides(env, model) {
            self.register(&entry.name, entry.rank);
        }
    }

    /// Removes the override for exactly `name` and returns it.
    pub fn unregister(&self, name: &str) -> Option<i32> {
        self.entries.remove(&normalize(name)).map(|(_, rank)| rank)
    }

    /// Removes every override. The fallback logger is kept.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of registered overrides.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether no overrides are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The most specific override for `name`, if any.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<i32> {
        let segments = segments(name);
        (1..=segments.len())
            .rev()
            .find_map(|count| {
                let key = segments[..count].join(".");
                self.entries.get(&key).map(|entry| *entry.value())
            })
    }

    /// Installs the logger consulted when a subsystem has no logger of its own.
    pub fn set_default_logger(&self, logger: Logger) {
        *self
            .fallback
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(logger);
    }

    /// The installed fallback logger.
    #[must_use]
    pub fn default_logger(&self) -> Option<Logger> {
        self.fallback
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Removes the fallback logger and returns it.
    pub fn take_default_logger(&self) -> Option<Logger> {
        self.fallback
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    /// A logger for `name` derived from the fallback, if one is installed.
    ///
    /// See [`logger_from`](Self::logger_from).
    #[must_use]
    pub fn logger_for(&self, name: &str) -> Option<Logger> {
        let fallback = self.default_logger()?;
        Some(self.logger_from(&fallback, name))
    }

    /// A logger for `name` writing through `base`'s chain.
    ///
    /// With an override the logger gets its own filter at the override
    /// threshold; otherwise it shares `base`'s filter. The override is read
    /// once, here, so later registrations do not affect loggers already
    /// handed out.
    #[must_use]
    pub fn logger_from(&self, base: &Logger, name: &str) -> Logger {
        match self.resolve(name) {
            Some(rank) => base
                .with_threshold(rank)
                .map_or_else(|_| base.named(name), |logger| logger.named(name)),
            None => base.named(name),
        }
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("entries", &self.entries.len())
            .field("has_fallback", &self.default_logger().is_some())
            .finish()
    }
}

/// Installs `logger` as the global fallback.
pub fn default_resolver(logger: &Logger) {
    Resolver::global().set_default_logger(logger.clone());
}

/// A logger for subsystem `name` derived from the global fallback.
///
/// Creates the default logger first when no fallback has been installed.
pub fn logger_for(name: &str) -> Logger {
    let resolver = Resolver::global();
    resolver
        .logger_for(name)
        .unwrap_or_else(|| resolver.logger_from(&crate::context::current(), name))
}

fn segments(name: &str) -> Vec<&str> {
    name.split("::")
        .flat_map(|part| part.split('.'))
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect()
}

fn normalize(name: &str) -> String {
    segments(name).join(".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::{DEBUG, ERROR, INFO, WARN};
    use logging_sink::{OutputChain, SharedBuffer};

    #[test]
    fn separators_are_equivalent() {
        assert_eq!(normalize("a::b.c"), "a.b.c");
        assert_eq!(normalize(" a .. b "), "a.b");
        assert_eq!(normalize("::"), "");
    }

    #[test]
    fn most_specific_prefix_wins() {
        let resolver = Resolver::new();
        resolver.register("a", ERROR);
        resolver.register("a.b", DEBUG);

        assert_eq!(resolver.resolve("a.b"), Some(0));
        assert_eq!(resolver.resolve("a::b::c"), Some(0));
        assert_eq!(resolver.resolve("a"), Some(3));
        assert_eq!(resolver.resolve("a.c"), Some(3));
        assert_eq!(resolver.resolve("ab"), None);
        assert_eq!(resolver.resolve(""), None);
    }

    #[test]
    fn register_is_an_upsert() {
        let resolver = Resolver::new();
        resolver.register("db", WARN);
        resolver.register("db", WARN);
        assert_eq!(resolver.len(), 1);
        resolver.register("db", INFO);
        assert_eq!(resolver.resolve("db"), Some(1));
    }

    #[test]
    fn empty_names_are_not_registered() {
        let resolver = Resolver::new();
        resolver.register("..", ERROR);
        assert!(resolver.is_empty());
    }

    #[test]
    fn unregister_and_clear() {
        let resolver = Resolver::new();
        resolver.register("a", 3);
        resolver.register("b.c", 0);
        assert_eq!(resolver.unregister("b::c"), Some(0));
        assert_eq!(resolver.unregister("b::c"), None);
        resolver.clear();
        assert!(resolver.is_empty());
    }

    #[test]
    fn register_from_env_reads_level_lists() {
        let env: std::collections::HashMap<String, String> = [
            ("CONSOLE_DEBUG".to_owned(), "net.http,db".to_owned()),
            ("CONSOLE_FATAL".to_owned(), "quiet".to_owned()),
        ]
        .into_iter()
        .collect();
        let resolver = Resolver::new();
        resolver.register_from_env(&env, &SeverityModel::STANDARD);
        assert_eq!(resolver.resolve("net.http.pool"), Some(0));
        assert_eq!(resolver.resolve("db"), Some(0));
        assert_eq!(resolver.resolve("quiet"), Some(4));
        assert_eq!(resolver.resolve("net"), None);
    }

    #[test]
    fn logger_for_requires_fallback() {
        let resolver = Resolver::new();
        assert!(resolver.logger_for("anything").is_none());
    }

    #[test]
    fn logger_for_applies_override_or_shares_filter() {
        let buffer = SharedBuffer::new();
        let fallback = Logger::new(OutputChain::builder(buffer.clone()).build());
        let resolver = Resolver::new();
        resolver.set_default_logger(fallback.clone());
        resolver.register("a.b", DEBUG);

        let specific = resolver.logger_for("a.b").expect("fallback installed");
        let general = resolver.logger_for("a").expect("fallback installed");

        assert!(!Logger::shares_filter(&specific, &fallback));
        assert!(Logger::shares_output(&specific, &fallback));
        assert!(Logger::shares_filter(&general, &fallback));

        specific.debug("from a.b");
        general.debug("from a");
        let output = buffer.contents_lossy();
        assert!(output.contains("from a.b"));
        assert!(!output.contains("from a\n"));
        assert_eq!(output.matches("| from").count(), 1);
    }

    #[test]
    fn take_default_logger_empties_slot() {
        let resolver = Resolver::new();
        resolver.set_default_logger(Logger::new(
            OutputChain::builder(SharedBuffer::new()).build(),
        ));
        assert!(resolver.take_default_logger().is_some());
        assert!(resolver.default_logger().is_none());
    }
}
