//! crates/logging/src/filter.rs
//! Threshold gate deciding which levels reach the output chain.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};

use crate::error::UnknownLevelError;
use crate::levels::{INFO, Level, SeverityModel};

/// Anything a threshold can be set from.
///
/// Levels and integers always succeed. Names are looked up in the filter's
/// model first and then parsed as an integer.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Threshold<'a> {
    /// A level; its rank is used.
    Level(Level),
    /// A level name or a string holding an integer.
    Name(&'a str),
    /// A raw rank.
    Rank(i32),
}

impl From<Level> for Threshold<'_> {
    fn from(level: Level) -> Self {
        Self::Level(level)
    }
}

impl From<i32> for Threshold<'_> {
    fn from(rank: i32) -> Self {
        Self::Rank(rank)
    }
}

impl<'a> From<&'a str> for Threshold<'a> {
    fn from(name: &'a str) -> Self {
        Self::Name(name)
    }
}

impl<'a> From<&'a String> for Threshold<'a> {
    fn from(name: &'a String) -> Self {
        Self::Name(name.as_str())
    }
}

/// Holds the current threshold for one logger or a tree of loggers.
///
/// The stored value is always a rank defined by the model or the model's
/// silent rank, so [`threshold_level`](Self::threshold_level) is `None`
/// exactly when the filter is silenced. Reads and writes are atomic; a filter
/// shared through an [`Arc`] can be adjusted from any thread.
///
/// # Examples
///
/// ```
/// use logging::{Filter, WARN, INFO, ERROR, FATAL};
///
/// let filter = Filter::standard();
/// filter.set_threshold("warn")?;
/// assert!(!filter.accepts(INFO));
/// assert!(filter.accepts(ERROR));
///
/// filter.set_threshold(99)?;
/// assert!(!filter.accepts(FATAL));
/// assert!(filter.is_silent());
/// # Ok::<(), logging::UnknownLevelError>(())
/// ```
pub struct Filter {
    model: Arc<SeverityModel>,
    threshold: AtomicI32,
}

impl Filter {
    /// Creates a filter over `model` that accepts every level.
    #[must_use]
    pub fn new(model: SeverityModel) -> Self {
        Self::from_shared(Arc::new(model), None)
    }

    /// Standard model, threshold `info`.
    #[must_use]
    pub fn standard() -> Self {
        Self::from_shared(Arc::new(SeverityModel::STANDARD), Some(INFO.rank()))
    }

    fn from_shared(model: Arc<SeverityModel>, rank: Option<i32>) -> Self {
        let rank = model.canonical_threshold(rank.unwrap_or_else(|| model.min_rank()));
        Self {
            model,
            threshold: AtomicI32::new(rank),
        }
    }

    /// The model this filter is specialized by.
    #[must_use]
    pub fn model(&self) -> &SeverityModel {
        &self.model
    }

    /// Current threshold rank.
    #[must_use]
    pub fn threshold(&self) -> i32 {
        self.threshold.load(Ordering::Acquire)
    }

    /// The level at the current threshold, or `None` when silenced.
    #[must_use]
    pub fn threshold_level(&self) -> Option<Level> {
        self.model.level_for_rank(self.threshold())
    }

    /// Sets the threshold and returns the stored rank.
    ///
    /// Integers are canonicalized to the smallest defined rank at or above
    /// them; values above every rank silence the filter. On error the
    /// previous threshold is kept.
    pub fn set_threshold<'a, T>(&self, value: T) -> Result<i32, UnknownLevelError>
    where
        T: Into<Threshold<'a>>,
    {
        let rank = self.resolve(value.into())?;
        self.threshold.store(rank, Ordering::Release);
        Ok(rank)
    }

    /// Returns an independent filter over the same model with `value` as
    /// its threshold. Changes to either filter do not affect the other.
    pub fn with_threshold<'a, T>(&self, value: T) -> Result<Self, UnknownLevelError>
    where
        T: Into<Threshold<'a>>,
    {
        let rank = self.resolve(value.into())?;
        Ok(Self::from_shared(Arc::clone(&self.model), Some(rank)))
    }

    /// Maps a threshold input onto a stored rank without changing state.
    pub fn resolve(&self, value: Threshold<'_>) -> Result<i32, UnknownLevelError> {
        let rank = match value {
            Threshold::Level(level) => level.rank(),
            Threshold::Rank(rank) => rank,
            Threshold::Name(name) => match self.model.level(name) {
                Some(level) => level.rank(),
                None => name
                    .trim()
                    .parse::<i32>()
                    .map_err(|_| UnknownLevelError::new(name, self.model.describe()))?,
            },
        };
        Ok(self.model.canonical_threshold(rank))
    }

    /// Reports whether `level` passes the threshold.
    #[must_use]
    pub fn accepts(&self, level: Level) -> bool {
        self.accepts_rank(level.rank())
    }

    /// Reports whether a raw rank passes the threshold.
    #[must_use]
    pub fn accepts_rank(&self, rank: i32) -> bool {
        rank >= self.threshold()
    }

    /// Looks `name` up in the model and reports whether it passes.
    ///
    /// Unknown names are never enabled.
    #[must_use]
    pub fn is_enabled(&self, name: &str) -> bool {
        self.model
            .level(name)
            .is_some_and(|level| self.accepts(level))
    }

    /// Runs `forward` when `level` passes and reports whether it ran.
    pub fn emit<F>(&self, level: Level, forward: F) -> bool
    where
        F: FnOnce(),
    {
        if self.accepts(level) {
            forward();
            true
        } else {
            false
        }
    }

    /// Rejects every level.
    pub fn silence(&self) {
        self.threshold
            .store(self.model.silent_rank(), Ordering::Release);
    }

    /// Reports whether every level is rejected.
    #[must_use]
    pub fn is_silent(&self) -> bool {
        self.threshold() > self.model.max_rank()
    }

    /// Accepts every level.
    pub fn enable_all(&self) {
        self.threshold.store(self.model.min_rank(), Ordering::Release);
    }
}

impl Default for Filter {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter")
            .field("threshold", &self.threshold())
            .field("level", &self.threshold_level().map(Level::name))
            .finish_non_exhaustive()
    }
}
