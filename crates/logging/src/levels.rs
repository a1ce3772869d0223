//! crates/logging/src/levels.rs
//! Named severity levels and the models that order them.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

use thiserror::Error;

/// A named severity with a numeric rank.
///
/// Levels compare by rank only; two levels from different models with the
/// same rank are interchangeable as far as filtering is concerned.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Level {
    name: &'static str,
    rank: i32,
}

impl Level {
    /// Creates a level. Models validate uniqueness when they are built.
    #[must_use]
    pub const fn new(name: &'static str, rank: i32) -> Self {
        Self { name, rank }
    }

    /// Level name, for example `"warn"`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.name
    }

    /// Numeric rank; higher ranks are more severe.
    #[must_use]
    pub const fn rank(self) -> i32 {
        self.rank
    }
}

impl PartialOrd for Level {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Level {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank.cmp(&other.rank).then_with(|| self.name.cmp(other.name))
    }
}

impl From<Level> for i32 {
    fn from(level: Level) -> Self {
        level.rank
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Diagnostic detail for developers.
pub const DEBUG: Level = Level::new("debug", 0);
/// Normal operational messages.
pub const INFO: Level = Level::new("info", 1);
/// Something unexpected that the program recovered from.
pub const WARN: Level = Level::new("warn", 2);
/// An operation failed.
pub const ERROR: Level = Level::new("error", 3);
/// The program cannot continue.
pub const FATAL: Level = Level::new("fatal", 4);

const STANDARD_LEVELS: [Level; 5] = [DEBUG, INFO, WARN, ERROR, FATAL];

/// Errors raised while building a [`SeverityModel`].
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum SeverityModelError {
    /// No levels were supplied.
    #[error("a severity model needs at least one level")]
    Empty,
    /// Two levels share a name (compared case-insensitively).
    #[error("level name '{0}' is defined more than once")]
    DuplicateName(String),
    /// Two levels share a rank.
    #[error("rank {rank} is used by both '{first}' and '{second}'")]
    DuplicateRank {
        /// The shared rank.
        rank: i32,
        /// The level defined first.
        first: String,
        /// The level defined second.
        second: String,
    },
    /// A level was given a negative rank.
    #[error("level '{name}' has negative rank {rank}")]
    NegativeRank {
        /// The offending level name.
        name: String,
        /// The offending rank.
        rank: i32,
    },
}

/// An ordered, immutable set of levels.
///
/// Ranks must be unique and non-negative but need not be contiguous, which
/// leaves room for inserting intermediate levels later. The value one above
/// the highest rank is the *silent* threshold: a filter set to it accepts
/// nothing.
///
/// # Examples
///
/// ```
/// use logging::{Level, SeverityModel};
///
/// let model = SeverityModel::new([("trace", 0), ("notice", 5), ("alert", 10)])?;
/// assert_eq!(model.level("notice"), Some(Level::new("notice", 5)));
/// assert_eq!(model.max_rank(), 10);
/// assert_eq!(model.silent_rank(), 11);
/// assert_eq!(model.canonical_threshold(3), 5);
/// # Ok::<(), logging::SeverityModelError>(())
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SeverityModel {
    /// Sorted by ascending rank.
    levels: Cow<'static, [Level]>,
}

impl SeverityModel {
    /// The `debug`/`info`/`warn`/`error`/`fatal` model with ranks 0 to 4.
    pub const STANDARD: Self = Self {
        levels: Cow::Borrowed(&STANDARD_LEVELS),
    };

    /// Builds a model from `(name, rank)` pairs.
    pub fn new<I>(levels: I) -> Result<Self, SeverityModelError>
    where
        I: IntoIterator<Item = (&'static str, i32)>,
    {
        let mut collected: Vec<Level> = Vec::new();
        for (name, rank) in levels {
            if rank < 0 {
                return Err(SeverityModelError::NegativeRank {
                    name: name.to_owned(),
                    rank,
                });
            }
            if collected.iter().any(|level| level.name.eq_ignore_ascii_case(name)) {
                return Err(SeverityModelError::DuplicateName(name.to_owned()));
            }
            if let Some(existing) = collected.iter().find(|level| level.rank == rank) {
                return Err(SeverityModelError::DuplicateRank {
                    rank,
                    first: existing.name.to_owned(),
                    second: name.to_owned(),
                });
            }
            collected.push(Level::new(name, rank));
        }

        if collected.is_empty() {
            return Err(SeverityModelError::Empty);
        }
        collected.sort_unstable_by_key(|level| level.rank);

        Ok(Self {
            levels: Cow::Owned(collected),
        })
    }

    /// Levels in ascending rank order.
    #[must_use]
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// Looks up a level by name, ignoring ASCII case.
    #[must_use]
    pub fn level(&self, name: &str) -> Option<Level> {
        let name = name.trim();
        self.levels
            .iter()
            .copied()
            .find(|level| level.name.eq_ignore_ascii_case(name))
    }

    /// Looks up the level defined at exactly `rank`.
    #[must_use]
    pub fn level_for_rank(&self, rank: i32) -> Option<Level> {
        self.levels.iter().copied().find(|level| level.rank == rank)
    }

    /// Lowest defined rank.
    #[must_use]
    pub fn min_rank(&self) -> i32 {
        self.levels.first().map_or(0, |level| level.rank)
    }

    /// Highest defined rank.
    #[must_use]
    pub fn max_rank(&self) -> i32 {
        self.levels.last().map_or(0, |level| level.rank)
    }

    /// Threshold that silences every level.
    #[must_use]
    pub fn silent_rank(&self) -> i32 {
        self.max_rank().saturating_add(1)
    }

    /// Maps an arbitrary integer onto a threshold the model can hold.
    ///
    /// Returns the smallest defined rank that is at least `rank`, or
    /// [`silent_rank`](Self::silent_rank) when `rank` exceeds every level.
    /// Filtering against the result accepts exactly the same levels as
    /// filtering against `rank` itself.
    #[must_use]
    pub fn canonical_threshold(&self, rank: i32) -> i32 {
        self.levels
            .iter()
            .map(|level| level.rank)
            .find(|&defined| defined >= rank)
            .unwrap_or_else(|| self.silent_rank())
    }

    /// Comma-separated level names, for error messages.
    pub(crate) fn describe(&self) -> String {
        self.levels
            .iter()
            .map(|level| level.name)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for SeverityModel {
    fn default() -> Self {
        Self::STANDARD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod level_tests {
        use super::*;

        #[test]
        fn standard_constants_are_ordered() {
            assert!(DEBUG < INFO);
            assert!(INFO < WARN);
            assert!(WARN < ERROR);
            assert!(ERROR < FATAL);
        }

        #[test]
        fn display_uses_name() {
            assert_eq!(WARN.to_string(), "warn");
            assert_eq!(format!("{FATAL}"), "fatal");
        }
    }

    mod model_tests {
        use super::*;

        #[test]
        fn standard_model_lookup() {
            let model = SeverityModel::STANDARD;
            assert_eq!(model.level("debug"), Some(DEBUG));
            assert_eq!(model.level("WARN"), Some(WARN));
            assert_eq!(model.level(" error "), Some(ERROR));
            assert_eq!(model.level("verbose"), None);
            assert_eq!(model.level_for_rank(4), Some(FATAL));
            assert_eq!(model.level_for_rank(7), None);
        }

        #[test]
        fn standard_bounds() {
            let model = SeverityModel::default();
            assert_eq!(model.min_rank(), 0);
            assert_eq!(model.max_rank(), 4);
            assert_eq!(model.silent_rank(), 5);
        }

        #[test]
        fn custom_levels_are_sorted() {
            let model = SeverityModel::new([("high", 20), ("low", 1), ("mid", 10)])
                .expect("valid model");
            let names: Vec<_> = model.levels().iter().map(|level| level.name()).collect();
            assert_eq!(names, vec!["low", "mid", "high"]);
        }

        #[test]
        fn canonical_threshold_rounds_up_to_defined_rank() {
            let model = SeverityModel::new([("a", 0), ("b", 5), ("c", 10)]).expect("valid model");
            assert_eq!(model.canonical_threshold(-3), 0);
            assert_eq!(model.canonical_threshold(0), 0);
            assert_eq!(model.canonical_threshold(1), 5);
            assert_eq!(model.canonical_threshold(10), 10);
            assert_eq!(model.canonical_threshold(11), 11);
            assert_eq!(model.canonical_threshold(500), 11);
        }

        #[test]
        fn rejects_empty_model() {
            let levels: [(&'static str, i32); 0] = [];
            assert_eq!(SeverityModel::new(levels), Err(SeverityModelError::Empty));
        }

        #[test]
        fn rejects_duplicate_names_ignoring_case() {
            assert_eq!(
                SeverityModel::new([("info", 0), ("INFO", 1)]),
                Err(SeverityModelError::DuplicateName("INFO".to_owned()))
            );
        }

        #[test]
        fn rejects_duplicate_ranks() {
            let error = SeverityModel::new([("info", 1), ("notice", 1)]).unwrap_err();
            assert!(matches!(error, SeverityModelError::DuplicateRank { rank: 1, .. }));
            assert!(error.to_string().contains("'info'"));
        }

        #[test]
        fn rejects_negative_ranks() {
            assert!(matches!(
                SeverityModel::new([("below", -1)]),
                Err(SeverityModelError::NegativeRank { rank: -1, .. })
            ));
        }
    }
}
