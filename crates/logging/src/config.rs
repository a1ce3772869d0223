//! crates/logging/src/config.rs
//! Logger defaults derived from environment variables.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use logging_sink::OutputFormat;

use crate::error::UnknownLevelError;
use crate::filter::{Filter, Threshold};
use crate::levels::{INFO, SeverityModel};

/// Threshold for the default logger: a level name or an integer.
pub const LEVEL_VAR: &str = "CONSOLE_LEVEL";
/// Adds process and thread details to record headers when set.
pub const VERBOSE_VAR: &str = "CONSOLE_VERBOSE";
/// Formatting layer: `terminal`, `text`, or `serialized`.
pub const OUTPUT_VAR: &str = "CONSOLE_OUTPUT";
/// Disables escape sequences when set to a non-empty value.
pub const NO_COLOR_VAR: &str = "NO_COLOR";
/// Prefix of the per-level subsystem lists, e.g. `CONSOLE_DEBUG=net.http,db`.
pub const SUBSYSTEM_VAR_PREFIX: &str = "CONSOLE_";

/// Key/value lookup the defaults are read from.
///
/// [`SystemEnvironment`] reads the process environment; maps implement the
/// trait so tests never touch global state.
pub trait Environment {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;
}

/// The process environment.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemEnvironment;

impl Environment for SystemEnvironment {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl<S: BuildHasher> Environment for HashMap<String, String, S> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

impl Environment for BTreeMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        BTreeMap::get(self, key).cloned()
    }
}

impl<E: Environment + ?Sized> Environment for &E {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}

/// A subsystem whose threshold differs from the default logger's.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubsystemOverride {
    /// Subsystem name, `.` or `::` separated.
    pub name: String,
    /// Threshold rank applied to the subsystem.
    pub rank: i32,
}

/// Settings for the default logger.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LoggerConfig {
    /// Threshold rank, already canonicalized against the model.
    pub level: i32,
    /// Adds process and thread details to headers.
    pub verbose: bool,
    /// Formatting layer.
    pub format: OutputFormat,
    /// `Some(false)` forces plain output; `None` detects.
    pub color: Option<bool>,
    /// Per-subsystem thresholds, registered with the resolver.
    pub overrides: Vec<SubsystemOverride>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: INFO.rank(),
            verbose: false,
            format: OutputFormat::default(),
            color: None,
            overrides: Vec::new(),
        }
    }
}

impl LoggerConfig {
    /// Reads the defaults for the standard model.
    pub fn from_env<E>(env: &E) -> Result<Self, UnknownLevelError>
    where
        E: Environment + ?Sized,
    {
        Self::from_env_with_model(env, &SeverityModel::STANDARD)
    }

    /// Reads the defaults, resolving level names against `model`.
    ///
    /// An unparseable `CONSOLE_LEVEL` is an error. Unknown `CONSOLE_OUTPUT`
    /// values fall back to the terminal format.
    pub fn from_env_with_model<E>(env: &E, model: &SeverityModel) -> Result<Self, UnknownLevelError>
    where
        E: Environment + ?Sized,
    {
        let filter = Filter::new(model.clone());
        let mut config = Self {
            level: model.canonical_threshold(INFO.rank()),
            ..Self::default()
        };

        if let Some(value) = non_empty(env.get(LEVEL_VAR)) {
            config.level = filter.resolve(Threshold::Name(&value))?;
        }

        config.verbose = env.get(VERBOSE_VAR).is_some();

        if let Some(value) = non_empty(env.get(OUTPUT_VAR)) {
            config.format = OutputFormat::from_name(&value).unwrap_or_default();
        }

        if non_empty(env.get(NO_COLOR_VAR)).is_some() {
            config.color = Some(false);
        }

        config.overrides = subsystem_overrides(env, model);

        Ok(config)
    }
}

/// Reads the `CONSOLE_<LEVEL>` lists for every level in `model`.
///
/// Names are comma separated; blanks are skipped. Lists are read in
/// ascending rank order, so a name listed under two levels ends up with the
/// more severe one once registered.
pub fn subsystem_overrides<E>(env: &E, model: &SeverityModel) -> Vec<SubsystemOverride>
where
    E: Environment + ?Sized,
{
    let mut overrides = Vec::new();
    for level in model.levels() {
        let key = format!("{SUBSYSTEM_VAR_PREFIX}{}", level.name().to_ascii_uppercase());
        let Some(list) = env.get(&key) else {
            continue;
        };
        overrides.extend(
            list.split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(|name| SubsystemOverride {
                    name: name.to_owned(),
                    rank: level.rank(),
                }),
        );
    }
    overrides
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}
