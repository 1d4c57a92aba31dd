//! Layered configuration loading using figment.
//!
//! Sources, highest priority first:
//! 1. Environment variables (`WORKTRACK_` prefix, `__` separates sections)
//! 2. An optional TOML file
//! 3. Built-in defaults
//!
//! `WORKTRACK_IMPORT__TIMEOUT_SECS=5` maps to `import.timeout_secs`.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "WORKTRACK_";

const fn default_tick_interval_ms() -> u64 {
    1_000
}

const fn default_timeout_secs() -> u64 {
    30
}

fn default_probe_owner() -> String {
    "google".to_owned()
}

fn default_probe_repository() -> String {
    "material-design-icons".to_owned()
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Figment extraction or merge error.
    #[error("configuration error: {0}")]
    Figment(#[from] Box<figment::Error>),

    /// A configuration field has an invalid value.
    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        /// Dotted path of the offending field.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Time-tracking settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TimerConfig {
    /// Period of the live work-time recomputation, in milliseconds.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl TimerConfig {
    /// Returns the recomputation period.
    #[must_use]
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

/// Issue import settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ImportConfig {
    /// Upper bound on a single issue fetch, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Owner of the repository used by the connectivity probe.
    #[serde(default = "default_probe_owner")]
    pub probe_owner: String,

    /// Repository used by the connectivity probe.
    #[serde(default = "default_probe_repository")]
    pub probe_repository: String,
}

impl ImportConfig {
    /// Returns the fetch timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            probe_owner: default_probe_owner(),
            probe_repository: default_probe_repository(),
        }
    }
}

/// Complete crate configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct WorktrackConfig {
    /// Time-tracking settings.
    #[serde(default)]
    pub timer: TimerConfig,
    /// Issue import settings.
    #[serde(default)]
    pub import: ImportConfig,
}

impl WorktrackConfig {
    /// Loads defaults, then `path` when it exists, then the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a source cannot be parsed or a value is
    /// out of range.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(path).extract().map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    /// Builds the provider chain without extracting it.
    #[must_use]
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(file) = path.filter(|file| file.exists()) {
            figment = figment.merge(Toml::file(file));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Rejects values the services cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a zero tick interval or a
    /// zero import timeout, or a blank probe target.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timer.tick_interval_ms == 0 {
            return Err(invalid("timer.tick_interval_ms", "must be greater than zero"));
        }
        if self.import.timeout_secs == 0 {
            return Err(invalid("import.timeout_secs", "must be greater than zero"));
        }
        if self.import.probe_owner.trim().is_empty() {
            return Err(invalid("import.probe_owner", "must not be blank"));
        }
        if self.import.probe_repository.trim().is_empty() {
            return Err(invalid("import.probe_repository", "must not be blank"));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_owned(),
        reason: reason.to_owned(),
    }
}
