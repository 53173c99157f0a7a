//! Configuration for the terminal front end.
//!
//! Loaded from environment variables (a `.env` file is read first by the
//! binary) with defaults for everything.

use crate::types::{Filter, ParseChoiceError, Theme};
use std::env;
use std::time::Duration;
use thiserror::Error;

/// Default tracing filter directive
pub const DEFAULT_LOG_FILTER: &str = "todo=info,todo_list=info,todo_runtime=warn";

/// Errors raised while reading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `TODO_THEME` or `TODO_FILTER` held an unknown value
    #[error("{var}: {source}")]
    InvalidChoice {
        /// Variable name
        var: &'static str,
        /// Parse failure
        #[source]
        source: ParseChoiceError,
    },

    /// A numeric variable did not parse
    #[error("{var}: expected a whole number, got `{value}`")]
    InvalidNumber {
        /// Variable name
        var: &'static str,
        /// Raw value
        value: String,
    },
}

/// Front end configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Theme at startup (`TODO_THEME`)
    pub theme: Theme,
    /// Filter at startup (`TODO_FILTER`)
    pub filter: Filter,
    /// Tracing filter directive (`TODO_LOG`)
    pub log_filter: String,
    /// How long to wait for the store to drain on exit (`TODO_SHUTDOWN_TIMEOUT_MS`)
    pub shutdown_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            filter: Filter::All,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            shutdown_timeout: Duration::from_millis(1000),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set to a value that does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set to a value that does not parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let theme = match get("TODO_THEME") {
            Some(value) => value.parse().map_err(|source| ConfigError::InvalidChoice {
                var: "TODO_THEME",
                source,
            })?,
            None => defaults.theme,
        };

        let filter = match get("TODO_FILTER") {
            Some(value) => value.parse().map_err(|source| ConfigError::InvalidChoice {
                var: "TODO_FILTER",
                source,
            })?,
            None => defaults.filter,
        };

        let shutdown_timeout = match get("TODO_SHUTDOWN_TIMEOUT_MS") {
            Some(value) => value
                .trim()
                .parse()
                .map(Duration::from_millis)
                .map_err(|_| ConfigError::InvalidNumber {
                    var: "TODO_SHUTDOWN_TIMEOUT_MS",
                    value,
                })?,
            None => defaults.shutdown_timeout,
        };

        Ok(Self {
            theme,
            filter,
            log_filter: get("TODO_LOG").unwrap_or(defaults.log_filter),
            shutdown_timeout,
        })
    }
}
