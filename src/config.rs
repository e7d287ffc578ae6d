//! Runtime configuration for board services.

use crate::board::domain::{BoardDomainError, ColumnSpec};
use thiserror::Error;

/// Environment variable holding the client polling interval in seconds.
pub const POLL_INTERVAL_ENV: &str = "BOARDWALK_POLL_INTERVAL_SECS";
/// Environment variable holding the comma-separated default column titles.
pub const DEFAULT_COLUMNS_ENV: &str = "BOARDWALK_DEFAULT_COLUMNS";
/// Environment variable holding the optimistic retry budget.
pub const MAX_MOVE_ATTEMPTS_ENV: &str = "BOARDWALK_MAX_MOVE_ATTEMPTS";

/// Default polling interval handed to board clients.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;
/// Default optimistic retry budget for read-plan-write operations.
pub const DEFAULT_MAX_MOVE_ATTEMPTS: u32 = 3;
/// Column titles created for a new project when nothing else is configured.
pub const DEFAULT_COLUMN_TITLES: [&str; 4] = ["Backlog", "Ready", "Work in progress", "Done"];

/// Errors raised while loading configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A numeric variable could not be parsed.
    #[error("{name} must be a non-negative integer, got '{value}'")]
    InvalidNumber {
        /// Variable name.
        name: &'static str,
        /// Rejected value.
        value: String,
    },

    /// The retry budget was zero.
    #[error("BOARDWALK_MAX_MOVE_ATTEMPTS must be at least 1")]
    ZeroMoveAttempts,

    /// The default column template was invalid.
    #[error("invalid BOARDWALK_DEFAULT_COLUMNS: {0}")]
    DefaultColumns(#[source] BoardDomainError),
}

/// Board behaviour settings shared by the services and the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    poll_interval_secs: u64,
    default_columns: Vec<String>,
    max_move_attempts: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            default_columns: Vec::from(DEFAULT_COLUMN_TITLES.map(str::to_owned)),
            max_move_attempts: DEFAULT_MAX_MOVE_ATTEMPTS,
        }
    }
}

impl BoardConfig {
    /// Loads configuration from process environment variables.
    ///
    /// Unset variables fall back to their defaults:
    /// - `BOARDWALK_POLL_INTERVAL_SECS` (default 10, 0 disables polling)
    /// - `BOARDWALK_DEFAULT_COLUMNS` (default `Backlog,Ready,Work in progress,Done`)
    /// - `BOARDWALK_MAX_MOVE_ATTEMPTS` (default 3)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a set variable is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a supplied variable is invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let poll_interval_secs = match lookup(POLL_INTERVAL_ENV) {
            Some(raw) => parse_number(POLL_INTERVAL_ENV, &raw)?,
            None => defaults.poll_interval_secs,
        };

        let max_move_attempts = match lookup(MAX_MOVE_ATTEMPTS_ENV) {
            Some(raw) => parse_number(MAX_MOVE_ATTEMPTS_ENV, &raw)?,
            None => defaults.max_move_attempts,
        };

        let config = Self {
            poll_interval_secs,
            max_move_attempts,
            ..defaults
        };
        match lookup(DEFAULT_COLUMNS_ENV) {
            Some(raw) => config.with_default_columns(raw.split(',')),
            None => Ok(config),
        }
        .and_then(Self::validated)
    }

    fn validated(self) -> Result<Self, ConfigError> {
        if self.max_move_attempts == 0 {
            return Err(ConfigError::ZeroMoveAttempts);
        }
        Ok(self)
    }

    /// Sets the client polling interval; zero disables polling.
    #[must_use]
    pub const fn with_poll_interval_secs(mut self, seconds: u64) -> Self {
        self.poll_interval_secs = seconds;
        self
    }

    /// Sets the optimistic retry budget, never below one attempt.
    #[must_use]
    pub fn with_max_move_attempts(mut self, attempts: u32) -> Self {
        self.max_move_attempts = attempts.max(1);
        self
    }

    /// Replaces the default column template.
    ///
    /// Titles are trimmed and blank entries dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DefaultColumns`] when no title remains or a
    /// title is too long.
    pub fn with_default_columns<I, T>(mut self, titles: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let cleaned: Vec<String> = titles
            .into_iter()
            .map(|title| title.as_ref().trim().to_owned())
            .filter(|title| !title.is_empty())
            .collect();
        ColumnSpec::template(&cleaned).map_err(ConfigError::DefaultColumns)?;
        self.default_columns = cleaned;
        Ok(self)
    }

    /// Returns the client polling interval in seconds.
    #[must_use]
    pub const fn poll_interval_secs(&self) -> u64 {
        self.poll_interval_secs
    }

    /// Returns the configured default column titles.
    #[must_use]
    pub fn default_columns(&self) -> &[String] {
        &self.default_columns
    }

    /// Returns the optimistic retry budget.
    #[must_use]
    pub const fn max_move_attempts(&self) -> u32 {
        self.max_move_attempts
    }

    /// Builds the default column template.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError`] when the configured titles are invalid.
    pub fn default_column_specs(&self) -> Result<Vec<ColumnSpec>, BoardDomainError> {
        ColumnSpec::template(&self.default_columns)
    }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        name,
        value: raw.to_owned(),
    })
}
