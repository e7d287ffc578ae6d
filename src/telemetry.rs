//! Tracing subscriber set-up for the server binary.

use thiserror::Error;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "boardwalk=info,warn";

/// Output format of log events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Plain,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parses `BOARDWALK_LOG_FORMAT` style values; anything but `json` is
    /// plain.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Plain
        }
    }
}

/// Error raised when a global subscriber is already installed.
#[derive(Debug, Error)]
#[error("failed to initialise tracing: {0}")]
pub struct TelemetryError(#[from] tracing_subscriber::util::TryInitError);

/// Installs the global tracing subscriber.
///
/// The filter comes from `RUST_LOG`, falling back to [`DEFAULT_FILTER`].
///
/// # Errors
///
/// Returns [`TelemetryError`] when a subscriber was already installed.
pub fn init_tracing(format: LogFormat) -> Result<(), TelemetryError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Plain => registry.with(tracing_subscriber::fmt::layer()).try_init()?,
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("json", LogFormat::Json)]
    #[case(" JSON ", LogFormat::Json)]
    #[case("plain", LogFormat::Plain)]
    #[case("pretty", LogFormat::Plain)]
    #[case("", LogFormat::Plain)]
    fn log_format_is_parsed_leniently(#[case] name: &str, #[case] expected: LogFormat) {
        assert_eq!(LogFormat::from_name(name), expected);
    }

    #[rstest]
    fn default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }

    #[rstest]
    fn second_initialisation_is_reported() {
        // Another test in this binary may already own the global subscriber.
        let installed = init_tracing(LogFormat::Plain).is_ok();
        let again = init_tracing(LogFormat::Json);

        assert!(again.is_err(), "first call installed: {installed}");
    }
}
