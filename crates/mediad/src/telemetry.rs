//! Log output for the daemon.
//!
//! The subscriber is installed once per process, from the first
//! configuration that reaches [`initialise`]. Later calls receive the handle
//! describing the subscriber already in place, so the daemon always reports
//! the log settings that are actually in effect.

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::UtcTime;

use mediad_config::{Config, LogFormat};

static INSTALLED: OnceCell<TelemetryHandle> = OnceCell::new();

/// Effective log settings of the installed subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryHandle {
    filter: String,
    format: LogFormat,
}

impl TelemetryHandle {
    /// Filter expression the subscriber was built with.
    #[must_use]
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Output format of the subscriber.
    #[must_use]
    pub const fn format(&self) -> LogFormat {
        self.format
    }
}

/// Errors encountered while configuring telemetry.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The configured log filter expression does not parse.
    #[error("invalid log filter '{filter}': {message}")]
    Filter {
        /// Expression taken from the configuration.
        filter: String,
        /// Parser diagnostic.
        message: String,
    },
    /// Some other code already owns the global subscriber.
    #[error("cannot install the log subscriber: {message}")]
    Install {
        /// Description of the installation failure.
        message: String,
    },
}

/// Installs the global subscriber on the first successful call.
///
/// A failed call installs nothing, so a later call with a corrected
/// configuration may still succeed.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] for a malformed filter and
/// [`TelemetryError::Install`] when a foreign subscriber is already set.
pub fn initialise(config: &Config) -> Result<TelemetryHandle, TelemetryError> {
    INSTALLED.get_or_try_init(|| install(config)).cloned()
}

fn parse_filter(expression: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(expression).map_err(|error| TelemetryError::Filter {
        filter: expression.to_owned(),
        message: error.to_string(),
    })
}

fn install(config: &Config) -> Result<TelemetryHandle, TelemetryError> {
    let handle = TelemetryHandle {
        filter: config.log_filter().to_owned(),
        format: config.log_format(),
    };
    let stderr_is_terminal = io::stderr().is_terminal();
    let builder = tracing_subscriber::fmt()
        .with_env_filter(parse_filter(&handle.filter)?)
        .with_writer(io::stderr)
        .with_ansi(stderr_is_terminal)
        .with_timer(UtcTime::rfc_3339());

    let installed = match handle.format {
        LogFormat::Json => builder.json().flatten_event(true).try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };
    installed.map_err(|error| TelemetryError::Install {
        message: error.to_string(),
    })?;
    Ok(handle)
}
