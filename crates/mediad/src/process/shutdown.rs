//! Termination signals that end the daemon's run.

use std::io;

use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGQUIT, SIGTERM};
use signal_hook::iterator::Signals;
use strum::Display;
use thiserror::Error;

/// Signals the daemon treats as a request to stop.
const STOP_SIGNALS: [i32; 4] = [SIGTERM, SIGINT, SIGQUIT, SIGHUP];

/// Why the daemon left its run loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "SCREAMING-KEBAB-CASE")]
pub enum ShutdownCause {
    /// `SIGTERM`, typically from the service manager.
    Sigterm,
    /// `SIGINT`, typically Ctrl-C on a foreground run.
    Sigint,
    /// `SIGQUIT`.
    Sigquit,
    /// `SIGHUP`, the controlling terminal went away.
    Sighup,
}

impl ShutdownCause {
    /// Maps a raw signal number onto a cause; other signals yield `None`.
    #[must_use]
    pub const fn from_signal(signal: i32) -> Option<Self> {
        match signal {
            SIGTERM => Some(Self::Sigterm),
            SIGINT => Some(Self::Sigint),
            SIGQUIT => Some(Self::Sigquit),
            SIGHUP => Some(Self::Sighup),
            _ => None,
        }
    }
}

/// Blocks the run loop until the daemon should stop.
pub(crate) trait ShutdownSignal: Send + Sync {
    /// Returns once a stop request arrives.
    fn wait(&self) -> Result<ShutdownCause, ShutdownError>;
}

/// Errors reported while waiting for a stop request.
#[derive(Debug, Error)]
pub enum ShutdownError {
    /// Registering the signal handlers failed.
    #[error("failed to install signal handlers: {source}")]
    Install {
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The signal stream ended without delivering a stop request.
    #[error("signal delivery stopped before a termination signal arrived")]
    Closed,
}

/// Waits on the process's termination signals.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct SystemShutdownSignal;

impl ShutdownSignal for SystemShutdownSignal {
    fn wait(&self) -> Result<ShutdownCause, ShutdownError> {
        let mut signals =
            Signals::new(STOP_SIGNALS).map_err(|source| ShutdownError::Install { source })?;
        signals
            .forever()
            .find_map(ShutdownCause::from_signal)
            .ok_or(ShutdownError::Closed)
    }
}
