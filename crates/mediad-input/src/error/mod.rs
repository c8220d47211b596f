//! Domain errors raised by the input plugin lifecycle.
//!
//! [`InitFailure`] is what a plugin reports when it cannot start for a
//! reason that must stop the daemon. [`InputError`] is what the lifecycle
//! surfaces to its caller, tagged with the offending plugin's name so the
//! operator can find the faulty configuration section.

use std::error::Error as StdError;

use mediad_config::BlockError;
use thiserror::Error;

/// Fatal failure reported by a plugin's initialisation routine.
///
/// Both variants abort startup; the distinction only refines the message.
#[derive(Debug, Error)]
pub enum InitFailure {
    /// The plugin's configuration block is malformed.
    #[error("{message}")]
    Config {
        /// Human-readable description of the configuration problem.
        message: String,
    },
    /// An unexpected internal error occurred while starting the plugin.
    #[error("unexpected error: {source}")]
    Internal {
        /// Underlying error reported by the plugin.
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl InitFailure {
    /// Builds a configuration failure.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Wraps an unexpected error.
    #[must_use]
    pub fn internal(source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self::Internal {
            source: source.into(),
        }
    }
}

impl From<BlockError> for InitFailure {
    fn from(error: BlockError) -> Self {
        Self::config(error.to_string())
    }
}

/// Errors arising from input plugin lifecycle operations.
#[derive(Debug, Error)]
pub enum InputError {
    /// A plugin failed fatally while the lifecycle was initialising it.
    #[error("failed to initialise input plugin '{plugin}': {source}")]
    Init {
        /// Name of the plugin that failed.
        plugin: String,
        /// The plugin's failure.
        #[source]
        source: InitFailure,
    },

    /// A plugin could not be added to the registry.
    #[error("cannot register input plugin '{name}': {message}")]
    Registry {
        /// Name that was rejected.
        name: String,
        /// Description of the validation failure.
        message: String,
    },

    /// No enabled plugin accepts the requested URI.
    #[error("no enabled input plugin supports '{uri}'")]
    UnsupportedUri {
        /// URI that was looked up.
        uri: String,
    },
}

impl InputError {
    /// Returns the plugin name the error is attributed to, when there is one.
    #[must_use]
    pub fn plugin(&self) -> Option<&str> {
        match self {
            Self::Init { plugin, .. } => Some(plugin),
            Self::Registry { name, .. } => Some(name),
            Self::UnsupportedUri { .. } => None,
        }
    }
}
