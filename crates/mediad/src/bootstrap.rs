//! Daemon bootstrap orchestration.

use std::sync::Arc;

use ortho_config::{OrthoConfig, OrthoError};
use thiserror::Error;

use mediad_config::Config;
use mediad_input::{InputError, InputPlugins, InputRegistry};

use crate::health::HealthReporter;
use crate::telemetry::{self, TelemetryError, TelemetryHandle};

/// Trait abstracting configuration loading for testability.
pub trait ConfigLoader: Send + Sync {
    /// Loads the daemon configuration.
    ///
    /// # Errors
    ///
    /// Returns the loader's error when no valid configuration can be built.
    fn load(&self) -> Result<Config, Arc<OrthoError>>;
}

/// Loader that delegates to [`Config::load`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemConfigLoader;

impl ConfigLoader for SystemConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Config::load()
    }
}

/// Loader that hands out a configuration resolved ahead of time.
#[derive(Debug, Clone)]
pub struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    /// Wraps an already resolved configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(self.config.clone())
    }
}

/// Errors surfaced during bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Configuration failed to load.
    #[error("failed to load configuration: {source}")]
    Configuration {
        /// Underlying loader error.
        #[source]
        source: Arc<OrthoError>,
    },
    /// Telemetry initialisation failed.
    #[error("failed to initialise telemetry: {source}")]
    Telemetry {
        /// Underlying telemetry error.
        #[source]
        source: TelemetryError,
    },
    /// An input plugin failed fatally while starting.
    #[error("failed to start input plugins: {source}")]
    Inputs {
        /// Error naming the plugin that failed.
        #[source]
        source: InputError,
    },
}

/// Result of a successful bootstrap invocation.
///
/// The enabled input plugins stay up until [`Daemon::shutdown`] consumes the
/// daemon.
pub struct Daemon {
    config: Config,
    inputs: InputPlugins,
    telemetry: TelemetryHandle,
    reporter: Arc<dyn HealthReporter>,
}

impl Daemon {
    /// Accessor for the resolved configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Accessor for the running input plugins, used to dispatch streams.
    #[must_use]
    pub const fn inputs(&self) -> &InputPlugins {
        &self.inputs
    }

    /// Log settings of the installed subscriber.
    #[must_use]
    pub const fn telemetry(&self) -> &TelemetryHandle {
        &self.telemetry
    }

    /// Finishes every enabled input plugin in registry order.
    pub fn shutdown(self) {
        let Self {
            mut inputs,
            reporter,
            ..
        } = self;
        reporter.shutdown_starting();
        inputs.global_finish(&reporter);
        reporter.shutdown_completed();
    }
}

/// Bootstraps the daemon using the supplied collaborators.
///
/// Input plugins enabled before a fatal plugin failure are finished again
/// before the error is returned.
///
/// # Errors
///
/// Returns [`BootstrapError`] naming the stage that failed.
pub fn bootstrap_with(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
    registry: InputRegistry,
) -> Result<Daemon, BootstrapError> {
    reporter.bootstrap_starting();

    let config = match loader.load() {
        Ok(config) => config,
        Err(source) => {
            let error = BootstrapError::Configuration { source };
            reporter.bootstrap_failed(&error);
            return Err(error);
        }
    };

    let telemetry = match telemetry::initialise(&config) {
        Ok(handle) => handle,
        Err(source) => {
            let error = BootstrapError::Telemetry { source };
            reporter.bootstrap_failed(&error);
            return Err(error);
        }
    };

    let mut inputs = InputPlugins::new(registry);
    if let Err(source) = inputs.global_init(&config.blocks(), &reporter) {
        inputs.global_finish(&reporter);
        let error = BootstrapError::Inputs { source };
        reporter.bootstrap_failed(&error);
        return Err(error);
    }

    reporter.bootstrap_succeeded(&telemetry, &inputs.enabled_names());

    Ok(Daemon {
        config,
        inputs,
        telemetry,
        reporter,
    })
}
