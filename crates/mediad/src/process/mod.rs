//! Daemon process supervision: run until a termination signal arrives.

mod shutdown;

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use mediad_input::{InputError, InputRegistry};

use crate::bootstrap::{BootstrapError, ConfigLoader, SystemConfigLoader, bootstrap_with};
use crate::health::{HealthReporter, StructuredHealthReporter};
use crate::plugins::builtin_registry;

pub use self::shutdown::{ShutdownCause, ShutdownError};
pub(crate) use self::shutdown::{ShutdownSignal, SystemShutdownSignal};

pub(crate) const PROCESS_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::process");

/// Errors surfaced while launching or supervising the daemon process.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// The built-in input plugins could not be registered.
    #[error("failed to build the input plugin registry: {source}")]
    Registry {
        /// Underlying registration error.
        #[source]
        source: InputError,
    },
    /// Bootstrap failed before the daemon was running.
    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),
    /// Waiting for a termination signal failed.
    #[error(transparent)]
    Shutdown(#[from] ShutdownError),
}

/// Runs the daemon using the production collaborators.
///
/// # Errors
///
/// Returns [`LaunchError`] when bootstrap fails or the signal listener
/// cannot be installed. Input plugins are finished in both cases.
pub fn run_daemon() -> Result<(), LaunchError> {
    let registry = builtin_registry().map_err(|source| LaunchError::Registry { source })?;
    run_daemon_with(
        &SystemConfigLoader,
        Arc::new(StructuredHealthReporter::new()),
        registry,
        &SystemShutdownSignal,
    )
}

/// Runs the daemon with injected collaborators.
pub(crate) fn run_daemon_with(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
    registry: InputRegistry,
    shutdown: &dyn ShutdownSignal,
) -> Result<(), LaunchError> {
    info!(target: PROCESS_TARGET, "starting daemon runtime");
    let daemon = bootstrap_with(loader, reporter, registry)?;
    let waited = shutdown.wait();
    if let Ok(cause) = &waited {
        info!(target: PROCESS_TARGET, cause = %cause, "stop requested");
    }
    daemon.shutdown();
    waited?;
    info!(target: PROCESS_TARGET, "shutdown sequence completed");
    Ok(())
}
