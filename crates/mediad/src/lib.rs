//! Bootstrap and shutdown for the `mediad` media daemon.
//!
//! The daemon loads its configuration through [`mediad_config`], installs
//! structured telemetry, and brings up the built-in input plugins with
//! [`mediad_input::InputPlugins::global_init`]. Once running it waits for a
//! termination signal and then tears the enabled plugins down again.
//!
//! Every stage is reported through a [`HealthReporter`] so operators can tell
//! which step failed. The reporter also receives the per-plugin events raised
//! while inputs start and stop.

mod bootstrap;
mod health;
mod plugins;
mod process;
mod telemetry;

pub use bootstrap::{
    BootstrapError, ConfigLoader, Daemon, StaticConfigLoader, SystemConfigLoader, bootstrap_with,
};
pub use health::{HealthReporter, StructuredHealthReporter};
pub use plugins::{
    DEFAULT_CONNECT_TIMEOUT, FilePlugin, HttpPlugin, HttpSettings, ProxyAddress, SmbPlugin,
    builtin_registry,
};
pub use process::{LaunchError, ShutdownCause, ShutdownError, run_daemon};
pub use telemetry::{TelemetryError, TelemetryHandle};

#[cfg(test)]
mod tests;
