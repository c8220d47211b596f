//! Diagnostics emitted while plugins start and stop.
//!
//! Reporters only observe the lifecycle. Swapping one for another, or for
//! [`SilentReporter`], never changes which plugins end up enabled.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::error::InputError;

const LIFECYCLE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::lifecycle");

/// Observer notified of per-plugin lifecycle events.
pub trait InputReporter {
    /// The plugin's configuration block disabled it.
    fn plugin_disabled(&self, plugin: &str);

    /// The plugin initialised successfully.
    fn plugin_enabled(&self, plugin: &str);

    /// The plugin is unavailable and was skipped.
    fn plugin_unavailable(&self, plugin: &str, reason: &str);

    /// The plugin failed fatally; initialisation stops after this call.
    fn plugin_failed(&self, error: &InputError);

    /// The plugin's teardown completed.
    fn plugin_finished(&self, plugin: &str);

    /// The plugin's teardown panicked; the remaining plugins are still
    /// finished.
    fn plugin_finish_panicked(&self, plugin: &str, message: &str);
}

impl<T> InputReporter for Arc<T>
where
    T: InputReporter + ?Sized,
{
    fn plugin_disabled(&self, plugin: &str) {
        (**self).plugin_disabled(plugin);
    }

    fn plugin_enabled(&self, plugin: &str) {
        (**self).plugin_enabled(plugin);
    }

    fn plugin_unavailable(&self, plugin: &str, reason: &str) {
        (**self).plugin_unavailable(plugin, reason);
    }

    fn plugin_failed(&self, error: &InputError) {
        (**self).plugin_failed(error);
    }

    fn plugin_finished(&self, plugin: &str) {
        (**self).plugin_finished(plugin);
    }

    fn plugin_finish_panicked(&self, plugin: &str, message: &str) {
        (**self).plugin_finish_panicked(plugin, message);
    }
}

/// Reporter that records lifecycle events using `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl InputReporter for TracingReporter {
    fn plugin_disabled(&self, plugin: &str) {
        debug!(
            target: LIFECYCLE_TARGET,
            plugin,
            "input plugin disabled by configuration"
        );
    }

    fn plugin_enabled(&self, plugin: &str) {
        info!(target: LIFECYCLE_TARGET, plugin, "input plugin enabled");
    }

    fn plugin_unavailable(&self, plugin: &str, reason: &str) {
        warn!(
            target: LIFECYCLE_TARGET,
            plugin,
            reason,
            "input plugin '{plugin}' is unavailable"
        );
    }

    fn plugin_failed(&self, error: &InputError) {
        error!(
            target: LIFECYCLE_TARGET,
            plugin = error.plugin().unwrap_or_default(),
            error = %error,
            "input plugin failed to initialise"
        );
    }

    fn plugin_finished(&self, plugin: &str) {
        debug!(target: LIFECYCLE_TARGET, plugin, "input plugin finished");
    }

    fn plugin_finish_panicked(&self, plugin: &str, message: &str) {
        error!(
            target: LIFECYCLE_TARGET,
            plugin,
            panic = message,
            "input plugin panicked during teardown"
        );
    }
}

/// Reporter that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl InputReporter for SilentReporter {
    fn plugin_disabled(&self, _plugin: &str) {}

    fn plugin_enabled(&self, _plugin: &str) {}

    fn plugin_unavailable(&self, _plugin: &str, _reason: &str) {}

    fn plugin_failed(&self, _error: &InputError) {}

    fn plugin_finished(&self, _plugin: &str) {}

    fn plugin_finish_panicked(&self, _plugin: &str, _message: &str) {}
}
