//! Structured health reporting for daemon lifecycle events.

use std::sync::Arc;

use mediad_input::{InputError, InputReporter, TracingReporter};

use crate::bootstrap::BootstrapError;
use crate::telemetry::TelemetryHandle;

const HEALTH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::health");

/// Observer trait used to surface lifecycle events to telemetry sinks.
///
/// Health reporters also observe the per-plugin events raised while the
/// input plugins start and stop.
pub trait HealthReporter: InputReporter + Send + Sync {
    /// Invoked before configuration loading begins.
    fn bootstrap_starting(&self);

    /// Invoked after bootstrap completes, with the log settings in effect
    /// and the enabled input plugins in registry order.
    fn bootstrap_succeeded(&self, telemetry: &TelemetryHandle, enabled: &[&str]);

    /// Invoked when bootstrap fails.
    fn bootstrap_failed(&self, error: &BootstrapError);

    /// Invoked before the enabled input plugins are torn down.
    fn shutdown_starting(&self);

    /// Invoked once every enabled input plugin has been finished.
    fn shutdown_completed(&self);
}

impl<T> HealthReporter for Arc<T>
where
    T: HealthReporter + ?Sized,
{
    fn bootstrap_starting(&self) {
        (**self).bootstrap_starting();
    }

    fn bootstrap_succeeded(&self, telemetry: &TelemetryHandle, enabled: &[&str]) {
        (**self).bootstrap_succeeded(telemetry, enabled);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        (**self).bootstrap_failed(error);
    }

    fn shutdown_starting(&self) {
        (**self).shutdown_starting();
    }

    fn shutdown_completed(&self) {
        (**self).shutdown_completed();
    }
}

/// Default reporter that records lifecycle events using `tracing`.
///
/// Per-plugin events go to the input lifecycle target through
/// [`TracingReporter`]; daemon events go to the health target.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredHealthReporter;

impl StructuredHealthReporter {
    /// Builds a new reporter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl InputReporter for StructuredHealthReporter {
    fn plugin_disabled(&self, plugin: &str) {
        TracingReporter.plugin_disabled(plugin);
    }

    fn plugin_enabled(&self, plugin: &str) {
        TracingReporter.plugin_enabled(plugin);
    }

    fn plugin_unavailable(&self, plugin: &str, reason: &str) {
        TracingReporter.plugin_unavailable(plugin, reason);
    }

    fn plugin_failed(&self, error: &InputError) {
        TracingReporter.plugin_failed(error);
    }

    fn plugin_finished(&self, plugin: &str) {
        TracingReporter.plugin_finished(plugin);
    }

    fn plugin_finish_panicked(&self, plugin: &str, message: &str) {
        TracingReporter.plugin_finish_panicked(plugin, message);
    }
}

impl HealthReporter for StructuredHealthReporter {
    fn bootstrap_starting(&self) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "bootstrap_starting",
            "starting daemon bootstrap"
        );
    }

    fn bootstrap_succeeded(&self, telemetry: &TelemetryHandle, enabled: &[&str]) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "bootstrap_succeeded",
            log_filter = telemetry.filter(),
            log_format = %telemetry.format(),
            inputs = ?enabled,
            "daemon bootstrap completed"
        );
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        tracing::error!(
            target: HEALTH_TARGET,
            event = "bootstrap_failed",
            error = %error,
            "daemon bootstrap failed"
        );
    }

    fn shutdown_starting(&self) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "shutdown_starting",
            "finishing input plugins"
        );
    }

    fn shutdown_completed(&self) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "shutdown_completed",
            "daemon shutdown completed"
        );
    }
}
