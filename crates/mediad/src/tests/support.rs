//! Test harness utilities for the daemon bootstrap behavioural suite.

use std::ffi::OsString;
use std::sync::{Arc, Mutex};

use ortho_config::{OrthoConfig, OrthoError};

use mediad_config::{Config, ConfigBlock, InputSetting};
use mediad_input::{ENABLED_KEY, InitOutcome, InputError, InputPlugin, InputRegistry, InputReporter};

use crate::bootstrap::{BootstrapError, ConfigLoader, Daemon, StaticConfigLoader, bootstrap_with};
use crate::health::HealthReporter;
use crate::telemetry::TelemetryHandle;

/// How a [`ProbePlugin`] responds to `init`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    Ready,
    Unavailable,
    Broken,
}

/// Ordered record of plugin hook calls such as `init:alpha`.
#[derive(Debug, Clone, Default)]
pub struct HookLog {
    calls: Arc<Mutex<Vec<String>>>,
}

impl HookLog {
    fn record(&self, call: String) {
        self.calls.lock().expect("hook log mutex poisoned").push(call);
    }

    /// Returns the plugin names recorded for `hook`, in call order.
    pub fn plugins_for(&self, hook: &str) -> Vec<String> {
        let prefix = format!("{hook}:");
        self.calls
            .lock()
            .expect("hook log mutex poisoned")
            .iter()
            .filter_map(|call| call.strip_prefix(&prefix).map(str::to_owned))
            .collect()
    }
}

/// Input plugin whose behaviour is fixed up front.
pub struct ProbePlugin {
    name: String,
    probe: Probe,
    log: HookLog,
}

impl ProbePlugin {
    pub fn new(name: &str, probe: Probe, log: &HookLog) -> Self {
        Self {
            name: name.to_owned(),
            probe,
            log: log.clone(),
        }
    }
}

impl InputPlugin for ProbePlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn init(&self, _block: &ConfigBlock) -> InitOutcome {
        self.log.record(format!("init:{}", self.name));
        match self.probe {
            Probe::Ready => InitOutcome::Success,
            Probe::Unavailable => InitOutcome::unavailable("device not present"),
            Probe::Broken => InitOutcome::config_error("setting 'device' is malformed"),
        }
    }

    fn finish(&self) {
        self.log.record(format!("finish:{}", self.name));
    }
}

/// Scenario world shared across BDD steps.
pub struct TestWorld {
    failing_loader: bool,
    settings: Vec<InputSetting>,
    registry: InputRegistry,
    pub log: HookLog,
    pub reporter: Arc<RecordingHealthReporter>,
    daemon: Option<Daemon>,
    bootstrap_error: Option<BootstrapError>,
}

impl TestWorld {
    /// Builds a world with a successful configuration loader and no plugins.
    pub fn new() -> Self {
        Self {
            failing_loader: false,
            settings: Vec::new(),
            registry: InputRegistry::new(),
            log: HookLog::default(),
            reporter: Arc::new(RecordingHealthReporter::default()),
            daemon: None,
            bootstrap_error: None,
        }
    }

    /// Installs a loader that always fails.
    pub fn use_failing_loader(&mut self) {
        self.failing_loader = true;
    }

    /// Installs a loader that succeeds.
    pub fn use_successful_loader(&mut self) {
        self.failing_loader = false;
    }

    /// Registers a probe plugin after those already present.
    pub fn add_plugin(&mut self, name: &str, probe: Probe) {
        self.registry
            .register(ProbePlugin::new(name, probe, &self.log))
            .expect("register probe plugin");
    }

    /// Switches the named plugin off in the loaded configuration.
    pub fn disable(&mut self, name: &str) {
        self.settings
            .push(InputSetting::new(name, ENABLED_KEY, "no"));
    }

    /// Runs the bootstrap sequence once.
    pub fn bootstrap(&mut self) {
        if self.daemon.is_some() || self.bootstrap_error.is_some() {
            return;
        }

        let loader: Box<dyn ConfigLoader> = if self.failing_loader {
            Box::new(FailingConfigLoader)
        } else {
            Box::new(StaticConfigLoader::new(Config {
                input_settings: self.settings.clone(),
                ..Config::default()
            }))
        };
        let registry = std::mem::take(&mut self.registry);
        match bootstrap_with(&*loader, self.reporter.clone(), registry) {
            Ok(daemon) => self.daemon = Some(daemon),
            Err(error) => self.bootstrap_error = Some(error),
        }
    }

    /// Shuts the daemon down if bootstrap produced one.
    pub fn shutdown(&mut self) {
        if let Some(daemon) = self.daemon.take() {
            daemon.shutdown();
        }
    }

    /// Returns the bootstrap error, if any.
    pub fn bootstrap_error(&self) -> Option<&BootstrapError> {
        self.bootstrap_error.as_ref()
    }

    /// Returns the running daemon, if any.
    pub fn daemon(&self) -> Option<&Daemon> {
        self.daemon.as_ref()
    }
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Loader that intentionally fails by passing invalid CLI arguments.
pub struct FailingConfigLoader;

impl ConfigLoader for FailingConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        let args = vec![
            OsString::from("mediad"),
            OsString::from("--log-format"),
            OsString::from("verbose"),
        ];
        Config::load_from_iter(args)
    }
}

/// Structured health events tracked during scenarios.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthEvent {
    BootstrapStarting,
    BootstrapSucceeded(Vec<String>),
    BootstrapFailed(String),
    InputDisabled(String),
    InputEnabled(String),
    InputUnavailable(String),
    InputFailed(String),
    InputFinished(String),
    InputFinishPanicked(String),
    ShutdownStarting,
    ShutdownCompleted,
}

/// Records health events for assertions.
#[derive(Default)]
pub struct RecordingHealthReporter {
    events: Mutex<Vec<HealthEvent>>,
}

impl RecordingHealthReporter {
    /// Captures a copy of the recorded events.
    pub fn events(&self) -> Vec<HealthEvent> {
        self.events
            .lock()
            .expect("health reporter mutex poisoned")
            .clone()
    }

    fn record(&self, event: HealthEvent) {
        self.events
            .lock()
            .expect("health reporter mutex poisoned")
            .push(event);
    }
}

impl InputReporter for RecordingHealthReporter {
    fn plugin_disabled(&self, plugin: &str) {
        self.record(HealthEvent::InputDisabled(plugin.to_owned()));
    }

    fn plugin_enabled(&self, plugin: &str) {
        self.record(HealthEvent::InputEnabled(plugin.to_owned()));
    }

    fn plugin_unavailable(&self, plugin: &str, _reason: &str) {
        self.record(HealthEvent::InputUnavailable(plugin.to_owned()));
    }

    fn plugin_failed(&self, error: &InputError) {
        let plugin = error.plugin().unwrap_or_default().to_owned();
        self.record(HealthEvent::InputFailed(plugin));
    }

    fn plugin_finished(&self, plugin: &str) {
        self.record(HealthEvent::InputFinished(plugin.to_owned()));
    }

    fn plugin_finish_panicked(&self, plugin: &str, _message: &str) {
        self.record(HealthEvent::InputFinishPanicked(plugin.to_owned()));
    }
}

impl HealthReporter for RecordingHealthReporter {
    fn bootstrap_starting(&self) {
        self.record(HealthEvent::BootstrapStarting);
    }

    fn bootstrap_succeeded(&self, _telemetry: &TelemetryHandle, enabled: &[&str]) {
        let names = enabled.iter().map(|name| (*name).to_owned()).collect();
        self.record(HealthEvent::BootstrapSucceeded(names));
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        self.record(HealthEvent::BootstrapFailed(error.to_string()));
    }

    fn shutdown_starting(&self) {
        self.record(HealthEvent::ShutdownStarting);
    }

    fn shutdown_completed(&self) {
        self.record(HealthEvent::ShutdownCompleted);
    }
}

/// Default test world fixture.
pub fn world() -> std::cell::RefCell<TestWorld> {
    std::cell::RefCell::new(TestWorld::new())
}
