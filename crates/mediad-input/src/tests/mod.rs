//! Crate-level test doubles and BDD tests.

use std::sync::{Arc, Mutex};

use mediad_config::ConfigBlock;

use crate::error::InitFailure;
use crate::error::InputError;
use crate::plugin::{InitOutcome, InputPlugin};
use crate::reporter::InputReporter;


/// Plugin with a name and nothing else: no protocols, no hooks.
pub(crate) struct NamedPlugin {
    name: String,
}

impl NamedPlugin {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
        }
    }
}

impl InputPlugin for NamedPlugin {
    fn name(&self) -> &str {
        &self.name
    }
}

/// What a [`ScriptedPlugin`] returns from `init`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Script {
    Succeeds,
    /// Succeeds on the first `init`, then reports unavailable.
    SucceedsOnce,
    Unavailable,
    ConfigError,
    Internal,
    PanicsOnFinish,
}

/// Shared, ordered record of hook invocations such as `init:http`.
#[derive(Debug, Clone, Default)]
pub(crate) struct CallLog {
    calls: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    pub(crate) fn record(&self, call: String) {
        self.calls.lock().expect("call log mutex poisoned").push(call);
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("call log mutex poisoned").clone()
    }

    pub(crate) fn calls_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| call.strip_prefix(prefix).map(str::to_owned))
            .collect()
    }
}

/// Plugin whose `init` follows a script and whose hooks are logged.
pub(crate) struct ScriptedPlugin {
    name: String,
    script: Script,
    protocols: &'static [&'static str],
    log: CallLog,
}

impl ScriptedPlugin {
    pub(crate) fn new(name: &str, script: Script, log: &CallLog) -> Self {
        Self {
            name: name.to_owned(),
            script,
            protocols: &[],
            log: log.clone(),
        }
    }

    fn init_count(&self) -> usize {
        self.log
            .calls_with_prefix("init:")
            .iter()
            .filter(|name| **name == self.name)
            .count()
    }

    pub(crate) fn with_protocols(mut self, protocols: &'static [&'static str]) -> Self {
        self.protocols = protocols;
        self
    }
}

impl InputPlugin for ScriptedPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn protocols(&self) -> &[&'static str] {
        self.protocols
    }

    fn init(&self, _block: &ConfigBlock) -> InitOutcome {
        self.log.record(format!("init:{}", self.name));
        match self.script {
            Script::Succeeds | Script::PanicsOnFinish => InitOutcome::Success,
            Script::SucceedsOnce if self.init_count() == 1 => InitOutcome::Success,
            Script::SucceedsOnce => InitOutcome::unavailable("device went away"),
            Script::Unavailable => InitOutcome::unavailable("dependency missing"),
            Script::ConfigError => InitOutcome::config_error("setting 'proxy' is malformed"),
            Script::Internal => {
                InitOutcome::from(InitFailure::internal(std::io::Error::other("boom")))
            }
        }
    }

    fn finish(&self) {
        self.log.record(format!("finish:{}", self.name));
        if self.script == Script::PanicsOnFinish {
            panic!("teardown exploded");
        }
    }
}

/// Reporter that keeps every event as a `kind:plugin` string.
#[derive(Debug, Default)]
pub(crate) struct RecordingReporter {
    events: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub(crate) fn events(&self) -> Vec<String> {
        self.events
            .lock()
            .expect("reporter mutex poisoned")
            .clone()
    }

    fn push(&self, event: String) {
        self.events
            .lock()
            .expect("reporter mutex poisoned")
            .push(event);
    }
}

impl InputReporter for RecordingReporter {
    fn plugin_disabled(&self, plugin: &str) {
        self.push(format!("disabled:{plugin}"));
    }

    fn plugin_enabled(&self, plugin: &str) {
        self.push(format!("enabled:{plugin}"));
    }

    fn plugin_unavailable(&self, plugin: &str, _reason: &str) {
        self.push(format!("unavailable:{plugin}"));
    }

    fn plugin_failed(&self, error: &InputError) {
        self.push(format!("failed:{}", error.plugin().unwrap_or_default()));
    }

    fn plugin_finished(&self, plugin: &str) {
        self.push(format!("finished:{plugin}"));
    }

    fn plugin_finish_panicked(&self, plugin: &str, _message: &str) {
        self.push(format!("panicked:{plugin}"));
    }
}
