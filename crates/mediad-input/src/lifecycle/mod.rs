//! Two-phase startup and shutdown of the registered input plugins.
//!
//! [`InputPlugins`] owns the registry together with the
//! [`EnablementTracker`] recording which plugins came up. It is the context
//! object the daemon threads through startup and shutdown:
//!
//! 1. [`InputPlugins::global_init`] visits plugins in registry order. A
//!    plugin whose block sets `enabled = false` is skipped silently. An
//!    unavailable plugin is reported and skipped. A fatal failure stops the
//!    walk and is returned tagged with the plugin's name; plugins enabled
//!    before it stay enabled.
//! 2. [`InputPlugins::global_finish`] calls `finish` on the enabled plugins
//!    in the same order and then clears the tracker.
//!
//! Neither call is reentrant and both run on the caller's thread.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use mediad_config::{BlockCategory, BlockSource, ConfigBlock, PLUGIN_KEY};

use crate::error::{InitFailure, InputError};
use crate::plugin::{InitOutcome, InputPlugin};
use crate::registry::InputRegistry;
use crate::reporter::InputReporter;
use crate::tracker::EnablementTracker;

/// Block key that switches a plugin off when set to false.
pub const ENABLED_KEY: &str = "enabled";

/// Registry of input plugins plus the record of which ones are enabled.
#[derive(Debug, Clone)]
pub struct InputPlugins {
    registry: InputRegistry,
    tracker: EnablementTracker,
}

impl InputPlugins {
    /// Wraps a registry; nothing is enabled until
    /// [`InputPlugins::global_init`] runs.
    #[must_use]
    pub fn new(registry: InputRegistry) -> Self {
        let tracker = EnablementTracker::new(registry.len());
        Self { registry, tracker }
    }

    /// Returns the underlying registry.
    #[must_use]
    pub const fn registry(&self) -> &InputRegistry {
        &self.registry
    }

    /// Returns the enablement record for read-only inspection.
    #[must_use]
    pub const fn tracker(&self) -> &EnablementTracker {
        &self.tracker
    }

    /// Brings up every registered plugin that configuration allows.
    ///
    /// Initialisation only ever sets flags. A plugin enabled by an earlier
    /// call stays enabled, and therefore due a `finish`, even if a later call
    /// skips it or finds it unavailable.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::Init`] for the first plugin whose block is
    /// malformed or whose `init` fails fatally. Plugins after it are not
    /// attempted.
    pub fn global_init(
        &mut self,
        blocks: &dyn BlockSource,
        reporter: &dyn InputReporter,
    ) -> Result<(), InputError> {
        for (index, plugin) in self.registry.iter().enumerate() {
            let name = plugin.name();
            let block = blocks
                .find_block(BlockCategory::Input, PLUGIN_KEY, name)
                .unwrap_or_else(|| ConfigBlock::empty());

            let outcome = match block.get_bool(ENABLED_KEY, true) {
                Ok(false) => {
                    reporter.plugin_disabled(name);
                    continue;
                }
                Ok(true) => plugin.init(block),
                Err(error) => InitOutcome::Fatal(InitFailure::from(error)),
            };

            match outcome {
                InitOutcome::Success => {
                    self.tracker.enable(index);
                    reporter.plugin_enabled(name);
                }
                InitOutcome::Unavailable(reason) => {
                    reporter.plugin_unavailable(name, &reason);
                }
                InitOutcome::Fatal(source) => {
                    let error = InputError::Init {
                        plugin: name.to_owned(),
                        source,
                    };
                    reporter.plugin_failed(&error);
                    return Err(error);
                }
            }
        }

        Ok(())
    }

    /// Tears down every enabled plugin in registry order, then clears the
    /// tracker.
    ///
    /// Plugins that were disabled, unavailable, or failed are never touched.
    /// A panic inside one plugin's `finish` is caught and reported so the
    /// remaining plugins are still finished.
    pub fn global_finish(&mut self, reporter: &dyn InputReporter) {
        self.for_each_enabled(|plugin| {
            let name = plugin.name();
            match panic::catch_unwind(AssertUnwindSafe(|| plugin.finish())) {
                Ok(()) => reporter.plugin_finished(name),
                Err(payload) => reporter.plugin_finish_panicked(name, &panic_message(&*payload)),
            }
        });
        self.tracker.clear();
    }

    /// Invokes `callback` for each enabled plugin in registry order.
    pub fn for_each_enabled<F>(&self, mut callback: F)
    where
        F: FnMut(&dyn InputPlugin),
    {
        for plugin in self.enabled() {
            callback(plugin);
        }
    }

    /// Iterates over the enabled plugins in registry order.
    pub fn enabled(&self) -> impl Iterator<Item = &dyn InputPlugin> + '_ {
        self.registry
            .iter()
            .enumerate()
            .filter(|(index, _)| self.tracker.is_enabled(*index))
            .map(|(_, plugin)| plugin)
    }

    /// Returns the names of the enabled plugins in registry order.
    #[must_use]
    pub fn enabled_names(&self) -> Vec<&str> {
        self.enabled().map(InputPlugin::name).collect()
    }

    /// Returns `true` when the named plugin is currently enabled.
    #[must_use]
    pub fn is_enabled(&self, name: &str) -> bool {
        self.registry
            .position(name)
            .is_some_and(|index| self.tracker.is_enabled(index))
    }

    /// Returns the first enabled plugin, in registry order, that accepts
    /// `uri`.
    #[must_use]
    pub fn find_for_uri(&self, uri: &str) -> Option<&dyn InputPlugin> {
        self.enabled().find(|plugin| plugin.supports_uri(uri))
    }

    /// Resolves the plugin that should open `uri`.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::UnsupportedUri`] when no enabled plugin accepts
    /// the URI.
    pub fn plugin_for_uri(&self, uri: &str) -> Result<&dyn InputPlugin, InputError> {
        self.find_for_uri(uri)
            .ok_or_else(|| InputError::UnsupportedUri {
                uri: uri.to_owned(),
            })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        String::from("non-string panic payload")
    }
}
