//! Ordered registry of input plugins.
//!
//! The [`InputRegistry`] holds the fixed set of backends known to the
//! daemon. Registration order is significant: the lifecycle initialises,
//! dispatches to, and finishes plugins in exactly this order on every run.
//! Names must be non-empty, unique (ignoring ASCII case), and free of the
//! `:` and `=` separators used by `plugin:key=value` settings.

use std::fmt;
use std::sync::Arc;

use crate::error::InputError;
use crate::plugin::InputPlugin;

/// Ordered, immutable-once-built list of input plugins.
#[derive(Clone, Default)]
pub struct InputRegistry {
    plugins: Vec<Arc<dyn InputPlugin>>,
}

impl fmt::Debug for InputRegistry {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("InputRegistry")
            .field("plugins", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

impl InputRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a plugin after validating its name.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::Registry`] if the name is empty, contains a
    /// setting separator, or is already registered.
    pub fn register(&mut self, plugin: impl InputPlugin + 'static) -> Result<(), InputError> {
        self.register_shared(Arc::new(plugin))
    }

    /// Appends a plugin that is shared with other owners, such as tests
    /// inspecting its state.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::Registry`] under the same rules as
    /// [`InputRegistry::register`].
    pub fn register_shared(&mut self, plugin: Arc<dyn InputPlugin>) -> Result<(), InputError> {
        let name = plugin.name();
        let rejection = |message: &str| InputError::Registry {
            name: name.to_owned(),
            message: message.to_owned(),
        };
        if name.trim().is_empty() {
            return Err(rejection("plugin name must not be empty"));
        }
        if name.contains([':', '=']) {
            return Err(rejection("plugin name must not contain ':' or '='"));
        }
        if self.position(name).is_some() {
            return Err(rejection("plugin is already registered"));
        }
        self.plugins.push(plugin);
        Ok(())
    }

    /// Looks up a plugin by name, ignoring ASCII case.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn InputPlugin> {
        self.position(name)
            .and_then(|index| self.plugins.get(index))
            .map(|plugin| &**plugin)
    }

    /// Returns the registration index of the named plugin.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.plugins
            .iter()
            .position(|plugin| plugin.name().eq_ignore_ascii_case(name))
    }

    /// Iterates over plugins in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn InputPlugin> + '_ {
        self.plugins.iter().map(|plugin| &**plugin)
    }

    /// Iterates over plugin names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.iter().map(InputPlugin::name)
    }

    /// Returns the number of registered plugins.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Returns `true` when no plugins are registered.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}
